// security/src/policy.rs

use tracing::debug;

use models::hierarchy::User;
use models::{EntityId, HierarchyError, HierarchyResult, Role, ScopeField};

/// How much access an operation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Read queries.
    ReadOnly,
    /// Create, toggle, delete.
    Full,
}

/// The scope coordinates of a target entity (or of a parent scope for
/// create operations). A field is `None` when the entity sits above that
/// level of the hierarchy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityScope {
    pub health_system_id: Option<EntityId>,
    pub hospital_id: Option<EntityId>,
    pub department_id: Option<EntityId>,
}

impl EntityScope {
    pub fn get(&self, field: ScopeField) -> Option<EntityId> {
        match field {
            ScopeField::HealthSystem => self.health_system_id,
            ScopeField::Hospital => self.hospital_id,
            ScopeField::Department => self.department_id,
        }
    }
}

/// One row of the authorization policy. Adding a role means adding a row
/// here, not new control flow.
#[derive(Debug, Clone, Copy)]
struct PolicyRule {
    role: Role,
    /// Scope field the user and entity must agree on; `None` means
    /// unconditional.
    scope_field: Option<ScopeField>,
    access: Access,
}

/// role → required-match table.
const POLICY: &[PolicyRule] = &[
    PolicyRule {
        role: Role::SuperAdmin,
        scope_field: None,
        access: Access::Full,
    },
    PolicyRule {
        role: Role::HealthSystemAdmin,
        scope_field: Some(ScopeField::HealthSystem),
        access: Access::Full,
    },
    PolicyRule {
        role: Role::HospitalAdmin,
        scope_field: Some(ScopeField::Hospital),
        access: Access::Full,
    },
    PolicyRule {
        role: Role::DepartmentalAdmin,
        scope_field: Some(ScopeField::Department),
        access: Access::ReadOnly,
    },
];

/// Decides whether `user` may perform an operation needing `access` on a
/// target with the given scope coordinates. Deny is `AuthorizationDenied`,
/// distinct from the resolver's `AuthenticationRequired`.
pub fn authorize(user: &User, scope: &EntityScope, access: Access) -> HierarchyResult<()> {
    let rule = POLICY
        .iter()
        .find(|rule| rule.role == user.role)
        .ok_or(HierarchyError::AuthorizationDenied)?;

    if access == Access::Full && rule.access == Access::ReadOnly {
        debug!(role = ?user.role, "denied: role is read-only");
        return Err(HierarchyError::AuthorizationDenied);
    }

    match rule.scope_field {
        None => Ok(()),
        Some(field) => {
            let user_scope = user.scope_id(field);
            if user_scope.is_some() && user_scope == scope.get(field) {
                Ok(())
            } else {
                debug!(role = ?user.role, field = ?field, "denied: scope mismatch");
                Err(HierarchyError::AuthorizationDenied)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn scoped_user(role: Role, scope_id: EntityId) -> User {
        let mut user = User {
            id: EntityId::new(),
            external_id: format!("subject|{:?}", role),
            first: "Sam".to_string(),
            last: "Reyes".to_string(),
            email: "sam@example.org".to_string(),
            role,
            health_system_id: None,
            hospital_id: None,
            department_id: None,
            created_at: Utc::now(),
        };
        match role.scope_field() {
            Some(ScopeField::HealthSystem) => user.health_system_id = Some(scope_id),
            Some(ScopeField::Hospital) => user.hospital_id = Some(scope_id),
            Some(ScopeField::Department) => user.department_id = Some(scope_id),
            None => {}
        }
        user
    }

    /// Exhaustive role × hierarchy-level matrix: access is granted iff the
    /// role is super_admin or its scope field matches the entity's.
    #[test]
    fn role_level_matrix_for_reads() {
        let own = EntityId::new();
        let foreign = EntityId::new();

        for role in Role::all() {
            for level in [
                ScopeField::HealthSystem,
                ScopeField::Hospital,
                ScopeField::Department,
            ] {
                let user = scoped_user(*role, own);

                let mut matching = EntityScope::default();
                match level {
                    ScopeField::HealthSystem => matching.health_system_id = Some(own),
                    ScopeField::Hospital => matching.hospital_id = Some(own),
                    ScopeField::Department => matching.department_id = Some(own),
                }
                let mut mismatched = EntityScope::default();
                match level {
                    ScopeField::HealthSystem => mismatched.health_system_id = Some(foreign),
                    ScopeField::Hospital => mismatched.hospital_id = Some(foreign),
                    ScopeField::Department => mismatched.department_id = Some(foreign),
                }

                let expect_match =
                    *role == Role::SuperAdmin || role.scope_field() == Some(level);
                assert_eq!(
                    authorize(&user, &matching, Access::ReadOnly).is_ok(),
                    expect_match,
                    "role {:?} on matching {:?}",
                    role,
                    level
                );

                let expect_mismatch = *role == Role::SuperAdmin;
                assert_eq!(
                    authorize(&user, &mismatched, Access::ReadOnly).is_ok(),
                    expect_mismatch,
                    "role {:?} on mismatched {:?}",
                    role,
                    level
                );
            }
        }
    }

    #[test]
    fn departmental_admin_is_read_only() {
        let dept = EntityId::new();
        let user = scoped_user(Role::DepartmentalAdmin, dept);
        let scope = EntityScope {
            department_id: Some(dept),
            ..EntityScope::default()
        };

        assert!(authorize(&user, &scope, Access::ReadOnly).is_ok());
        let err = authorize(&user, &scope, Access::Full).unwrap_err();
        assert!(matches!(err, HierarchyError::AuthorizationDenied));
    }

    #[test]
    fn scoped_role_with_unset_scope_is_denied() {
        // Should not happen past the resolver's invariant check, but the
        // policy itself must not treat None == None as a match.
        let mut user = scoped_user(Role::HospitalAdmin, EntityId::new());
        user.hospital_id = None;
        let scope = EntityScope::default();
        assert!(authorize(&user, &scope, Access::ReadOnly).is_err());
    }
}
