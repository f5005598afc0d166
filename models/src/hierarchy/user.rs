// models/src/hierarchy/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{ValidationError, ValidationResult};
use crate::identifiers::{Collection, EntityId};
use crate::roles::{Role, ScopeField};
use crate::Entity;

/// An administrative user resolved from an external authenticated subject.
///
/// A non-super_admin user carries exactly the scope foreign key matching its
/// role; any other role/scope-field combination is invalid state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    /// Stable subject string supplied by the identity provider.
    pub external_id: String,
    pub first: String,
    pub last: String,
    pub email: String,
    pub role: Role,
    pub health_system_id: Option<EntityId>,
    pub hospital_id: Option<EntityId>,
    pub department_id: Option<EntityId>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn scope_id(&self, field: ScopeField) -> Option<EntityId> {
        match field {
            ScopeField::HealthSystem => self.health_system_id,
            ScopeField::Hospital => self.hospital_id,
            ScopeField::Department => self.department_id,
        }
    }

    /// Checks the role/scope-field pairing invariant: the role's own scope
    /// field must be set and every other scope field must be unset.
    pub fn validate_scope(&self) -> ValidationResult<()> {
        let required = self.role.scope_field();
        for field in [
            ScopeField::HealthSystem,
            ScopeField::Hospital,
            ScopeField::Department,
        ] {
            let set = self.scope_id(field).is_some();
            let expected = required == Some(field);
            if set != expected {
                return Err(ValidationError::ScopeMismatch(self.role));
            }
        }
        Ok(())
    }
}

impl Entity for User {
    const COLLECTION: Collection = Collection::Users;

    fn id(&self) -> EntityId {
        self.id
    }
}
