// engine/src/scope.rs

use models::{Collection, HierarchyResult, ValidationError};
use security::EntityScope;
use storage::{EntityRepository, StoredDocument};

/// Computes the scope coordinates of a stored entity for authorization.
///
/// Each level fills its own id plus the parent ids carried on the row;
/// services need one extra hop through their department to reach the
/// hospital and health-system ids. Departments use their denormalized
/// `health_system_id` directly. Rows outside the hierarchy (users, audit
/// logs) have no scope coordinates, which the policy table resolves to
/// super_admin-only access.
pub async fn resolve_entity_scope(
    repo: &dyn EntityRepository,
    stored: &StoredDocument,
) -> HierarchyResult<EntityScope> {
    let mut scope = EntityScope::default();
    match stored.collection {
        Collection::HealthSystems => {
            scope.health_system_id = Some(stored.id);
        }
        Collection::Hospitals => {
            scope.health_system_id = Some(require_fk(stored, "health_system_id")?);
            scope.hospital_id = Some(stored.id);
        }
        Collection::Departments => {
            scope.health_system_id = Some(require_fk(stored, "health_system_id")?);
            scope.hospital_id = Some(require_fk(stored, "hospital_id")?);
            scope.department_id = Some(stored.id);
        }
        Collection::Services => {
            let department_id = require_fk(stored, "department_id")?;
            scope.department_id = Some(department_id);
            if let Some(department) = repo.get(department_id).await? {
                scope.health_system_id = department.foreign_key("health_system_id");
                scope.hospital_id = department.foreign_key("hospital_id");
            }
        }
        Collection::JobTypes => {
            scope.health_system_id = Some(require_fk(stored, "health_system_id")?);
        }
        Collection::Users | Collection::AuditLogs => {}
    }
    Ok(scope)
}

fn require_fk(
    stored: &StoredDocument,
    field: &'static str,
) -> Result<models::EntityId, ValidationError> {
    stored
        .foreign_key(field)
        .ok_or(ValidationError::MalformedField(field))
}
