// engine/src/audit.rs

use chrono::Utc;

use models::hierarchy::{AuditAction, AuditLog};
use models::{Collection, Document, EntityId, HierarchyResult};
use storage::WriteBatch;

/// Appends audit entries to mutation batches. Passed into each mutation as
/// an explicit collaborator rather than living behind a global sink; the
/// entry rides the same atomic batch as the writes it describes, so it is
/// recorded exactly once per successful mutation and never for a failed one.
#[derive(Debug, Clone, Default)]
pub struct AuditRecorder;

impl AuditRecorder {
    pub fn new() -> Self {
        AuditRecorder
    }

    /// Pushes one immutable audit entry as the final op of `batch`.
    /// `changes` carries the fields that changed, or the cascade's
    /// affected-counts map for a cascading deactivation.
    pub fn append(
        &self,
        batch: &mut WriteBatch,
        user_id: EntityId,
        action: AuditAction,
        resource_type: Collection,
        resource_id: EntityId,
        changes: Document,
    ) -> HierarchyResult<EntityId> {
        let entry = AuditLog {
            id: EntityId::new(),
            user_id,
            action,
            resource_type,
            resource_id,
            changes,
            timestamp: Utc::now().timestamp_millis(),
        };
        batch.insert_entity(&entry)
    }
}
