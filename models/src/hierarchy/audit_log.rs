// models/src/hierarchy/audit_log.rs

use serde::{Deserialize, Serialize};

use crate::identifiers::{Collection, EntityId};
use crate::{Document, Entity};

/// Kinds of state-changing actions recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Activate,
    Deactivate,
    Delete,
}

/// One append-only audit entry. Rows in `audit_logs` are never patched or
/// deleted by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: EntityId,
    pub user_id: EntityId,
    pub action: AuditAction,
    pub resource_type: Collection,
    pub resource_id: EntityId,
    /// Key-value snapshot: changed fields, or the cascade's affected-counts
    /// map for a cascading deactivation.
    pub changes: Document,
    /// Server timestamp, epoch milliseconds.
    pub timestamp: i64,
}

impl Entity for AuditLog {
    const COLLECTION: Collection = Collection::AuditLogs;

    fn id(&self) -> EntityId {
        self.id
    }
}
