// models/src/hierarchy/service.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identifiers::{Collection, EntityId};
use crate::Entity;

/// A staffed service line within a department. The staffing attributes are
/// opaque to the lifecycle core; services matter here only as cascade
/// targets and dependency blockers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: EntityId,
    pub department_id: EntityId,
    pub name: String,
    pub is_active: bool,
    pub provider_capacity: u32,
    pub shift_start: Option<String>,
    pub shift_end: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Service {
    pub fn new(department_id: EntityId, name: String, provider_capacity: u32) -> Self {
        Service {
            id: EntityId::new(),
            department_id,
            name,
            is_active: true,
            provider_capacity,
            shift_start: None,
            shift_end: None,
            created_at: Utc::now(),
        }
    }
}

impl Entity for Service {
    const COLLECTION: Collection = Collection::Services;

    fn id(&self) -> EntityId {
        self.id
    }
}
