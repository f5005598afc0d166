// models/src/hierarchy/hospital.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identifiers::{Collection, EntityId};
use crate::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: EntityId,
    pub health_system_id: EntityId,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Hospital {
    pub fn new(health_system_id: EntityId, name: String) -> Self {
        Hospital {
            id: EntityId::new(),
            health_system_id,
            name,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

impl Entity for Hospital {
    const COLLECTION: Collection = Collection::Hospitals;

    fn id(&self) -> EntityId {
        self.id
    }
}
