// models/src/hierarchy/health_system.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identifiers::{Collection, EntityId};
use crate::Entity;

/// Top of the containment chain. `slug` is unique across all health systems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSystem {
    pub id: EntityId,
    pub name: String,
    pub slug: String,
    pub is_active: bool,
    pub created_by: EntityId,
    pub created_at: DateTime<Utc>,
}

impl HealthSystem {
    pub fn new(name: String, slug: String, created_by: EntityId) -> Self {
        HealthSystem {
            id: EntityId::new(),
            name,
            slug,
            is_active: true,
            created_by,
            created_at: Utc::now(),
        }
    }
}

impl Entity for HealthSystem {
    const COLLECTION: Collection = Collection::HealthSystems;

    fn id(&self) -> EntityId {
        self.id
    }
}
