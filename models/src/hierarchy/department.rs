// models/src/hierarchy/department.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identifiers::{Collection, EntityId};
use crate::Entity;

/// A department belongs to one hospital. `health_system_id` is a denormalized
/// copy of the hospital's owning system and must always agree with it; it is
/// a derived back-reference, not an ownership edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: EntityId,
    pub hospital_id: EntityId,
    pub health_system_id: EntityId,
    pub name: String,
    pub is_default: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Department {
    pub fn new(hospital_id: EntityId, health_system_id: EntityId, name: String) -> Self {
        Department {
            id: EntityId::new(),
            hospital_id,
            health_system_id,
            name,
            is_default: false,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

impl Entity for Department {
    const COLLECTION: Collection = Collection::Departments;

    fn id(&self) -> EntityId {
        self.id
    }
}
