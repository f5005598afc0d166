// models/src/hierarchy/job_type.rs

use serde::{Deserialize, Serialize};

use crate::identifiers::{Collection, EntityId};
use crate::Entity;

/// Provider job types scoped to a health system. A fixed default set is
/// seeded whenever a health system is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobType {
    pub id: EntityId,
    pub health_system_id: EntityId,
    pub code: String,
    pub name: String,
    pub is_default: bool,
    pub is_active: bool,
}

/// The seed set: (code, display name).
pub const DEFAULT_JOB_TYPES: &[(&str, &str)] = &[
    ("MD", "Physician"),
    ("NP", "Nurse Practitioner"),
    ("PA", "Physician Assistant"),
    ("RN", "Registered Nurse"),
    ("Fellow", "Fellow"),
    ("Resident", "Resident"),
];

impl JobType {
    /// Builds the default job-type records for a newly created health system.
    pub fn default_set(health_system_id: EntityId) -> Vec<JobType> {
        DEFAULT_JOB_TYPES
            .iter()
            .map(|(code, name)| JobType {
                id: EntityId::new(),
                health_system_id,
                code: (*code).to_string(),
                name: (*name).to_string(),
                is_default: true,
                is_active: true,
            })
            .collect()
    }
}

impl Entity for JobType {
    const COLLECTION: Collection = Collection::JobTypes;

    fn id(&self) -> EntityId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_carries_documented_codes() {
        let set = JobType::default_set(EntityId::new());
        let codes: Vec<&str> = set.iter().map(|j| j.code.as_str()).collect();
        assert_eq!(codes, ["MD", "NP", "PA", "RN", "Fellow", "Resident"]);
        assert!(set.iter().all(|j| j.is_default && j.is_active));
    }
}
