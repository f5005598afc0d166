// models/src/identifiers.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ValidationError;

/// Opaque identifier for any stored entity. Ids are unique across all
/// collections, so a bare id is enough to address a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        EntityId(Uuid::new_v4())
    }

    pub fn nil() -> Self {
        EntityId(Uuid::nil())
    }

    /// The JSON value this id takes inside a stored document.
    pub fn as_value(&self) -> serde_json::Value {
        serde_json::Value::String(self.to_string())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for EntityId {
    fn from(id: Uuid) -> Self {
        EntityId(id)
    }
}

/// The named collections the repository contract exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    HealthSystems,
    Hospitals,
    Departments,
    Services,
    JobTypes,
    Users,
    AuditLogs,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::HealthSystems => "health_systems",
            Collection::Hospitals => "hospitals",
            Collection::Departments => "departments",
            Collection::Services => "services",
            Collection::JobTypes => "job_types",
            Collection::Users => "users",
            Collection::AuditLogs => "audit_logs",
        }
    }

    pub fn all() -> &'static [Collection] {
        &[
            Collection::HealthSystems,
            Collection::Hospitals,
            Collection::Departments,
            Collection::Services,
            Collection::JobTypes,
            Collection::Users,
            Collection::AuditLogs,
        ]
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownCollection(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_round_trips_through_str() {
        for c in Collection::all() {
            assert_eq!(c.as_str().parse::<Collection>().unwrap(), *c);
        }
    }

    #[test]
    fn unknown_collection_is_rejected() {
        assert!("wards".parse::<Collection>().is_err());
    }
}
