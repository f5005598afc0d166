// engine/src/lib.rs

//! Hierarchical resource lifecycle and cascade-integrity engine.
//!
//! Control flow for a mutation: identity resolution → scope authorization →
//! dependency check or cascade planning → repository writes → audit append,
//! with all writes and the audit entry committed as one atomic batch.
//! Queries skip the cascade/dependency stage and fail softly for
//! unauthenticated callers.

pub mod audit;
pub mod cascade;
pub mod dependency;
pub mod scope;
pub mod service;

pub use audit::AuditRecorder;
pub use cascade::{plan_deactivation_cascade, CascadeCounts, HierarchyEdge, HIERARCHY_EDGES};
pub use dependency::{can_delete, DeleteCheck};
pub use scope::resolve_entity_scope;
pub use service::{CreatedHealthSystem, HierarchyService, ToggleOutcome};
