// models/src/hierarchy/mod.rs

//! One file per entity in the containment chain
//! HealthSystem → Hospital → Department → Service, plus users, job types
//! and the append-only audit log.

pub mod audit_log;
pub mod department;
pub mod health_system;
pub mod hospital;
pub mod job_type;
pub mod service;
pub mod user;

pub use audit_log::{AuditAction, AuditLog};
pub use department::Department;
pub use health_system::HealthSystem;
pub use hospital::Hospital;
pub use job_type::JobType;
pub use service::Service;
pub use user::User;
