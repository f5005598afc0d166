// security/src/lib.rs

//! Identity resolution (external subject → internal user) and the
//! declarative scope-authorization policy.

pub mod identity;
pub mod policy;

pub use identity::IdentityResolver;
pub use policy::{authorize, Access, EntityScope};
