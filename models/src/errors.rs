// models/src/errors.rs

pub use thiserror::Error;

use crate::identifiers::EntityId;
use crate::roles::Role;

/// A dependent record that prevents hard deletion of an ancestor.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Blocker {
    /// Collection name of the blocking rows, e.g. `"services"`.
    pub entity_type: String,
    pub count: u64,
}

/// Error taxonomy for the hierarchy core. Callers dispatch on variant,
/// never on message text.
#[derive(Debug, Error)]
pub enum HierarchyError {
    /// A mutation was attempted without a resolvable identity.
    #[error("authentication required")]
    AuthenticationRequired,
    /// The resolved user's role or scope does not cover the target entity.
    #[error("not authorized to act on this resource")]
    AuthorizationDenied,
    #[error("entity {0} was not found")]
    NotFound(EntityId),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Existing dependents prevent the requested hard delete.
    #[error("cannot delete: {} blocking entity type(s)", blockers.len())]
    Conflict { blockers: Vec<Blocker> },
    #[error("storage error: {0}")]
    Storage(String),
    #[error("internal error: {0}")]
    Internal(String),
}

/// A validation error.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,
    /// Slug derivation produced an empty string (name had no alphanumerics).
    #[error("name '{0}' does not yield a usable slug")]
    UnusableSlug(String),
    #[error("slug '{0}' is already in use")]
    DuplicateSlug(String),
    /// A non-super_admin user record missing (or carrying the wrong) scope
    /// field for its role is invalid state, not a deniable request.
    #[error("user scope field does not match role {0:?}")]
    ScopeMismatch(Role),
    #[error("document field '{0}' is missing or malformed")]
    MalformedField(&'static str),
    #[error("unknown collection '{0}'")]
    UnknownCollection(String),
    #[error("invalid date range")]
    InvalidDateRange,
}

/// A type alias for a `Result` that returns a `HierarchyError` on failure.
pub type HierarchyResult<T> = Result<T, HierarchyError>;

/// A type alias for a `Result` that returns a `ValidationError` on failure.
pub type ValidationResult<T> = Result<T, ValidationError>;

impl From<serde_json::Error> for HierarchyError {
    fn from(err: serde_json::Error) -> Self {
        HierarchyError::Internal(format!("JSON processing error: {}", err))
    }
}
