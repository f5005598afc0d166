// models/src/lib.rs

//! Shared domain types for the staffing hierarchy core: entity records,
//! roles, identifiers, the error taxonomy, and slug derivation.

pub mod errors;
pub mod hierarchy;
pub mod identifiers;
pub mod roles;
pub mod slug;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub use errors::{Blocker, HierarchyError, HierarchyResult, ValidationError, ValidationResult};
pub use identifiers::{Collection, EntityId};
pub use roles::{Role, ScopeField};

/// Schemaless document shape the repository stores.
pub type Document = serde_json::Map<String, Value>;

/// A typed entity that round-trips through a repository [`Document`].
///
/// The struct's `id` field is carried inside the document as well; the
/// repository keeps the stored id and the `"id"` field consistent.
pub trait Entity: Serialize + DeserializeOwned {
    const COLLECTION: Collection;

    fn id(&self) -> EntityId;

    fn to_document(&self) -> HierarchyResult<Document> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(HierarchyError::Internal(format!(
                "entity serialized to non-object JSON: {}",
                other
            ))),
        }
    }

    fn from_document(doc: Document) -> HierarchyResult<Self> {
        Ok(serde_json::from_value(Value::Object(doc))?)
    }
}
