// security/src/identity.rs

use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use models::hierarchy::User;
use models::{Collection, Entity, HierarchyError, HierarchyResult};
use storage::EntityRepository;

/// Maps an external authenticated subject to the internal user record,
/// through the `users.external_id` unique index.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    repo: Arc<dyn EntityRepository>,
}

impl IdentityResolver {
    pub fn new(repo: Arc<dyn EntityRepository>) -> Self {
        IdentityResolver { repo }
    }

    /// Soft lookup for queries: no subject or no matching user is `None`,
    /// never an error, so unauthenticated callers learn nothing about what
    /// exists.
    pub async fn resolve(&self, subject: Option<&str>) -> HierarchyResult<Option<User>> {
        let Some(subject) = subject else {
            return Ok(None);
        };
        let stored = self
            .repo
            .query_by_unique_key(Collection::Users, "external_id", &json!(subject))
            .await?;
        let Some(stored) = stored else {
            return Ok(None);
        };
        let user: User = User::from_document(stored.doc)?;
        if let Err(err) = user.validate_scope() {
            // A stored user violating the role/scope pairing is corrupt
            // state, not a deniable request.
            warn!(user = %user.id, %err, "user record fails scope invariant");
            return Err(HierarchyError::Internal(format!(
                "user {} has invalid role/scope pairing",
                user.id
            )));
        }
        Ok(Some(user))
    }

    /// Hard lookup for mutations: absence of a resolvable identity fails
    /// with `AuthenticationRequired`.
    pub async fn require(&self, subject: Option<&str>) -> HierarchyResult<User> {
        self.resolve(subject)
            .await?
            .ok_or(HierarchyError::AuthenticationRequired)
    }
}
