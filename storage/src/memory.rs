// storage/src/memory.rs

//! The in-memory repository implementation. Simplest engine that satisfies
//! the contract; data lives only as long as the process. Commit clones the
//! state, applies the batch to the clone, and swaps it in on success, so a
//! rejected batch leaves nothing behind and readers never observe a
//! half-applied cascade.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use models::{Collection, EntityId, HierarchyError, HierarchyResult};

use crate::repository::{EntityRepository, StoredDocument, WriteBatch, WriteOp};

use async_trait::async_trait;

/// Declared unique indexes: (collection, field).
const UNIQUE_INDEXES: &[(Collection, &str)] = &[
    (Collection::HealthSystems, "slug"),
    (Collection::Users, "external_id"),
];

#[derive(Debug, Clone, Default)]
struct MemoryState {
    docs: HashMap<EntityId, StoredDocument>,
    /// Per-collection insertion order; this is the documented
    /// implementation-defined order of `query_by_foreign_key`.
    order: HashMap<Collection, Vec<EntityId>>,
}

impl MemoryState {
    fn rows(&self, collection: Collection) -> impl Iterator<Item = &StoredDocument> {
        self.order
            .get(&collection)
            .into_iter()
            .flatten()
            .filter_map(|id| self.docs.get(id))
    }

    fn check_unique(
        &self,
        collection: Collection,
        doc: &serde_json::Map<String, Value>,
        skip_id: Option<EntityId>,
    ) -> HierarchyResult<()> {
        for (indexed_collection, field) in UNIQUE_INDEXES {
            if *indexed_collection != collection {
                continue;
            }
            let Some(value) = doc.get(*field) else {
                continue;
            };
            let clash = self
                .rows(collection)
                .any(|row| Some(row.id) != skip_id && row.doc.get(*field) == Some(value));
            if clash {
                return Err(HierarchyError::Storage(format!(
                    "unique index violation on {}.{}",
                    collection, field
                )));
            }
        }
        Ok(())
    }

    fn apply(&mut self, op: WriteOp) -> HierarchyResult<()> {
        match op {
            WriteOp::Insert {
                collection,
                id,
                mut doc,
            } => {
                if self.docs.contains_key(&id) {
                    return Err(HierarchyError::Storage(format!(
                        "duplicate id {} in insert",
                        id
                    )));
                }
                self.check_unique(collection, &doc, None)?;
                doc.insert("id".to_string(), id.as_value());
                self.docs.insert(
                    id,
                    StoredDocument {
                        id,
                        collection,
                        doc,
                    },
                );
                self.order.entry(collection).or_default().push(id);
                Ok(())
            }
            WriteOp::Patch { id, partial } => {
                let stored = self.docs.get(&id).ok_or(HierarchyError::NotFound(id))?;
                if stored.collection == Collection::AuditLogs {
                    return Err(HierarchyError::Storage(
                        "audit_logs is append-only".to_string(),
                    ));
                }
                let collection = stored.collection;
                let mut merged = stored.doc.clone();
                for (key, value) in partial {
                    if key == "id" {
                        continue;
                    }
                    merged.insert(key, value);
                }
                self.check_unique(collection, &merged, Some(id))?;
                if let Some(stored) = self.docs.get_mut(&id) {
                    stored.doc = merged;
                }
                Ok(())
            }
            WriteOp::Delete { id } => {
                let stored = self.docs.get(&id).ok_or(HierarchyError::NotFound(id))?;
                if stored.collection == Collection::AuditLogs {
                    return Err(HierarchyError::Storage(
                        "audit_logs is append-only".to_string(),
                    ));
                }
                let collection = stored.collection;
                self.docs.remove(&id);
                if let Some(ids) = self.order.get_mut(&collection) {
                    ids.retain(|existing| *existing != id);
                }
                Ok(())
            }
        }
    }
}

/// In-memory [`EntityRepository`].
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row count in one collection; test and introspection helper.
    pub async fn count(&self, collection: Collection) -> usize {
        self.state
            .read()
            .await
            .order
            .get(&collection)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl EntityRepository for InMemoryRepository {
    async fn get(&self, id: EntityId) -> HierarchyResult<Option<StoredDocument>> {
        let state = self.state.read().await;
        Ok(state.docs.get(&id).cloned())
    }

    async fn query_by_foreign_key(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> HierarchyResult<Vec<StoredDocument>> {
        let state = self.state.read().await;
        Ok(state
            .rows(collection)
            .filter(|row| row.doc.get(field) == Some(value))
            .cloned()
            .collect())
    }

    async fn scan(&self, collection: Collection) -> HierarchyResult<Vec<StoredDocument>> {
        let state = self.state.read().await;
        Ok(state.rows(collection).cloned().collect())
    }

    async fn query_by_unique_key(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> HierarchyResult<Option<StoredDocument>> {
        let state = self.state.read().await;
        let found = state
            .rows(collection)
            .find(|row| row.doc.get(field) == Some(value))
            .cloned();
        Ok(found)
    }

    async fn commit(&self, batch: WriteBatch) -> HierarchyResult<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut state = self.state.write().await;
        // Validate-by-applying on a scratch copy; swap in only on success.
        let mut staged = state.clone();
        let op_count = batch.len();
        for op in batch.into_ops() {
            staged.apply(op)?;
        }
        *state = staged;
        debug!(ops = op_count, "committed write batch");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(pairs: &[(&str, Value)]) -> models::Document {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn rejected_batch_leaves_no_rows() {
        let repo = InMemoryRepository::new();
        repo.insert(
            Collection::HealthSystems,
            doc(&[("name", json!("Metro")), ("slug", json!("metro"))]),
        )
        .await
        .unwrap();

        let mut batch = WriteBatch::new();
        batch.insert(
            Collection::Hospitals,
            EntityId::new(),
            doc(&[("name", json!("General"))]),
        );
        // Second op violates the slug unique index; the whole batch must die.
        batch.insert(
            Collection::HealthSystems,
            EntityId::new(),
            doc(&[("name", json!("Metro 2")), ("slug", json!("metro"))]),
        );

        assert!(repo.commit(batch).await.is_err());
        assert_eq!(repo.count(Collection::Hospitals).await, 0);
        assert_eq!(repo.count(Collection::HealthSystems).await, 1);
    }

    #[tokio::test]
    async fn patch_merges_top_level_fields() {
        let repo = InMemoryRepository::new();
        let id = repo
            .insert(
                Collection::Services,
                doc(&[("name", json!("ICU")), ("is_active", json!(true))]),
            )
            .await
            .unwrap();

        repo.patch(id, doc(&[("is_active", json!(false))]))
            .await
            .unwrap();

        let stored = repo.get(id).await.unwrap().unwrap();
        assert_eq!(stored.doc.get("name"), Some(&json!("ICU")));
        assert!(!stored.is_active());
        // the id field is maintained by the store
        assert_eq!(stored.doc.get("id"), Some(&id.as_value()));
    }

    #[tokio::test]
    async fn patch_of_missing_row_is_not_found() {
        let repo = InMemoryRepository::new();
        let err = repo
            .patch(EntityId::new(), doc(&[("is_active", json!(false))]))
            .await
            .unwrap_err();
        assert!(matches!(err, HierarchyError::NotFound(_)));
    }

    #[tokio::test]
    async fn audit_rows_cannot_be_patched_or_deleted() {
        let repo = InMemoryRepository::new();
        let id = repo
            .insert(Collection::AuditLogs, doc(&[("action", json!("create"))]))
            .await
            .unwrap();

        assert!(repo
            .patch(id, doc(&[("action", json!("delete"))]))
            .await
            .is_err());

        let mut batch = WriteBatch::new();
        batch.delete(id);
        assert!(repo.commit(batch).await.is_err());
        assert_eq!(repo.count(Collection::AuditLogs).await, 1);
    }

    #[tokio::test]
    async fn unique_key_lookup_returns_the_indexed_row() {
        let repo = InMemoryRepository::new();
        let id = repo
            .insert(
                Collection::HealthSystems,
                doc(&[("name", json!("Metro")), ("slug", json!("metro"))]),
            )
            .await
            .unwrap();

        let found = repo
            .query_by_unique_key(Collection::HealthSystems, "slug", &json!("metro"))
            .await
            .unwrap();
        assert_eq!(found.map(|row| row.id), Some(id));

        let missing = repo
            .query_by_unique_key(Collection::HealthSystems, "slug", &json!("gone"))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn foreign_key_queries_see_only_matching_rows() {
        let repo = InMemoryRepository::new();
        let parent = EntityId::new();
        let other = EntityId::new();
        for (name, owner) in [("a", parent), ("b", parent), ("c", other)] {
            repo.insert(
                Collection::Hospitals,
                doc(&[
                    ("name", json!(name)),
                    ("health_system_id", owner.as_value()),
                ]),
            )
            .await
            .unwrap();
        }

        let rows = repo
            .query_by_foreign_key(Collection::Hospitals, "health_system_id", &parent.as_value())
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.foreign_key("health_system_id") == Some(parent)));
    }
}
