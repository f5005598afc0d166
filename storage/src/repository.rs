// storage/src/repository.rs

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

use models::{Collection, Document, Entity, EntityId, HierarchyError, HierarchyResult};

/// A stored row: its id, the collection it lives in, and its document.
/// The document always carries an `"id"` field equal to `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: EntityId,
    pub collection: Collection,
    pub doc: Document,
}

impl StoredDocument {
    pub fn decode<E: Entity>(self) -> HierarchyResult<E> {
        E::from_document(self.doc)
    }

    /// Reads the `is_active` flag; rows without one are treated as active
    /// for cascade purposes (they have nothing to flip back).
    pub fn is_active(&self) -> bool {
        self.doc
            .get("is_active")
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }

    /// Reads a foreign-key field as an id, if present and well-formed.
    pub fn foreign_key(&self, field: &str) -> Option<EntityId> {
        self.doc
            .get(field)
            .and_then(Value::as_str)
            .and_then(|s| uuid::Uuid::parse_str(s).ok())
            .map(EntityId::from)
    }
}

/// One write in a batch. Inserts carry a caller-allocated id so a planned
/// batch can cross-reference rows it is about to create.
#[derive(Debug, Clone)]
pub enum WriteOp {
    Insert {
        collection: Collection,
        id: EntityId,
        doc: Document,
    },
    Patch {
        id: EntityId,
        partial: Document,
    },
    Delete {
        id: EntityId,
    },
}

/// An ordered set of writes applied atomically: every op takes effect or
/// none do. Each mutation of the hierarchy core is planned into exactly one
/// batch (its audit entry included) and committed once.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_entity<E: Entity>(&mut self, entity: &E) -> HierarchyResult<EntityId> {
        let id = entity.id();
        self.ops.push(WriteOp::Insert {
            collection: E::COLLECTION,
            id,
            doc: entity.to_document()?,
        });
        Ok(id)
    }

    pub fn insert(&mut self, collection: Collection, id: EntityId, doc: Document) {
        self.ops.push(WriteOp::Insert { collection, id, doc });
    }

    pub fn patch(&mut self, id: EntityId, partial: Document) {
        self.ops.push(WriteOp::Patch { id, partial });
    }

    pub fn delete(&mut self, id: EntityId) {
        self.ops.push(WriteOp::Delete { id });
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}

/// The persistent-storage contract (§ repository): indexed lookups over
/// named collections plus atomic batch commit. Implementations decide
/// ordering of `query_by_foreign_key` results; callers must not depend on
/// it unless the implementation documents one.
#[async_trait]
pub trait EntityRepository: Send + Sync + fmt::Debug {
    /// Primary-key lookup across all collections.
    async fn get(&self, id: EntityId) -> HierarchyResult<Option<StoredDocument>>;

    /// All rows in `collection` whose `field` equals `value`.
    async fn query_by_foreign_key(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> HierarchyResult<Vec<StoredDocument>>;

    /// Every row in `collection`, in the same implementation-defined order
    /// as `query_by_foreign_key`.
    async fn scan(&self, collection: Collection) -> HierarchyResult<Vec<StoredDocument>>;

    /// At most one row, by a declared unique index.
    async fn query_by_unique_key(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> HierarchyResult<Option<StoredDocument>>;

    /// Applies the whole batch atomically, or rejects it without applying
    /// any op (unique-key violation, missing patch/delete target,
    /// duplicate inserted id).
    async fn commit(&self, batch: WriteBatch) -> HierarchyResult<()>;

    /// Single-row insert; a one-op batch.
    async fn insert(&self, collection: Collection, doc: Document) -> HierarchyResult<EntityId> {
        let id = EntityId::new();
        let mut batch = WriteBatch::new();
        batch.insert(collection, id, doc);
        self.commit(batch).await?;
        Ok(id)
    }

    /// Single-row partial update; a one-op batch.
    async fn patch(&self, id: EntityId, partial: Document) -> HierarchyResult<()> {
        let mut batch = WriteBatch::new();
        batch.patch(id, partial);
        self.commit(batch).await
    }
}

/// Typed helpers over the object-safe contract. Blanket-implemented so they
/// are callable through `Arc<dyn EntityRepository>`.
#[async_trait]
pub trait RepositoryExt: EntityRepository {
    /// Typed convenience over [`EntityRepository::get`].
    async fn get_entity<E: Entity + Send>(&self, id: EntityId) -> HierarchyResult<Option<E>> {
        match self.get(id).await? {
            Some(stored) if stored.collection == E::COLLECTION => {
                Ok(Some(stored.decode::<E>()?))
            }
            _ => Ok(None),
        }
    }

    /// Typed lookup that treats absence as [`HierarchyError::NotFound`].
    async fn require_entity<E: Entity + Send>(&self, id: EntityId) -> HierarchyResult<E> {
        self.get_entity(id)
            .await?
            .ok_or(HierarchyError::NotFound(id))
    }
}

#[async_trait]
impl<T: EntityRepository + ?Sized> RepositoryExt for T {}
