// storage/src/lib.rs

//! Repository contract the hierarchy core depends on, and the in-memory
//! engine that implements it. The core never sees how rows are persisted;
//! it sees named collections with primary-key, parent-foreign-key and
//! unique-key access plus an atomic write-batch commit.

pub mod memory;
pub mod repository;

pub use memory::InMemoryRepository;
pub use repository::{EntityRepository, RepositoryExt, StoredDocument, WriteBatch, WriteOp};
