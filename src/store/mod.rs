//! Record stores - durable CRUD storage the ledger persists books through.
//!
//! A store assigns ids on insert and tracks a version per record so that
//! callers can detect lost updates with a compare-and-swap `update`.
//!
//! ## Example
//!
//! ```ignore
//! use book_ledger::{InMemoryRecordStore, RecordStore};
//!
//! let store = InMemoryRecordStore::new();
//! let saved = store.insert(book)?;
//! let loaded = store.fetch::<Book>(saved.data.id().get())?;
//! ```

mod in_memory;
mod store;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Identifier assigned by a store on insert.
pub type RecordId = u64;

/// Trait for types that can be persisted in a record store.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Collection name for this record type. Maps to a table in SQL,
    /// a key prefix in KV stores, etc.
    const COLLECTION: &'static str;

    /// Returns the store-assigned identifier (0 before insert).
    fn id(&self) -> RecordId;

    /// Called by the store exactly once, on insert.
    fn assign_id(&mut self, id: RecordId);
}

/// A versioned wrapper around record data for optimistic concurrency control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    pub data: T,
    pub version: u64,
}

/// Error type for record store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Optimistic concurrency conflict.
    #[error("concurrency conflict on {collection}:{id} (expected version {expected}, actual {actual})")]
    ConcurrencyConflict {
        collection: String,
        id: RecordId,
        expected: u64,
        actual: u64,
    },
    /// Serialization/deserialization error.
    #[error("record serialization error: {0}")]
    Serde(String),
    /// Storage-level error.
    #[error("record storage error: {0}")]
    Storage(String),
    /// Record not found.
    #[error("record not found: {collection}:{id}")]
    NotFound { collection: String, id: RecordId },
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}

pub use in_memory::InMemoryRecordStore;
pub use store::RecordStore;
