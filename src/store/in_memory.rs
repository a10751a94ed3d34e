//! InMemoryRecordStore - record store kept in process memory, for tests and embedding.
//!
//! Layout: a `HashMap` from collection name to a `BTreeMap` of that
//! collection's records keyed by id, so `fetch_all` walks ids in order.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use super::{Record, RecordId, RecordStore, StoreError, Versioned};

/// Internal stored representation of a record.
struct StoredRecord {
    bytes: Vec<u8>,
    version: u64,
}

type Collections = HashMap<&'static str, BTreeMap<RecordId, StoredRecord>>;

/// In-memory record store.
///
/// Records are kept as serde_json bytes so every read hands out an owned
/// copy. Clone-friendly via Arc: clones share storage and the id sequence,
/// while `new()` always starts an isolated, empty store.
#[derive(Clone)]
pub struct InMemoryRecordStore {
    storage: Arc<RwLock<Collections>>,
    next_id: Arc<AtomicU64>,
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRecordStore {
    /// Create a new empty record store.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Number of records stored in the collection of `R`.
    pub fn len<R: Record>(&self) -> Result<usize, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;
        Ok(storage.get(R::COLLECTION).map_or(0, BTreeMap::len))
    }

    fn decode<R: Record>(stored: &StoredRecord) -> Result<Versioned<R>, StoreError> {
        let data: R = serde_json::from_slice(&stored.bytes)?;
        Ok(Versioned {
            data,
            version: stored.version,
        })
    }
}

impl RecordStore for InMemoryRecordStore {
    fn insert<R: Record>(&self, mut record: R) -> Result<Versioned<R>, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        record.assign_id(id);
        let bytes = serde_json::to_vec(&record)?;

        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        storage
            .entry(R::COLLECTION)
            .or_default()
            .insert(id, StoredRecord { bytes, version: 1 });

        Ok(Versioned {
            data: record,
            version: 1,
        })
    }

    fn fetch<R: Record>(&self, id: RecordId) -> Result<Option<Versioned<R>>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        match storage.get(R::COLLECTION).and_then(|records| records.get(&id)) {
            Some(stored) => Self::decode(stored).map(Some),
            None => Ok(None),
        }
    }

    fn fetch_all<R: Record>(&self) -> Result<Vec<Versioned<R>>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        match storage.get(R::COLLECTION) {
            Some(records) => records.values().map(Self::decode).collect(),
            None => Ok(Vec::new()),
        }
    }

    fn update<R: Record>(
        &self,
        record: &R,
        expected_version: u64,
    ) -> Result<Versioned<R>, StoreError> {
        let bytes = serde_json::to_vec(record)?;

        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        let stored = storage
            .get_mut(R::COLLECTION)
            .and_then(|records| records.get_mut(&record.id()))
            .ok_or_else(|| StoreError::NotFound {
                collection: R::COLLECTION.to_string(),
                id: record.id(),
            })?;

        if stored.version != expected_version {
            return Err(StoreError::ConcurrencyConflict {
                collection: R::COLLECTION.to_string(),
                id: record.id(),
                expected: expected_version,
                actual: stored.version,
            });
        }

        stored.bytes = bytes;
        stored.version += 1;

        Ok(Versioned {
            data: record.clone(),
            version: stored.version,
        })
    }

    fn remove<R: Record>(&self, id: RecordId) -> Result<bool, StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        Ok(storage
            .get_mut(R::COLLECTION)
            .map_or(false, |records| records.remove(&id).is_some()))
    }
}
