//! RecordStore - Abstract CRUD storage for records.

use super::{Record, RecordId, StoreError, Versioned};

/// Abstract CRUD storage for records.
///
/// Every method is atomic for a single record. Composing several calls
/// (read, modify, write) is not; callers that need that pass the version
/// they read back into `update`, or serialize access per record.
pub trait RecordStore: Send + Sync {
    /// Insert a new record, assigning it a fresh id. The stored copy starts at version 1.
    fn insert<R: Record>(&self, record: R) -> Result<Versioned<R>, StoreError>;

    /// Fetch a record by id. Returns None if not found.
    fn fetch<R: Record>(&self, id: RecordId) -> Result<Option<Versioned<R>>, StoreError>;

    /// Fetch every record of the collection, ordered by id.
    fn fetch_all<R: Record>(&self) -> Result<Vec<Versioned<R>>, StoreError>;

    /// Replace an existing record if its stored version still equals `expected_version`.
    fn update<R: Record>(
        &self,
        record: &R,
        expected_version: u64,
    ) -> Result<Versioned<R>, StoreError>;

    /// Remove a record by id. Returns true if it existed.
    fn remove<R: Record>(&self, id: RecordId) -> Result<bool, StoreError>;
}
