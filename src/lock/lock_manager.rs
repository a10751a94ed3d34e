use super::LockError;

/// Hands out exclusive, scoped access to a record by key.
///
/// `BookLedger` acquires the guard for `"books:<id>"` before fetching the
/// record and drops it after the write. Guards release on drop, so every
/// exit path of a transition frees the record.
pub trait LockManager: Send + Sync {
    /// Guard proving exclusive access to one key until dropped.
    type Guard<'a>
    where
        Self: 'a;

    /// Block until `key` is free, then hold it.
    fn acquire(&self, key: &str) -> Result<Self::Guard<'_>, LockError>;

    /// Hold `key` if it is free right now; `Ok(None)` if another caller has it.
    fn try_acquire(&self, key: &str) -> Result<Option<Self::Guard<'_>>, LockError>;
}
