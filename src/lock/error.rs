use thiserror::Error;

/// Error type for lock operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockError {
    /// A thread panicked while holding the lock table or a record slot.
    #[error("lock poisoned: {0}")]
    Poisoned(String),
}
