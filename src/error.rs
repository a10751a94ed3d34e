use std::fmt;

use thiserror::Error;

use crate::book::BookId;
use crate::lock::LockError;
use crate::store::StoreError;

/// Result type alias for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Why a ledger operation reported "not found".
///
/// A lend against a book with no copies left is reported in the same error
/// class as a missing record; the reason tells the two apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    /// No record has the requested id.
    Missing,
    /// The record exists but has no available copies to lend.
    NoCopiesAvailable,
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundReason::Missing => write!(f, "no such book"),
            NotFoundReason::NoCopiesAvailable => write!(f, "no copies available"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Malformed input to `add` or `update`.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("book {id} not found: {reason}")]
    NotFound { id: BookId, reason: NotFoundReason },

    /// Returned only under `ReturnPolicy::Reject`.
    #[error("book {id} has all of its copies on the shelf")]
    AllCopiesReturned { id: BookId },

    /// The store saw a foreign write to a record this ledger held locked,
    /// e.g. a second ledger over the same store with its own lock manager.
    /// Optimistic mode retries conflicts instead of reporting them.
    #[error("book {id} was changed by a writer outside this ledger's locks")]
    Conflict { id: BookId },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Lock(#[from] LockError),
}

impl LedgerError {
    pub(crate) fn missing(id: BookId) -> Self {
        LedgerError::NotFound {
            id,
            reason: NotFoundReason::Missing,
        }
    }

    /// True for every `NotFound`, whatever the reason.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::NotFound { .. })
    }

    pub fn not_found_reason(&self) -> Option<NotFoundReason> {
        match self {
            LedgerError::NotFound { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}
