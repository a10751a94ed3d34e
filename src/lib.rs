//! # book_ledger
//!
//! A catalog of lendable books with strict accounting of available versus
//! owned copies.
//!
//! - **ledger**: `BookLedger`, atomic create/read/update/delete and lend/return
//! - **book**: the `Book` record and its copy-count transitions
//! - **store**: the `RecordStore` trait and an in-memory implementation
//! - **lock**: per-record locks used by the ledger's locking mode
//! - **config**: `LedgerConfig`, loadable from `BOOK_LEDGER_*` variables
//!
//! ```ignore
//! use book_ledger::{BookLedger, InMemoryRecordStore, NewBook};
//!
//! let ledger = BookLedger::new(InMemoryRecordStore::new());
//! let book = ledger.add(NewBook::new("Dune", "Frank Herbert", 3))?;
//! let book = ledger.lend(book.id())?;
//! assert_eq!(book.available_copies(), 2);
//! ```

mod book;
mod config;
mod error;
mod ledger;
mod lock;
mod store;

pub use book::{Book, BookChanges, BookId, NewBook};
pub use config::{ConcurrencyMode, LedgerConfig, ReturnPolicy};
pub use error::{LedgerError, NotFoundReason, Result};
pub use ledger::BookLedger;
pub use lock::{InMemoryLockManager, LockError, LockManager, RecordLockGuard};
pub use store::{InMemoryRecordStore, Record, RecordId, RecordStore, StoreError, Versioned};
