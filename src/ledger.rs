//! BookLedger - atomic CRUD and lend/return transitions over a record store.

use std::thread;

use tracing::{debug, info, warn};

use crate::book::{Book, BookChanges, BookId, NewBook};
use crate::config::{ConcurrencyMode, LedgerConfig, ReturnPolicy};
use crate::error::{LedgerError, NotFoundReason, Result};
use crate::lock::{InMemoryLockManager, LockManager};
use crate::store::{Record, RecordStore, StoreError, Versioned};

/// Repository-style access to Book records.
///
/// Reads go straight to the store. Mutations of an existing record are
/// read-modify-write cycles made serializable per record by the configured
/// `ConcurrencyMode`; different records never contend. Share a ledger
/// between threads with `Arc`.
pub struct BookLedger<S, L = InMemoryLockManager> {
    store: S,
    locks: L,
    config: LedgerConfig,
}

impl<S: RecordStore> BookLedger<S> {
    /// Ledger with default configuration and an in-memory lock manager.
    pub fn new(store: S) -> Self {
        Self::with_config(store, LedgerConfig::default())
    }

    pub fn with_config(store: S, config: LedgerConfig) -> Self {
        Self::with_lock_manager(store, InMemoryLockManager::new(), config)
    }
}

impl<S: RecordStore, L: LockManager> BookLedger<S, L> {
    /// Ledger that takes record locks from `locks`, e.g. one shared with other ledgers.
    pub fn with_lock_manager(store: S, locks: L, config: LedgerConfig) -> Self {
        BookLedger {
            store,
            locks,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Every stored book, ordered by id.
    pub fn list_all(&self) -> Result<Vec<Book>> {
        let books: Vec<Book> = self
            .store
            .fetch_all::<Book>()?
            .into_iter()
            .map(|v| v.data)
            .collect();
        debug!(count = books.len(), "listed books");
        Ok(books)
    }

    /// The book with `id`, or `None` if there is none.
    pub fn get_by_id(&self, id: BookId) -> Result<Option<Book>> {
        let book = self.store.fetch::<Book>(id.get())?.map(|v| v.data);
        debug!(book_id = %id, found = book.is_some(), "fetched book");
        Ok(book)
    }

    /// Validate and insert a new book. The store assigns its id.
    pub fn add(&self, new_book: NewBook) -> Result<Book> {
        let book = new_book.into_book()?;
        let saved = self.store.insert(book)?.data;
        info!(
            book_id = %saved.id(),
            copies = saved.copies(),
            available_copies = saved.available_copies(),
            "added book"
        );
        Ok(saved)
    }

    /// Apply field edits to an existing book, re-checking the copy-count invariant.
    ///
    /// The whole edited record is validated, not just the changed fields. A
    /// book over-returned under `ReturnPolicy::Unchecked` therefore rejects
    /// every edit until the same change brings `available_copies` back within
    /// `copies` (or raises `copies`).
    pub fn update(&self, id: BookId, changes: &BookChanges) -> Result<Book> {
        let updated = self.transition(id, |book| {
            *book = changes.apply_to(book)?;
            Ok(())
        })?;
        info!(book_id = %id, "updated book");
        Ok(updated)
    }

    /// Remove a book. Deleting an id that is not stored fails with `NotFound`.
    pub fn delete(&self, id: BookId) -> Result<()> {
        let removed = match self.config.concurrency {
            ConcurrencyMode::Locking => {
                let _guard = self.locks.acquire(&Self::lock_key(id))?;
                self.store.remove::<Book>(id.get())?
            }
            ConcurrencyMode::Optimistic => self.store.remove::<Book>(id.get())?,
        };

        if !removed {
            debug!(book_id = %id, "delete of unknown book");
            return Err(LedgerError::missing(id));
        }
        info!(book_id = %id, "deleted book");
        Ok(())
    }

    /// Take one copy off the shelf.
    ///
    /// Fails with `NotFound` when the book is missing or has no available
    /// copies; `LedgerError::not_found_reason` tells which.
    pub fn lend(&self, id: BookId) -> Result<Book> {
        match self.transition(id, Book::lend) {
            Ok(book) => {
                info!(book_id = %id, available_copies = book.available_copies(), "lent book");
                Ok(book)
            }
            Err(err) => {
                if err.not_found_reason() == Some(NotFoundReason::NoCopiesAvailable) {
                    warn!(book_id = %id, "lend refused, no copies available");
                }
                Err(err)
            }
        }
    }

    /// Put one copy back on the shelf, bounded by the configured `ReturnPolicy`.
    pub fn return_book(&self, id: BookId) -> Result<Book> {
        let policy = self.config.return_policy;
        let book = self.transition(id, |book| book.return_copy(policy))?;

        if policy == ReturnPolicy::Unchecked && book.available_copies() > book.copies() {
            warn!(
                book_id = %id,
                copies = book.copies(),
                available_copies = book.available_copies(),
                "more copies returned than the book owns"
            );
        } else {
            info!(book_id = %id, available_copies = book.available_copies(), "returned book");
        }
        Ok(book)
    }

    fn transition<F>(&self, id: BookId, apply: F) -> Result<Book>
    where
        F: Fn(&mut Book) -> Result<()>,
    {
        match self.config.concurrency {
            ConcurrencyMode::Locking => {
                let _guard = self.locks.acquire(&Self::lock_key(id))?;
                let current = self.fetch_existing(id)?;
                let mut book = current.data;
                apply(&mut book)?;
                self.store
                    .update(&book, current.version)
                    .map(|v| v.data)
                    .map_err(|err| Self::write_error(id, err))
            }
            // Each conflict means another writer committed, so this loop only
            // spins while others make progress. A refusal always comes from
            // `apply` on a fresh read, never from contention.
            ConcurrencyMode::Optimistic => {
                let mut attempt: u32 = 1;
                loop {
                    let current = self.fetch_existing(id)?;
                    let mut book = current.data;
                    apply(&mut book)?;

                    match self.store.update(&book, current.version) {
                        Ok(saved) => return Ok(saved.data),
                        Err(StoreError::ConcurrencyConflict { actual, .. }) => {
                            debug!(
                                book_id = %id,
                                attempt,
                                expected = current.version,
                                actual,
                                "version conflict, retrying"
                            );
                            attempt = attempt.saturating_add(1);
                            thread::yield_now();
                        }
                        Err(err) => return Err(Self::write_error(id, err)),
                    }
                }
            }
        }
    }

    fn fetch_existing(&self, id: BookId) -> Result<Versioned<Book>> {
        self.store
            .fetch::<Book>(id.get())?
            .ok_or_else(|| LedgerError::missing(id))
    }

    fn write_error(id: BookId, err: StoreError) -> LedgerError {
        match err {
            StoreError::NotFound { .. } => LedgerError::missing(id),
            StoreError::ConcurrencyConflict { expected, actual, .. } => {
                warn!(book_id = %id, expected, actual, "record changed while its lock was held");
                LedgerError::Conflict { id }
            }
            other => other.into(),
        }
    }

    fn lock_key(id: BookId) -> String {
        format!("{}:{}", Book::COLLECTION, id)
    }
}
