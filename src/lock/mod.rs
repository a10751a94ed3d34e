//! Per-record locks used to serialize read-modify-write cycles on one book.
//!
//! A manager hands out one guard per key at a time. Entries exist only while
//! some caller holds or waits for them, so probing ids that are never stored
//! leaves nothing behind.

mod error;
mod guard;
mod in_memory;
mod lock_manager;

pub use error::LockError;
pub use guard::RecordLockGuard;
pub use in_memory::InMemoryLockManager;
pub use lock_manager::LockManager;
