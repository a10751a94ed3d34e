use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex};

use super::{LockError, LockManager, RecordLockGuard};

/// Hold state for one record key.
pub(super) struct Slot {
    pub(super) held: Mutex<bool>,
    pub(super) wake: Condvar,
}

/// In-memory lock table keyed by record key.
///
/// A slot is created on first `acquire` and removed by the last guard to
/// leave it: when a guard drops and the table's `Arc` plus its own are the
/// only references left, no one else holds or waits on the key. Cloning a
/// slot out of the table and the eviction check both happen under the table
/// mutex, so a caller can never end up waiting on an evicted slot.
#[derive(Default)]
pub struct InMemoryLockManager {
    slots: Mutex<HashMap<String, Arc<Slot>>>,
}

impl InMemoryLockManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys currently held or waited on.
    pub fn len(&self) -> Result<usize, LockError> {
        Ok(self.table()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, LockError> {
        Ok(self.len()? == 0)
    }

    fn table(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Arc<Slot>>>, LockError> {
        self.slots
            .lock()
            .map_err(|_| LockError::Poisoned("lock table".into()))
    }

    fn slot(&self, key: &str) -> Result<Arc<Slot>, LockError> {
        let mut slots = self.table()?;
        Ok(slots
            .entry(key.to_string())
            .or_insert_with(|| {
                Arc::new(Slot {
                    held: Mutex::new(false),
                    wake: Condvar::new(),
                })
            })
            .clone())
    }

    /// Drop the table entry for `key` if `slot` is its only outside reference.
    pub(super) fn evict_if_idle(&self, key: &str, slot: &Arc<Slot>) -> Result<(), LockError> {
        let mut slots = self.table()?;
        if Arc::strong_count(slot) == 2
            && slots.get(key).is_some_and(|current| Arc::ptr_eq(current, slot))
        {
            slots.remove(key);
        }
        Ok(())
    }

    fn poisoned(&self, key: &str, slot: &Arc<Slot>) -> LockError {
        let _ = self.evict_if_idle(key, slot);
        LockError::Poisoned(format!("record slot {}", key))
    }
}

impl LockManager for InMemoryLockManager {
    type Guard<'a> = RecordLockGuard<'a>;

    fn acquire(&self, key: &str) -> Result<RecordLockGuard<'_>, LockError> {
        let slot = self.slot(key)?;
        {
            let Ok(mut held) = slot.held.lock() else {
                return Err(self.poisoned(key, &slot));
            };
            while *held {
                held = match slot.wake.wait(held) {
                    Ok(held) => held,
                    Err(_) => return Err(self.poisoned(key, &slot)),
                };
            }
            *held = true;
        }
        tracing::trace!(key, "record lock acquired");
        Ok(RecordLockGuard::new(self, key, slot))
    }

    fn try_acquire(&self, key: &str) -> Result<Option<RecordLockGuard<'_>>, LockError> {
        let slot = self.slot(key)?;
        {
            let Ok(mut held) = slot.held.lock() else {
                return Err(self.poisoned(key, &slot));
            };
            if !*held {
                *held = true;
                drop(held);
                return Ok(Some(RecordLockGuard::new(self, key, slot)));
            }
        }
        // The holder may have released while we looked; its eviction check
        // counted our clone.
        self.evict_if_idle(key, &slot)?;
        Ok(None)
    }
}
