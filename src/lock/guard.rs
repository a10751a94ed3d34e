use std::sync::Arc;

use super::in_memory::{InMemoryLockManager, Slot};

/// Exclusive hold on one record key of an `InMemoryLockManager`.
///
/// Dropping the guard frees the key, wakes one waiter, and removes the
/// table entry when nobody else references it.
pub struct RecordLockGuard<'a> {
    manager: &'a InMemoryLockManager,
    key: String,
    slot: Arc<Slot>,
}

impl<'a> RecordLockGuard<'a> {
    pub(super) fn new(manager: &'a InMemoryLockManager, key: &str, slot: Arc<Slot>) -> Self {
        Self {
            manager,
            key: key.to_string(),
            slot,
        }
    }

    /// Key this guard holds.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for RecordLockGuard<'_> {
    fn drop(&mut self) {
        match self.slot.held.lock() {
            Ok(mut held) => {
                *held = false;
                self.slot.wake.notify_one();
            }
            Err(_) => tracing::warn!(key = %self.key, "record slot poisoned on release"),
        }

        if let Err(err) = self.manager.evict_if_idle(&self.key, &self.slot) {
            tracing::warn!(key = %self.key, error = %err, "failed to evict record slot");
        }
        tracing::trace!(key = %self.key, "record lock released");
    }
}
