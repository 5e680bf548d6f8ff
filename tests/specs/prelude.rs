//! Shared helpers for lock manager specs.

use weir_coord::{MemorySession, MemoryStore};
use weir_lock::LockManager;

/// A fresh manager with its own session against a shared store.
pub fn manager(store: &MemoryStore) -> LockManager<MemorySession> {
    LockManager::new(store.session())
}
