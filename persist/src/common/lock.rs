use dashmap::DashMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Shared read/write lock guarding one collection.
///
/// Cloned handles share the same underlying lock.
#[derive(Clone, Default)]
pub struct LockHandle {
    lock: Arc<RwLock<()>>,
}

impl LockHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> RwLockReadGuard<'_, ()> {
        self.lock.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, ()> {
        self.lock.write()
    }

    pub fn same_lock(&self, other: &LockHandle) -> bool {
        Arc::ptr_eq(&self.lock, &other.lock)
    }
}

/// Collection locks of one database, by collection name.
///
/// Every handle to a collection, including one reopened after a close, gets
/// the lock registered under its name, so all of them serialize on it.
///
/// # Examples
///
/// ```
/// use persist::common::LockRegistry;
///
/// let lock_registry = LockRegistry::new();
/// let users = lock_registry.get_lock("users");
/// assert!(users.same_lock(&lock_registry.get_lock("users")));
/// assert!(!users.same_lock(&lock_registry.get_lock("orders")));
/// ```
#[derive(Clone, Default)]
pub struct LockRegistry {
    locks: Arc<DashMap<String, LockHandle>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lock of collection `name`, registering it on first use.
    pub fn get_lock(&self, name: &str) -> LockHandle {
        self.locks.entry(name.to_string()).or_default().clone()
    }

    /// Forgets the lock of a removed collection. Handles already given out
    /// keep their lock; later calls to [LockRegistry::get_lock] get a new one.
    pub fn remove_lock(&self, name: &str) -> bool {
        self.locks.remove(name).is_some()
    }

    pub fn lock_count(&self) -> usize {
        self.locks.len()
    }
}
