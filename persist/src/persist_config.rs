//! Configuration of a database instance.

use crate::errors::{ErrorKind, PersistError, PersistResult};
use crate::store::memory::{InMemoryStore, InMemoryStoreConfig};
use crate::store::{Store, StoreProvider};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Settings a [crate::Database] is opened with.
///
/// The configuration is frozen once the database has been opened; setters
/// fail with [ErrorKind::InvalidOperation] afterwards.
#[derive(Clone)]
pub struct PersistConfig {
    inner: Arc<PersistConfigInner>,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PersistConfig {
    pub fn new() -> Self {
        PersistConfig {
            inner: Arc::new(PersistConfigInner::new()),
        }
    }

    /// Installs the storage backend.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is frozen or a store is already set.
    pub fn set_store<T: StoreProvider + 'static>(&self, store: T) -> PersistResult<()> {
        self.inner.set_store(Store::new(store))
    }

    /// Returns the configured store.
    pub fn store(&self) -> PersistResult<Store> {
        self.inner.store()
    }

    /// Installs an [InMemoryStore] with default settings if no store was set.
    pub fn auto_configure(&self) -> PersistResult<()> {
        self.inner.auto_configure()
    }

    pub fn is_configured(&self) -> bool {
        self.inner.configured.load(Ordering::Relaxed)
    }

    pub(crate) fn initialize(&self) {
        self.inner.configured.store(true, Ordering::Relaxed);
    }
}

struct PersistConfigInner {
    configured: AtomicBool,
    store: OnceLock<Store>,
}

impl PersistConfigInner {
    fn new() -> Self {
        PersistConfigInner {
            configured: AtomicBool::from(false),
            store: OnceLock::new(),
        }
    }

    fn check_not_configured(&self, action: &str) -> PersistResult<()> {
        if self.configured.load(Ordering::Relaxed) {
            log::error!("Cannot {} after initialization", action);
            return Err(PersistError::new(
                &format!("Cannot {} after initialization", action),
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }

    fn set_store(&self, store: Store) -> PersistResult<()> {
        self.check_not_configured("set the store")?;
        if self.store.set(store).is_err() {
            log::error!("A store is already configured");
            return Err(PersistError::new(
                "A store is already configured",
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }

    fn store(&self) -> PersistResult<Store> {
        match self.store.get() {
            Some(store) => Ok(store.clone()),
            None => {
                log::error!("No store is configured");
                Err(PersistError::new(
                    "No store is configured",
                    ErrorKind::InvalidOperation,
                ))
            }
        }
    }

    fn auto_configure(&self) -> PersistResult<()> {
        self.check_not_configured("auto-configure")?;
        if self.store.get().is_none() {
            log::debug!("No store configured, using an in-memory store");
            self.store
                .get_or_init(|| Store::new(InMemoryStore::new(InMemoryStoreConfig::new())));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_missing_before_configuration() {
        let config = PersistConfig::new();
        let err = config.store().err().unwrap();
        assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
    }

    #[test]
    fn test_auto_configure_installs_in_memory_store() {
        let config = PersistConfig::new();
        config.auto_configure().unwrap();
        let store = config.store().unwrap();
        assert!(store.store_version().unwrap().starts_with("InMemory/"));
    }

    #[test]
    fn test_auto_configure_keeps_explicit_store() {
        let config = PersistConfig::new();
        config
            .set_store(InMemoryStore::new(
                InMemoryStoreConfig::new().with_read_only(true),
            ))
            .unwrap();
        config.auto_configure().unwrap();
        assert!(config.store().unwrap().is_read_only().unwrap());
    }

    #[test]
    fn test_store_can_only_be_set_once() {
        let config = PersistConfig::new();
        config
            .set_store(InMemoryStore::new(InMemoryStoreConfig::new()))
            .unwrap();
        let err = config
            .set_store(InMemoryStore::new(InMemoryStoreConfig::new()))
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
    }

    #[test]
    fn test_frozen_after_initialization() {
        let config = PersistConfig::new();
        config.initialize();
        assert!(config.is_configured());
        assert!(config.auto_configure().is_err());
        assert!(config
            .set_store(InMemoryStore::new(InMemoryStoreConfig::new()))
            .is_err());
    }
}
