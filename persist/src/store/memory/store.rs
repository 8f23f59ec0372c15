use super::{InMemoryMap, InMemoryStoreConfig};
use crate::common::{COLLECTION_CATALOG, PERSIST_VERSION};
use crate::errors::{ErrorKind, PersistError, PersistResult};
use crate::store::{MapProvider, StoreCatalog, StoreMap, StoreProvider};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// A [StoreProvider] that keeps every map in memory.
///
/// Nothing survives [StoreProvider::close].
///
/// # Examples
///
/// ```rust
/// use persist::store::memory::{InMemoryStore, InMemoryStoreConfig};
/// use persist::store::StoreProvider;
///
/// let store = InMemoryStore::new(InMemoryStoreConfig::new());
/// store.open_or_create().unwrap();
/// let map = store.open_map("users").unwrap();
/// assert!(map.is_empty().unwrap());
/// ```
#[derive(Clone)]
pub struct InMemoryStore {
    inner: Arc<InMemoryStoreInner>,
}

impl InMemoryStore {
    pub fn new(store_config: InMemoryStoreConfig) -> InMemoryStore {
        InMemoryStore {
            inner: Arc::new(InMemoryStoreInner::new(store_config)),
        }
    }

    pub fn config(&self) -> &InMemoryStoreConfig {
        &self.inner.store_config
    }
}

impl StoreProvider for InMemoryStore {
    fn open_or_create(&self) -> PersistResult<()> {
        self.inner.check_opened()?;
        log::debug!("In-memory store opened");
        Ok(())
    }

    fn is_closed(&self) -> PersistResult<bool> {
        Ok(self.inner.closed.load(Ordering::Relaxed))
    }

    fn close(&self) -> PersistResult<()> {
        self.inner.close()
    }

    fn is_read_only(&self) -> PersistResult<bool> {
        Ok(self.inner.store_config.is_read_only())
    }

    fn get_collection_names(&self) -> PersistResult<BTreeSet<String>> {
        let catalog = self.store_catalog()?;
        catalog.get_collection_names()
    }

    fn has_map(&self, name: &str) -> PersistResult<bool> {
        Ok(self.inner.map_registry.contains_key(name))
    }

    fn open_map(&self, name: &str) -> PersistResult<StoreMap> {
        self.inner.open_map(name)
    }

    fn close_map(&self, name: &str) -> PersistResult<()> {
        if let Some((_, map)) = self.inner.map_registry.remove(name) {
            map.close()?;
        }
        Ok(())
    }

    fn remove_map(&self, name: &str) -> PersistResult<()> {
        if let Some((_, map)) = self.inner.map_registry.remove(name) {
            map.dispose()?;
        }
        Ok(())
    }

    fn store_version(&self) -> PersistResult<String> {
        Ok(format!("InMemory/{}", PERSIST_VERSION))
    }

    fn store_catalog(&self) -> PersistResult<StoreCatalog> {
        self.inner.store_catalog()
    }
}

struct InMemoryStoreInner {
    closed: AtomicBool,
    store_config: InMemoryStoreConfig,
    map_registry: DashMap<String, InMemoryMap>,
    catalog: OnceLock<StoreCatalog>,
}

impl InMemoryStoreInner {
    fn new(store_config: InMemoryStoreConfig) -> InMemoryStoreInner {
        InMemoryStoreInner {
            closed: AtomicBool::from(false),
            map_registry: DashMap::with_capacity(store_config.map_capacity()),
            store_config,
            catalog: OnceLock::new(),
        }
    }

    fn check_opened(&self) -> PersistResult<()> {
        if self.closed.load(Ordering::Relaxed) {
            log::error!("In-memory store is closed");
            return Err(PersistError::new(
                "Store is closed",
                ErrorKind::StoreClosed,
            ));
        }
        Ok(())
    }

    fn open_map(&self, name: &str) -> PersistResult<StoreMap> {
        self.check_opened()?;

        let read_only = self.store_config.is_read_only();
        match self.map_registry.entry(name.to_string()) {
            Entry::Occupied(mut entry) => {
                let existing = entry.get().clone();
                if existing.is_closed()? || existing.is_dropped()? {
                    let map = InMemoryMap::new(name, read_only);
                    entry.insert(map.clone());
                    Ok(StoreMap::new(map))
                } else {
                    Ok(StoreMap::new(existing))
                }
            }
            Entry::Vacant(entry) => {
                let map = InMemoryMap::new(name, read_only);
                entry.insert(map.clone());
                log::debug!("Map {} created", name);
                Ok(StoreMap::new(map))
            }
        }
    }

    fn store_catalog(&self) -> PersistResult<StoreCatalog> {
        self.check_opened()?;
        if let Some(catalog) = self.catalog.get() {
            return Ok(catalog.clone());
        }

        let catalog = StoreCatalog::new(self.open_map(COLLECTION_CATALOG)?);
        // a racing thread may have won, in which case its catalog is kept
        Ok(self.catalog.get_or_init(|| catalog).clone())
    }

    fn close(&self) -> PersistResult<()> {
        if self.closed.swap(true, Ordering::Relaxed) {
            return Ok(());
        }

        let maps: Vec<InMemoryMap> = self
            .map_registry
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        self.map_registry.clear();

        for map in maps {
            map.close()?;
        }

        log::debug!("In-memory store closed");
        Ok(())
    }
}
