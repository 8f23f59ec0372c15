use super::default_collection::DefaultCollection;
use super::Collection;
use crate::common::{atomic, Atomic, LockRegistry};
use crate::errors::{ErrorKind, PersistError, PersistResult};
use crate::store::Store;
use std::collections::HashMap;
use std::ops::Deref;
use std::sync::Arc;

/// Creates and caches the open [Collection] handles of a database.
#[derive(Clone)]
pub(crate) struct CollectionFactory {
    inner: Arc<CollectionFactoryInner>,
}

impl CollectionFactory {
    pub fn new(lock_registry: LockRegistry) -> Self {
        CollectionFactory {
            inner: Arc::new(CollectionFactoryInner::new(lock_registry)),
        }
    }
}

impl Deref for CollectionFactory {
    type Target = Arc<CollectionFactoryInner>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

pub(crate) struct CollectionFactoryInner {
    collection_map: Atomic<HashMap<String, Collection>>,
    lock_registry: LockRegistry,
}

impl CollectionFactoryInner {
    fn new(lock_registry: LockRegistry) -> Self {
        Self {
            collection_map: atomic(HashMap::new()),
            lock_registry,
        }
    }

    /// Returns the collection `name`, opening it if it is recorded in the
    /// catalog, or creating it when `create` is set.
    ///
    /// The lookup and the creation happen under one write lock of the
    /// factory, so racing callers always end up with the same collection.
    pub fn get_collection(
        &self,
        name: &str,
        store: &Store,
        create: bool,
    ) -> PersistResult<Option<Collection>> {
        let mut collection_map = self.collection_map.write();

        if let Some(collection) = collection_map.get(name) {
            if collection.is_open()? {
                return Ok(Some(collection.clone()));
            }
            collection_map.remove(name);
        }

        let catalog = store.store_catalog()?;
        let recorded = catalog.has_entry(name)?;
        if !recorded && !create {
            return Ok(None);
        }

        // a rejected catalog write must leave no map behind
        if !recorded {
            catalog.write_collection_entry(name)?;
            log::debug!("Collection {} created", name);
        } else {
            log::debug!("Collection {} opened", name);
        }

        let store_map = store.open_map(name)?;
        let lock_handle = self.lock_registry.get_lock(name);
        let collection = Collection::new(DefaultCollection::new(
            name,
            store_map,
            store.clone(),
            lock_handle,
        ));

        collection_map.insert(name.to_string(), collection.clone());
        Ok(Some(collection))
    }

    /// Drops the collection `name`: its documents, its map and its catalog
    /// entry.
    pub fn remove_collection(&self, name: &str, store: &Store) -> PersistResult<()> {
        let mut collection_map = self.collection_map.write();

        let catalog = store.store_catalog()?;
        if !catalog.has_entry(name)? {
            log::error!("Collection {} does not exist", name);
            return Err(PersistError::new(
                &format!("Collection {} does not exist", name),
                ErrorKind::CollectionNotFound,
            ));
        }

        match collection_map.remove(name) {
            Some(collection) => collection.dispose()?,
            None => store.remove_map(name)?,
        }

        catalog.remove_entry(name)?;
        self.lock_registry.remove_lock(name);
        log::debug!("Collection {} removed", name);
        Ok(())
    }

    /// Closes every open collection and forgets them.
    pub fn clear(&self) -> PersistResult<()> {
        let mut collection_map = self.collection_map.write();
        for collection in collection_map.values() {
            collection.close()?;
        }
        collection_map.clear();
        Ok(())
    }

    #[cfg(test)]
    pub fn open_count(&self) -> usize {
        self.collection_map.read().len()
    }
}
