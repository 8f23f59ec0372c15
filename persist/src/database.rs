//! The database: a registry of named collections over one store.

use crate::collection::collection_factory::CollectionFactory;
use crate::collection::Collection;
use crate::common::{LockRegistry, Value, RESERVED_NAMES};
use crate::database_builder::DatabaseBuilder;
use crate::errors::{ErrorKind, PersistError, PersistResult};
use crate::persist_config::PersistConfig;
use crate::store::Store;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// An open database.
///
/// `Database` is a cheap, cloneable handle; clones share the same collections
/// and store. Collections are created on first use and live until they are
/// removed or the database is closed.
///
/// # Examples
///
/// ```rust
/// use persist::{dict, val, Database};
///
/// let db = Database::builder().open().unwrap();
///
/// assert!(db.get_collection("users", false).unwrap().is_none());
/// let users = db.get_collection("users", true).unwrap().unwrap();
/// users.set(dict! { id: 1u64, name: "alice" }).unwrap();
///
/// let again = db.get_collection("users", false).unwrap().unwrap();
/// assert_eq!(again.size().unwrap(), 1);
///
/// db.set_collection_metadata("users", val!(dict! { owner: "ops" })).unwrap();
/// assert_eq!(db.list_collection_names().unwrap(), vec!["users".to_string()]);
///
/// db.close().unwrap();
/// ```
#[derive(Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

impl Database {
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }

    pub(crate) fn open(config: PersistConfig) -> PersistResult<Database> {
        let store = config.store()?;
        if let Err(e) = store.open_or_create() {
            log::error!("Failed to open store: {}", e);
            return Err(PersistError::new_with_cause(
                "Failed to open database",
                ErrorKind::BackendError,
                e,
            ));
        }
        config.initialize();
        log::debug!("Database opened with store {}", store.store_version()?);

        Ok(Database {
            inner: Arc::new(DatabaseInner::new(config, store)),
        })
    }

    /// Returns the collection `name`.
    ///
    /// When it does not exist yet it is created if `create` is set, and
    /// `Ok(None)` is returned otherwise. Creation is atomic: concurrent
    /// callers asking for the same new name all receive the same collection.
    ///
    /// # Errors
    ///
    /// * [ErrorKind::InvalidName] if `name` is empty or reserved.
    /// * [ErrorKind::StoreClosed] if the database is closed.
    pub fn get_collection(&self, name: &str, create: bool) -> PersistResult<Option<Collection>> {
        self.inner.get_collection(name, create)
    }

    /// Returns the collection `name`, creating it if needed.
    pub fn collection(&self, name: &str) -> PersistResult<Collection> {
        match self.inner.get_collection(name, true)? {
            Some(collection) => Ok(collection),
            None => {
                log::error!("Collection {} could not be created", name);
                Err(PersistError::new(
                    &format!("Collection {} could not be created", name),
                    ErrorKind::InternalError,
                ))
            }
        }
    }

    pub fn has_collection(&self, name: &str) -> PersistResult<bool> {
        self.inner.check_opened()?;
        self.inner.store.store_catalog()?.has_entry(name)
    }

    /// Names of all collections, sorted.
    pub fn list_collection_names(&self) -> PersistResult<Vec<String>> {
        self.inner.check_opened()?;
        Ok(self
            .inner
            .store
            .get_collection_names()?
            .into_iter()
            .collect())
    }

    /// Removes the collection `name` with all of its documents. Existing
    /// handles to it become unusable.
    ///
    /// # Errors
    ///
    /// [ErrorKind::CollectionNotFound] if there is no such collection.
    pub fn remove_collection(&self, name: &str) -> PersistResult<()> {
        self.inner.check_opened()?;
        self.inner
            .collection_factory
            .remove_collection(name, &self.inner.store)
    }

    /// Returns the metadata recorded for collection `name`; an empty
    /// dictionary unless it was replaced.
    pub fn collection_metadata(&self, name: &str) -> PersistResult<Value> {
        self.inner.check_opened()?;
        self.inner.store.store_catalog()?.get_metadata(name)
    }

    /// Replaces the metadata recorded for collection `name`.
    pub fn set_collection_metadata<V: Into<Value>>(&self, name: &str, metadata: V) -> PersistResult<()> {
        self.inner.check_opened()?;
        self.inner
            .store
            .store_catalog()?
            .set_metadata(name, metadata.into())
    }

    /// Returns when collection `name` was first created.
    pub fn collection_created_at(&self, name: &str) -> PersistResult<DateTime<Utc>> {
        self.inner.check_opened()?;
        self.inner.store.store_catalog()?.get_created_at(name)
    }

    /// Closes every collection and the store. Closing a closed database does
    /// nothing.
    pub fn close(&self) -> PersistResult<()> {
        self.inner.close()
    }

    pub fn is_closed(&self) -> PersistResult<bool> {
        self.inner.store.is_closed()
    }

    pub fn config(&self) -> PersistConfig {
        self.inner.config.clone()
    }

    pub fn store(&self) -> Store {
        self.inner.store.clone()
    }
}

struct DatabaseInner {
    collection_factory: CollectionFactory,
    config: PersistConfig,
    store: Store,
}

impl DatabaseInner {
    fn new(config: PersistConfig, store: Store) -> Self {
        DatabaseInner {
            collection_factory: CollectionFactory::new(LockRegistry::new()),
            config,
            store,
        }
    }

    fn get_collection(&self, name: &str, create: bool) -> PersistResult<Option<Collection>> {
        self.validate_collection_name(name)?;
        self.check_opened()?;
        self.collection_factory
            .get_collection(name, &self.store, create)
    }

    fn close(&self) -> PersistResult<()> {
        if self.store.is_closed()? {
            return Ok(());
        }

        self.collection_factory.clear()?;
        self.store.close()?;
        log::debug!("Database closed");
        Ok(())
    }

    fn validate_collection_name(&self, name: &str) -> PersistResult<()> {
        if name.is_empty() {
            log::error!("Collection name cannot be empty");
            return Err(PersistError::new(
                "Collection name cannot be empty",
                ErrorKind::InvalidName,
            ));
        }

        for reserved_name in RESERVED_NAMES.iter() {
            if name.eq_ignore_ascii_case(reserved_name) {
                log::error!("Collection name {} is reserved", reserved_name);
                return Err(PersistError::new(
                    &format!("Collection name {} is reserved", reserved_name),
                    ErrorKind::InvalidName,
                ));
            }
        }
        Ok(())
    }

    fn check_opened(&self) -> PersistResult<()> {
        if self.store.is_closed()? {
            log::error!("Database is closed");
            return Err(PersistError::new(
                "Database is closed",
                ErrorKind::StoreClosed,
            ));
        }
        Ok(())
    }
}
