use crate::errors::PersistResult;
use crate::store::{StoreCatalog, StoreMap};
use std::collections::BTreeSet;
use std::ops::Deref;
use std::sync::Arc;

/// A pluggable storage backend.
///
/// A store owns a set of named [StoreMap]s, one per collection, plus the
/// reserved catalog map that records which collections exist.
pub trait StoreProvider: Send + Sync {
    /// Prepares the store for use. Called once when the database opens.
    fn open_or_create(&self) -> PersistResult<()>;

    fn is_closed(&self) -> PersistResult<bool>;

    /// Closes every open map and the store itself. Closing twice is a no-op.
    fn close(&self) -> PersistResult<()>;

    fn is_read_only(&self) -> PersistResult<bool>;

    /// Names of all collections recorded in the catalog.
    fn get_collection_names(&self) -> PersistResult<BTreeSet<String>>;

    /// Checks whether a map with this name is currently open.
    fn has_map(&self, name: &str) -> PersistResult<bool>;

    /// Opens the named map, creating it when it does not exist yet.
    fn open_map(&self, name: &str) -> PersistResult<StoreMap>;

    /// Closes the named map and releases it. An in-memory backend discards
    /// the content of a closed map.
    fn close_map(&self, name: &str) -> PersistResult<()>;

    /// Drops the named map and everything stored in it.
    fn remove_map(&self, name: &str) -> PersistResult<()>;

    fn store_version(&self) -> PersistResult<String>;

    fn store_catalog(&self) -> PersistResult<StoreCatalog>;
}

/// Shared handle to a [StoreProvider].
#[derive(Clone)]
pub struct Store {
    inner: Arc<dyn StoreProvider>,
}

impl Store {
    pub fn new<T: StoreProvider + 'static>(inner: T) -> Self {
        Store {
            inner: Arc::new(inner),
        }
    }
}

impl Deref for Store {
    type Target = Arc<dyn StoreProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
