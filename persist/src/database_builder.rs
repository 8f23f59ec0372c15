//! Fluent construction of a [Database].

use crate::database::Database;
use crate::errors::{PersistError, PersistResult};
use crate::persist_config::PersistConfig;
use crate::store::memory::{InMemoryStore, InMemoryStoreConfig};
use crate::store::StoreProvider;

/// Builds and opens a [Database].
///
/// Setter errors do not surface immediately: the first one is kept and
/// returned by [DatabaseBuilder::open].
///
/// # Examples
///
/// ```rust
/// use persist::store::memory::InMemoryStoreConfig;
/// use persist::Database;
///
/// let db = Database::builder()
///     .in_memory(InMemoryStoreConfig::new().with_map_capacity(32))
///     .open()
///     .unwrap();
/// assert!(!db.is_closed().unwrap());
/// ```
#[derive(Default)]
pub struct DatabaseBuilder {
    error: Option<PersistError>,
    config: PersistConfig,
}

impl DatabaseBuilder {
    pub fn new() -> Self {
        DatabaseBuilder {
            error: None,
            config: PersistConfig::new(),
        }
    }

    /// Uses `store` as the storage backend.
    pub fn store<T: StoreProvider + 'static>(mut self, store: T) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_store(store) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Uses an [InMemoryStore] with the given settings.
    pub fn in_memory(self, store_config: InMemoryStoreConfig) -> Self {
        self.store(InMemoryStore::new(store_config))
    }

    /// Opens the database, falling back to an in-memory store when no store
    /// was configured.
    pub fn open(self) -> PersistResult<Database> {
        if let Some(error) = self.error {
            return Err(error);
        }

        self.config.auto_configure()?;
        Database::open(self.config)
    }
}
