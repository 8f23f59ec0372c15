use crate::collection::DocumentId;
use crate::common::{
    get_current_time_millis, millis_to_datetime, Dictionary, Value, CATALOG_CREATED_AT,
    CATALOG_METADATA, CATALOG_MIGRATIONS,
};
use crate::errors::{ErrorKind, PersistError, PersistResult};
use crate::store::StoreMap;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::ops::Deref;
use std::sync::Arc;

/// The registry of collections kept inside the store.
///
/// Every collection has one entry in the reserved catalog map, keyed by the
/// collection name:
///
/// ```text
/// {
///   "created_at": <creation time, ms since epoch>,
///   "migrations": [],
///   "metadata": {}
/// }
/// ```
///
/// Read-modify-write updates of an entry are serialized through a catalog-wide
/// lock, so a store must hand out a single catalog instance.
#[derive(Clone)]
pub struct StoreCatalog {
    inner: Arc<StoreCatalogInner>,
}

impl StoreCatalog {
    pub fn new(catalog_map: StoreMap) -> StoreCatalog {
        StoreCatalog {
            inner: Arc::new(StoreCatalogInner {
                catalog_map,
                write_lock: Mutex::new(()),
            }),
        }
    }
}

impl Deref for StoreCatalog {
    type Target = StoreCatalogInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

pub struct StoreCatalogInner {
    catalog_map: StoreMap,
    write_lock: Mutex<()>,
}

impl StoreCatalogInner {
    pub fn has_entry(&self, name: &str) -> PersistResult<bool> {
        self.catalog_map.contains_key(&DocumentId::from(name))
    }

    /// Records a new collection. Returns `false` if it was already recorded,
    /// in which case the existing entry is left untouched.
    pub fn write_collection_entry(&self, name: &str) -> PersistResult<bool> {
        if name.is_empty() {
            log::error!("Collection name cannot be empty");
            return Err(PersistError::new(
                "Collection name cannot be empty",
                ErrorKind::InvalidName,
            ));
        }

        let _guard = self.write_lock.lock();
        let key = DocumentId::from(name);
        if self.catalog_map.contains_key(&key)? {
            return Ok(false);
        }

        let mut entry = Dictionary::new();
        entry.insert(CATALOG_CREATED_AT, get_current_time_millis());
        entry.insert(CATALOG_MIGRATIONS, Value::Array(Vec::new()));
        entry.insert(CATALOG_METADATA, Dictionary::new());

        self.catalog_map.put(key, Value::Dictionary(entry))?;
        log::debug!("Collection {} recorded in catalog", name);
        Ok(true)
    }

    /// Returns the names of all recorded collections, sorted.
    pub fn get_collection_names(&self) -> PersistResult<BTreeSet<String>> {
        let mut names = BTreeSet::new();
        for (key, value) in self.catalog_map.entries()? {
            match (key, value) {
                (DocumentId::String(name), Value::Dictionary(_)) => {
                    names.insert(name);
                }
                (key, _) => {
                    log::warn!("Skipping invalid catalog entry {}", key);
                }
            }
        }
        Ok(names)
    }

    /// Removes the entry of a collection. Returns `false` if there was none.
    pub fn remove_entry(&self, name: &str) -> PersistResult<bool> {
        let _guard = self.write_lock.lock();
        let removed = self.catalog_map.remove(&DocumentId::from(name))?;
        if removed.is_some() {
            log::debug!("Collection {} removed from catalog", name);
        }
        Ok(removed.is_some())
    }

    /// Returns the full catalog entry of a collection, if recorded.
    pub fn get_entry(&self, name: &str) -> PersistResult<Option<Dictionary>> {
        match self.catalog_map.get(&DocumentId::from(name))? {
            None => Ok(None),
            Some(Value::Dictionary(entry)) => Ok(Some(entry)),
            Some(other) => {
                log::error!(
                    "Catalog entry of {} is a {}, expected a dictionary",
                    name,
                    other.type_name()
                );
                Err(PersistError::new(
                    &format!("Catalog entry of {} is corrupted", name),
                    ErrorKind::InternalError,
                ))
            }
        }
    }

    pub fn get_metadata(&self, name: &str) -> PersistResult<Value> {
        let entry = self.require_entry(name)?;
        Ok(entry.get(CATALOG_METADATA).cloned().unwrap_or_default())
    }

    /// Replaces the metadata of a collection wholesale.
    pub fn set_metadata(&self, name: &str, metadata: Value) -> PersistResult<()> {
        let _guard = self.write_lock.lock();
        let mut entry = self.require_entry(name)?;
        entry.insert(CATALOG_METADATA, metadata);
        self.catalog_map
            .put(DocumentId::from(name), Value::Dictionary(entry))
    }

    pub fn get_migrations(&self, name: &str) -> PersistResult<Vec<Value>> {
        let entry = self.require_entry(name)?;
        match entry.get(CATALOG_MIGRATIONS) {
            Some(Value::Array(migrations)) => Ok(migrations.clone()),
            _ => Ok(Vec::new()),
        }
    }

    pub fn get_created_at(&self, name: &str) -> PersistResult<DateTime<Utc>> {
        let entry = self.require_entry(name)?;
        entry
            .get(CATALOG_CREATED_AT)
            .and_then(|v| v.as_i64())
            .and_then(millis_to_datetime)
            .ok_or_else(|| {
                log::error!("Catalog entry of {} has no valid creation time", name);
                PersistError::new(
                    &format!("Catalog entry of {} has no valid creation time", name),
                    ErrorKind::InternalError,
                )
            })
    }

    fn require_entry(&self, name: &str) -> PersistResult<Dictionary> {
        match self.get_entry(name)? {
            Some(entry) => Ok(entry),
            None => {
                log::error!("Collection {} does not exist", name);
                Err(PersistError::new(
                    &format!("Collection {} does not exist", name),
                    ErrorKind::CollectionNotFound,
                ))
            }
        }
    }
}
