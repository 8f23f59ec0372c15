use super::{CollectionProvider, Document, DocumentId};
use crate::common::{LockHandle, Value};
use crate::errors::{ErrorKind, PersistError, PersistResult};
use crate::store::{Store, StoreMap};
use std::sync::atomic::{AtomicBool, Ordering};

/// The collection implementation backed by one [StoreMap].
///
/// Writes hold the collection's write lock for their whole duration and
/// reads hold its read lock, so each operation observes a consistent map.
pub(crate) struct DefaultCollection {
    collection_name: String,
    store_map: StoreMap,
    store: Store,
    closed: AtomicBool,
    dropped: AtomicBool,
    lock_handle: LockHandle,
}

impl DefaultCollection {
    pub fn new(
        collection_name: &str,
        store_map: StoreMap,
        store: Store,
        lock_handle: LockHandle,
    ) -> Self {
        Self {
            collection_name: collection_name.to_string(),
            store_map,
            store,
            closed: AtomicBool::from(false),
            dropped: AtomicBool::from(false),
            lock_handle,
        }
    }

    fn ensure_opened(&self) -> PersistResult<()> {
        if self.dropped.load(Ordering::Relaxed) {
            log::error!("Collection {} is dropped", self.collection_name);
            return Err(PersistError::new(
                &format!("Collection {} is dropped", self.collection_name),
                ErrorKind::InvalidOperation,
            ));
        }

        if self.store.is_closed()? {
            log::error!("Store is closed; cannot access collection {}", self.collection_name);
            return Err(PersistError::new(
                "Store is closed",
                ErrorKind::StoreClosed,
            ));
        }

        if self.closed.load(Ordering::Relaxed) {
            log::error!("Collection {} is closed", self.collection_name);
            return Err(PersistError::new(
                &format!("Collection {} is closed", self.collection_name),
                ErrorKind::InvalidOperation,
            ));
        }

        if self.store_map.is_closed()? || self.store_map.is_dropped()? {
            log::error!("Map of collection {} is no longer open", self.collection_name);
            return Err(PersistError::new(
                &format!("Collection {} is no longer open", self.collection_name),
                ErrorKind::InvalidOperation,
            ));
        }

        Ok(())
    }

    fn to_document(&self, id: DocumentId, value: Value) -> PersistResult<Document> {
        match value {
            Value::Dictionary(body) => Ok(Document::from_stored(id, body)),
            other => {
                log::error!(
                    "Collection {} holds a {} under {}",
                    self.collection_name,
                    other.type_name(),
                    id
                );
                Err(PersistError::new(
                    &format!("Collection {} holds a corrupted entry", self.collection_name),
                    ErrorKind::InternalError,
                ))
            }
        }
    }
}

impl CollectionProvider for DefaultCollection {
    fn get(&self, id: Value) -> PersistResult<Option<Document>> {
        let key = DocumentId::from_key(id)?;

        let _guard = self.lock_handle.read();
        self.ensure_opened()?;
        match self.store_map.get(&key)? {
            Some(value) => Ok(Some(self.to_document(key, value)?)),
            None => Ok(None),
        }
    }

    fn set(&self, document: Value) -> PersistResult<DocumentId> {
        let document = Document::validate(document)?;
        let id = document.id().clone();

        let _guard = self.lock_handle.write();
        self.ensure_opened()?;
        self.store_map.put(id.clone(), document.into_value())?;
        Ok(id)
    }

    fn delete(&self, id: Value) -> PersistResult<()> {
        let key = DocumentId::from_key(id)?;

        let _guard = self.lock_handle.write();
        self.ensure_opened()?;
        self.store_map.remove(&key)?;
        Ok(())
    }

    fn contains(&self, id: Value) -> PersistResult<bool> {
        let key = DocumentId::from_key(id)?;

        let _guard = self.lock_handle.read();
        self.ensure_opened()?;
        self.store_map.contains_key(&key)
    }

    fn documents(&self) -> PersistResult<Vec<Document>> {
        let _guard = self.lock_handle.read();
        self.ensure_opened()?;
        self.store_map
            .entries()?
            .into_iter()
            .map(|(id, value)| self.to_document(id, value))
            .collect()
    }

    fn size(&self) -> PersistResult<u64> {
        let _guard = self.lock_handle.read();
        self.ensure_opened()?;
        self.store_map.size()
    }

    fn clear(&self) -> PersistResult<()> {
        let _guard = self.lock_handle.write();
        self.ensure_opened()?;
        self.store_map.clear()?;
        log::debug!("Collection {} cleared", self.collection_name);
        Ok(())
    }

    fn name(&self) -> String {
        self.collection_name.clone()
    }

    fn is_open(&self) -> PersistResult<bool> {
        let _guard = self.lock_handle.read();
        Ok(!self.store.is_closed()?
            && !self.closed.load(Ordering::Relaxed)
            && !self.dropped.load(Ordering::Relaxed)
            && !self.store_map.is_closed()?
            && !self.store_map.is_dropped()?)
    }

    fn close(&self) -> PersistResult<()> {
        let _guard = self.lock_handle.write();
        self.closed.store(true, Ordering::Relaxed);
        log::debug!("Collection {} closed", self.collection_name);
        Ok(())
    }

    fn dispose(&self) -> PersistResult<()> {
        let _guard = self.lock_handle.write();
        if self.dropped.load(Ordering::Relaxed) {
            return Ok(());
        }

        if self.store.is_closed()? {
            log::error!("Store is closed; cannot drop collection {}", self.collection_name);
            return Err(PersistError::new("Store is closed", ErrorKind::StoreClosed));
        }

        self.store.remove_map(&self.collection_name)?;
        self.dropped.store(true, Ordering::Relaxed);
        log::debug!("Collection {} dropped", self.collection_name);
        Ok(())
    }

    fn is_dropped(&self) -> PersistResult<bool> {
        let _guard = self.lock_handle.read();
        Ok(self.dropped.load(Ordering::Relaxed) || self.store_map.is_dropped()?)
    }
}
