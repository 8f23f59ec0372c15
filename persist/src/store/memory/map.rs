use crate::collection::DocumentId;
use crate::common::Value;
use crate::errors::{ErrorKind, PersistError, PersistResult};
use crate::store::MapProvider;
use crossbeam_skiplist::SkipMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A [MapProvider] held entirely in memory.
///
/// Entries live in a lock-free skip list ordered by [DocumentId]. Replacing a
/// value swaps the whole entry, so concurrent readers never see a partially
/// written value.
#[derive(Clone)]
pub struct InMemoryMap {
    inner: Arc<InMemoryMapInner>,
}

impl InMemoryMap {
    pub fn new(name: &str, read_only: bool) -> Self {
        InMemoryMap {
            inner: Arc::new(InMemoryMapInner::new(name, read_only)),
        }
    }
}

impl MapProvider for InMemoryMap {
    fn contains_key(&self, key: &DocumentId) -> PersistResult<bool> {
        self.inner.contains_key(key)
    }

    fn get(&self, key: &DocumentId) -> PersistResult<Option<Value>> {
        self.inner.get(key)
    }

    fn put(&self, key: DocumentId, value: Value) -> PersistResult<()> {
        self.inner.put(key, value)
    }

    fn remove(&self, key: &DocumentId) -> PersistResult<Option<Value>> {
        self.inner.remove(key)
    }

    fn clear(&self) -> PersistResult<()> {
        self.inner.clear()
    }

    fn size(&self) -> PersistResult<u64> {
        self.inner.size()
    }

    fn is_empty(&self) -> PersistResult<bool> {
        self.inner.is_empty()
    }

    fn entries(&self) -> PersistResult<Vec<(DocumentId, Value)>> {
        self.inner.entries()
    }

    fn get_name(&self) -> PersistResult<String> {
        Ok(self.inner.name.clone())
    }

    fn is_closed(&self) -> PersistResult<bool> {
        Ok(self.inner.closed.load(Ordering::Relaxed))
    }

    fn close(&self) -> PersistResult<()> {
        self.inner.close()
    }

    fn dispose(&self) -> PersistResult<()> {
        self.inner.dispose()
    }

    fn is_dropped(&self) -> PersistResult<bool> {
        Ok(self.inner.dropped.load(Ordering::Relaxed))
    }
}

struct InMemoryMapInner {
    backing_map: SkipMap<DocumentId, Value>,
    closed: AtomicBool,
    dropped: AtomicBool,
    read_only: bool,
    name: String,
}

impl InMemoryMapInner {
    fn new(name: &str, read_only: bool) -> InMemoryMapInner {
        InMemoryMapInner {
            backing_map: SkipMap::new(),
            closed: AtomicBool::from(false),
            dropped: AtomicBool::from(false),
            read_only,
            name: name.to_string(),
        }
    }

    fn check_opened(&self) -> PersistResult<()> {
        if self.dropped.load(Ordering::Relaxed) {
            log::error!("Map {} is dropped", self.name);
            return Err(PersistError::new(
                &format!("Map {} is dropped", self.name),
                ErrorKind::InvalidOperation,
            ));
        }

        if self.closed.load(Ordering::Relaxed) {
            log::error!("Map {} is closed", self.name);
            return Err(PersistError::new(
                &format!("Map {} is closed", self.name),
                ErrorKind::InvalidOperation,
            ));
        }

        Ok(())
    }

    fn check_writable(&self) -> PersistResult<()> {
        self.check_opened()?;
        if self.read_only {
            log::error!("Map {} is read-only", self.name);
            return Err(PersistError::new(
                &format!("Map {} is read-only", self.name),
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }

    fn contains_key(&self, key: &DocumentId) -> PersistResult<bool> {
        self.check_opened()?;
        Ok(self.backing_map.contains_key(key))
    }

    fn get(&self, key: &DocumentId) -> PersistResult<Option<Value>> {
        self.check_opened()?;
        Ok(self.backing_map.get(key).map(|entry| entry.value().clone()))
    }

    fn put(&self, key: DocumentId, value: Value) -> PersistResult<()> {
        self.check_writable()?;
        self.backing_map.insert(key, value);
        Ok(())
    }

    fn remove(&self, key: &DocumentId) -> PersistResult<Option<Value>> {
        self.check_writable()?;
        Ok(self
            .backing_map
            .remove(key)
            .map(|entry| entry.value().clone()))
    }

    fn clear(&self) -> PersistResult<()> {
        self.check_writable()?;
        if !self.backing_map.is_empty() {
            self.backing_map.clear();
        }
        Ok(())
    }

    fn size(&self) -> PersistResult<u64> {
        self.check_opened()?;
        Ok(self.backing_map.len() as u64)
    }

    fn is_empty(&self) -> PersistResult<bool> {
        self.check_opened()?;
        Ok(self.backing_map.is_empty())
    }

    fn entries(&self) -> PersistResult<Vec<(DocumentId, Value)>> {
        self.check_opened()?;
        Ok(self
            .backing_map
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect())
    }

    fn close(&self) -> PersistResult<()> {
        self.closed.store(true, Ordering::Relaxed);
        self.backing_map.clear();
        log::debug!("Map {} closed", self.name);
        Ok(())
    }

    fn dispose(&self) -> PersistResult<()> {
        self.dropped.store(true, Ordering::Relaxed);
        self.closed.store(true, Ordering::Relaxed);
        self.backing_map.clear();
        log::debug!("Map {} dropped", self.name);
        Ok(())
    }
}
