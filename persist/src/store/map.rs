use crate::collection::DocumentId;
use crate::common::Value;
use crate::errors::PersistResult;
use std::ops::Deref;
use std::sync::Arc;

/// A named, ordered key-value map opened from a [crate::store::Store].
///
/// Each collection is backed by exactly one map. Implementations must make
/// `put` an atomic replacement of the whole value, so readers observe either
/// the old or the new value and never a mix of both.
pub trait MapProvider: Send + Sync {
    fn contains_key(&self, key: &DocumentId) -> PersistResult<bool>;

    fn get(&self, key: &DocumentId) -> PersistResult<Option<Value>>;

    /// Inserts or replaces the value stored under `key`.
    fn put(&self, key: DocumentId, value: Value) -> PersistResult<()>;

    fn remove(&self, key: &DocumentId) -> PersistResult<Option<Value>>;

    fn clear(&self) -> PersistResult<()>;

    fn size(&self) -> PersistResult<u64>;

    fn is_empty(&self) -> PersistResult<bool>;

    /// Returns a snapshot of all entries in key order.
    fn entries(&self) -> PersistResult<Vec<(DocumentId, Value)>>;

    fn get_name(&self) -> PersistResult<String>;

    fn is_closed(&self) -> PersistResult<bool>;

    /// Closes the map. Further operations fail.
    fn close(&self) -> PersistResult<()>;

    /// Clears and closes the map and marks it dropped.
    fn dispose(&self) -> PersistResult<()>;

    fn is_dropped(&self) -> PersistResult<bool>;
}

/// Shared handle to a [MapProvider].
#[derive(Clone)]
pub struct StoreMap {
    inner: Arc<dyn MapProvider>,
}

impl StoreMap {
    pub fn new<T: MapProvider + 'static>(inner: T) -> Self {
        StoreMap {
            inner: Arc::new(inner),
        }
    }
}

impl Deref for StoreMap {
    type Target = Arc<dyn MapProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
