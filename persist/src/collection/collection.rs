use super::{Document, DocumentId};
use crate::common::Value;
use crate::errors::PersistResult;
use std::sync::Arc;

/// Behaviour of a named collection of documents.
///
/// Arguments arrive as raw [Value]s so that every implementation applies the
/// same key and document contracts:
///
/// * keys must be strings or integers, anything else is an
///   [crate::errors::ErrorKind::InvalidKey] usage error;
/// * documents must pass [Document::validate].
pub trait CollectionProvider: Send + Sync {
    fn get(&self, id: Value) -> PersistResult<Option<Document>>;

    fn set(&self, document: Value) -> PersistResult<DocumentId>;

    fn delete(&self, id: Value) -> PersistResult<()>;

    fn contains(&self, id: Value) -> PersistResult<bool>;

    /// Returns every document in identifier order.
    fn documents(&self) -> PersistResult<Vec<Document>>;

    fn size(&self) -> PersistResult<u64>;

    fn clear(&self) -> PersistResult<()>;

    fn name(&self) -> String;

    fn is_open(&self) -> PersistResult<bool>;

    fn close(&self) -> PersistResult<()>;

    /// Drops the collection's storage. Further operations fail.
    fn dispose(&self) -> PersistResult<()>;

    fn is_dropped(&self) -> PersistResult<bool>;
}

/// A named store of documents keyed by their `id` field.
///
/// `Collection` is a cheap, cloneable handle; clones refer to the same
/// collection. Obtain one from [crate::Database::get_collection].
///
/// # Examples
///
/// ```rust
/// use persist::{dict, val, Database};
///
/// let db = Database::builder().open().unwrap();
/// let users = db.collection("users").unwrap();
///
/// users.set(dict! { id: "alice", age: 30 }).unwrap();
/// let alice = users.get("alice").unwrap().unwrap();
/// assert_eq!(alice.get("age"), Some(&val!(30)));
///
/// users.delete("alice").unwrap();
/// assert!(users.get("alice").unwrap().is_none());
/// ```
#[derive(Clone)]
pub struct Collection {
    inner: Arc<dyn CollectionProvider>,
}

impl Collection {
    pub fn new<T: CollectionProvider + 'static>(inner: T) -> Self {
        Collection {
            inner: Arc::new(inner),
        }
    }

    /// Fetches the document stored under `id`.
    ///
    /// Returns `Ok(None)` when there is no such document. A negative integer
    /// is a valid key that never matches.
    ///
    /// # Errors
    ///
    /// [crate::errors::ErrorKind::InvalidKey] if `id` is not a string or an
    /// integer, e.g. when a whole document is passed by mistake.
    pub fn get<K: Into<Value>>(&self, id: K) -> PersistResult<Option<Document>> {
        self.inner.get(id.into())
    }

    /// Validates `document` and stores it under its `id`, replacing any
    /// document previously stored there.
    ///
    /// On error nothing is stored.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [Document::validate].
    pub fn set<D: Into<Value>>(&self, document: D) -> PersistResult<DocumentId> {
        self.inner.set(document.into())
    }

    /// Deletes the document stored under `id`. Deleting a missing document
    /// succeeds.
    pub fn delete<K: Into<Value>>(&self, id: K) -> PersistResult<()> {
        self.inner.delete(id.into())
    }

    pub fn contains<K: Into<Value>>(&self, id: K) -> PersistResult<bool> {
        self.inner.contains(id.into())
    }

    pub fn documents(&self) -> PersistResult<Vec<Document>> {
        self.inner.documents()
    }

    pub fn size(&self) -> PersistResult<u64> {
        self.inner.size()
    }

    pub fn is_empty(&self) -> PersistResult<bool> {
        Ok(self.inner.size()? == 0)
    }

    pub fn clear(&self) -> PersistResult<()> {
        self.inner.clear()
    }

    pub fn name(&self) -> String {
        self.inner.name()
    }

    pub fn is_open(&self) -> PersistResult<bool> {
        self.inner.is_open()
    }

    /// Closes this handle and every clone of it. The stored documents stay in
    /// the database and a fresh handle can be obtained again.
    pub fn close(&self) -> PersistResult<()> {
        self.inner.close()
    }

    pub(crate) fn dispose(&self) -> PersistResult<()> {
        self.inner.dispose()
    }

    pub fn is_dropped(&self) -> PersistResult<bool> {
        self.inner.is_dropped()
    }

    /// Checks whether two handles refer to the same open collection instance.
    pub fn same_instance(&self, other: &Collection) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
