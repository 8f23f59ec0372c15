use persist::errors::{ErrorKind, PersistResult};
use persist::store::memory::{InMemoryStore, InMemoryStoreConfig};
use persist::store::{StoreCatalog, StoreMap, StoreProvider};
use persist::{dict, Database};
use persist_int_test::test_util::{cleanup, expect_error_kind, run_test, TestContext};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A backend that records how many maps were opened through it.
struct CountingStore {
    delegate: InMemoryStore,
    opened_maps: Arc<AtomicUsize>,
}

impl StoreProvider for CountingStore {
    fn open_or_create(&self) -> PersistResult<()> {
        self.delegate.open_or_create()
    }

    fn is_closed(&self) -> PersistResult<bool> {
        self.delegate.is_closed()
    }

    fn close(&self) -> PersistResult<()> {
        self.delegate.close()
    }

    fn is_read_only(&self) -> PersistResult<bool> {
        self.delegate.is_read_only()
    }

    fn get_collection_names(&self) -> PersistResult<BTreeSet<String>> {
        self.delegate.get_collection_names()
    }

    fn has_map(&self, name: &str) -> PersistResult<bool> {
        self.delegate.has_map(name)
    }

    fn open_map(&self, name: &str) -> PersistResult<StoreMap> {
        self.opened_maps.fetch_add(1, Ordering::Relaxed);
        self.delegate.open_map(name)
    }

    fn close_map(&self, name: &str) -> PersistResult<()> {
        self.delegate.close_map(name)
    }

    fn remove_map(&self, name: &str) -> PersistResult<()> {
        self.delegate.remove_map(name)
    }

    fn store_version(&self) -> PersistResult<String> {
        Ok("Counting/1".to_string())
    }

    fn store_catalog(&self) -> PersistResult<StoreCatalog> {
        self.delegate.store_catalog()
    }
}

#[test]
fn test_custom_store_backend() {
    let opened_maps = Arc::new(AtomicUsize::new(0));
    let counter = opened_maps.clone();

    run_test(
        move || {
            let store = CountingStore {
                delegate: InMemoryStore::new(InMemoryStoreConfig::new()),
                opened_maps: counter.clone(),
            };
            Ok(TestContext::new(Database::builder().store(store).open()?))
        },
        |ctx| {
            let db = ctx.db();
            assert_eq!(db.store().store_version()?, "Counting/1");

            let users = db.collection("users")?;
            users.set(dict! { id: "alice" })?;
            db.collection("users")?;
            assert!(db.store().has_map("users")?);
            Ok(())
        },
        cleanup,
    );

    // one map for the collection, the catalog map is opened through the delegate
    assert_eq!(opened_maps.load(Ordering::Relaxed), 1);
}

#[test]
fn test_store_can_only_be_configured_once() {
    let result = Database::builder()
        .in_memory(InMemoryStoreConfig::new())
        .in_memory(InMemoryStoreConfig::new().with_read_only(true))
        .open();
    let err = expect_error_kind(result, ErrorKind::InvalidOperation).unwrap();
    assert!(err.message().contains("already configured"));
}

#[test]
fn test_closed_store_is_rejected() {
    let store = InMemoryStore::new(InMemoryStoreConfig::new());
    store.close().unwrap();

    let err = expect_error_kind(Database::builder().store(store).open(), ErrorKind::BackendError)
        .unwrap();
    assert_eq!(err.cause().map(|c| c.kind()), Some(&ErrorKind::StoreClosed));
}

#[test]
fn test_databases_are_isolated() {
    let first = Database::builder().open().unwrap();
    let second = Database::builder().open().unwrap();

    first.collection("users").unwrap().set(dict! { id: 1 }).unwrap();
    assert!(second.get_collection("users", false).unwrap().is_none());

    first.close().unwrap();
    assert!(!second.is_closed().unwrap());
    second.close().unwrap();
}
