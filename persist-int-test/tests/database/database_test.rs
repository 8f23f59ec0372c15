use chrono::Utc;
use persist::common::{Value, COLLECTION_CATALOG};
use persist::errors::ErrorKind;
use persist::{dict, val};
use persist_int_test::test_util::{cleanup, create_test_context, expect_error_kind, run_test};

#[test]
fn test_get_collection_without_create() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            assert!(db.get_collection("users", false)?.is_none());
            assert!(db.list_collection_names()?.is_empty());

            let users = db.get_collection("users", true)?;
            assert!(users.is_some());
            assert!(db.get_collection("users", false)?.is_some());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_same_name_yields_same_data() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let first = db.collection("users")?;
            first.set(dict! { id: "alice" })?;

            let second = db.collection("users")?;
            assert!(first.same_instance(&second));
            assert!(second.contains("alice")?);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_invalid_collection_names() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let err = expect_error_kind(db.get_collection("", true), ErrorKind::InvalidName)?;
            assert!(err.is_usage_error());
            expect_error_kind(db.get_collection(COLLECTION_CATALOG, true), ErrorKind::InvalidName)?;
            expect_error_kind(
                db.get_collection(&COLLECTION_CATALOG.to_uppercase(), false),
                ErrorKind::InvalidName,
            )?;
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_list_and_remove_collections() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            for name in ["orders", "users", "audit"] {
                db.collection(name)?;
            }
            assert_eq!(db.list_collection_names()?, vec!["audit", "orders", "users"]);

            let orders = db.collection("orders")?;
            orders.set(dict! { id: 1u64, total: 9.5 })?;
            db.remove_collection("orders")?;
            assert_eq!(db.list_collection_names()?, vec!["audit", "users"]);
            assert!(!db.has_collection("orders")?);

            let recreated = db.collection("orders")?;
            assert!(recreated.is_empty()?);

            expect_error_kind(db.remove_collection("missing"), ErrorKind::CollectionNotFound)?;
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_collection_metadata() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            db.collection("users")?;
            assert_eq!(db.collection_metadata("users")?, val!(dict! {}));

            db.set_collection_metadata("users", dict! { owner: "ops", version: 3u32 })?;
            assert_eq!(
                db.collection_metadata("users")?,
                val!(dict! { owner: "ops", version: 3u32 })
            );

            db.set_collection_metadata("users", "plain")?;
            assert_eq!(db.collection_metadata("users")?, Value::String("plain".into()));

            expect_error_kind(db.collection_metadata("missing"), ErrorKind::CollectionNotFound)?;
            expect_error_kind(
                db.set_collection_metadata("missing", dict! {}),
                ErrorKind::CollectionNotFound,
            )?;
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_catalog_entry_shape() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let before = Utc::now().timestamp_millis();
            db.collection("users")?;
            let after = Utc::now().timestamp_millis();

            let created_at = db.collection_created_at("users")?.timestamp_millis();
            assert!(created_at >= before && created_at <= after);

            let catalog = db.store().store_catalog()?;
            assert!(catalog.get_migrations("users")?.is_empty());
            let entry = catalog.get_entry("users")?.map(|e| e.keys().len());
            assert_eq!(entry, Some(3));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_close_is_final_and_idempotent() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let users = db.collection("users")?;
            db.close()?;
            db.close()?;

            assert!(db.is_closed()?);
            expect_error_kind(db.get_collection("users", true), ErrorKind::StoreClosed)?;
            expect_error_kind(db.has_collection("users"), ErrorKind::StoreClosed)?;
            expect_error_kind(users.get("a"), ErrorKind::StoreClosed)?;
            Ok(())
        },
        cleanup,
    )
}
