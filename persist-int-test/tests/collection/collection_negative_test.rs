use persist::collection::Document;
use persist::common::Value;
use persist::errors::ErrorKind;
use persist::{dict, val};
use persist_int_test::test_util::{
    cleanup, create_read_only_test_context, create_test_context, expect_error_kind, run_test,
};

#[test]
fn test_set_rejects_non_dictionaries() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;

            let err = expect_error_kind(collection.set(5), ErrorKind::TypeMismatch)?;
            assert!(err.is_usage_error());
            let err = expect_error_kind(collection.set(Value::Null), ErrorKind::TypeMismatch)?;
            assert!(err.is_usage_error());
            expect_error_kind(collection.set(vec![val!("id")]), ErrorKind::TypeMismatch)?;

            assert!(collection.is_empty()?);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_set_rejects_missing_id() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            let err = expect_error_kind(
                collection.set(dict! { name: "no id" }),
                ErrorKind::MissingId,
            )?;
            assert!(err.is_validity_error());
            assert!(!err.is_usage_error());
            assert!(collection.is_empty()?);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_set_rejects_invalid_ids() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;

            let err = expect_error_kind(collection.set(dict! { id: (-1) }), ErrorKind::InvalidId)?;
            assert!(err.is_validity_error());
            expect_error_kind(collection.set(dict! { id: 1.5 }), ErrorKind::InvalidId)?;
            expect_error_kind(collection.set(dict! { id: () }), ErrorKind::InvalidId)?;
            expect_error_kind(collection.set(dict! { id: { nested: 1 } }), ErrorKind::InvalidId)?;
            expect_error_kind(collection.set(dict! { id: b"raw" }), ErrorKind::InvalidId)?;

            assert!(collection.is_empty()?);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_failed_set_leaves_existing_document() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            collection.set(dict! { id: "a", v: 1 })?;
            assert!(collection.set(dict! { v: 2 }).is_err());

            let stored = collection.get("a")?.map(Document::into_body);
            assert_eq!(stored, Some(dict! { id: "a", v: 1 }));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_document_is_not_a_key() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            let document = dict! { id: "a" };
            collection.set(document.clone())?;

            let err = expect_error_kind(collection.get(document.clone()), ErrorKind::InvalidKey)?;
            assert!(err.is_usage_error());
            expect_error_kind(collection.delete(document), ErrorKind::InvalidKey)?;

            let validated = Document::validate(val!(dict! { id: "a" }))?;
            expect_error_kind(collection.get(validated), ErrorKind::InvalidKey)?;

            assert!(collection.contains("a")?);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_unsupported_key_types() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            expect_error_kind(collection.get(1.5), ErrorKind::InvalidKey)?;
            expect_error_kind(collection.get(true), ErrorKind::InvalidKey)?;
            expect_error_kind(collection.get(Value::Null), ErrorKind::InvalidKey)?;
            expect_error_kind(collection.delete(vec![val!(1)]), ErrorKind::InvalidKey)?;
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_dropped_collection_rejects_operations() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let collection = db.collection("test")?;
            db.remove_collection("test")?;

            assert!(collection.is_dropped()?);
            expect_error_kind(collection.get("a"), ErrorKind::InvalidOperation)?;
            expect_error_kind(collection.set(dict! { id: "a" }), ErrorKind::InvalidOperation)?;
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_closed_collection_rejects_operations() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            collection.close()?;
            expect_error_kind(collection.size(), ErrorKind::InvalidOperation)?;
            expect_error_kind(collection.delete("a"), ErrorKind::InvalidOperation)?;
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_read_only_store_rejects_writes() {
    run_test(
        create_read_only_test_context,
        |ctx| {
            let db = ctx.db();
            assert!(db.collection("test").is_err());
            assert!(!db.store().has_map("test")?);
            assert!(db.get_collection("test", false)?.is_none());
            Ok(())
        },
        cleanup,
    )
}
