use persist::collection::{Document, DocumentId};
use persist::common::Value;
use persist::{dict, val};
use persist_int_test::test_util::{cleanup, create_test_context, run_test};

#[test]
fn test_trivial_insert() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            let document = dict! {
                id: "trivial_insert",
                foo: 5,
                binary: b"blah",
                nothing: (),
            };

            let id = collection.set(document.clone())?;
            assert_eq!(id, DocumentId::from("trivial_insert"));

            let stored = collection.get("trivial_insert")?;
            assert_eq!(stored.map(Document::into_body), Some(document));

            collection.delete("trivial_insert")?;
            assert!(collection.get("trivial_insert")?.is_none());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_duplicate_insert_replaces() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            let original = dict! {
                id: "duplicate_insert",
                foo: 5,
                binary: b"blah",
                nothing: (),
            };
            collection.set(original.clone())?;

            let mut modified = original.clone();
            modified.insert("different_field", 5u64);
            collection.set(modified.clone())?;

            let stored = collection.get("duplicate_insert")?.map(Document::into_body);
            assert_eq!(stored, Some(modified));
            assert_ne!(stored, Some(original));
            assert_eq!(collection.size()?, 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_upsert_does_not_merge_fields() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            collection.set(dict! { id: 7u64, a: 1, b: 2 })?;
            collection.set(dict! { id: 7u64, c: 3 })?;

            let stored = collection.get(7u64)?.map(Document::into_body);
            assert_eq!(stored, Some(dict! { id: 7u64, c: 3 }));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_nested_values_round_trip() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            let document = dict! {
                id: 42,
                ratio: 0.25,
                enabled: true,
                tags: ["a", "b", 3],
                owner: { name: "alice", limits: { max: 10u32 } },
                raw: b"\x00\xff",
            };
            collection.set(document.clone())?;

            let stored = collection.get(42)?;
            assert_eq!(stored.map(Document::into_body), Some(document));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_signed_and_unsigned_ids_are_distinct() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            collection.set(dict! { id: 5, kind: "signed" })?;
            collection.set(dict! { id: 5u64, kind: "unsigned" })?;

            assert_eq!(collection.size()?, 2);
            let signed = collection.get(5)?;
            let unsigned = collection.get(5u64)?;
            assert_eq!(signed.and_then(|d| d.get("kind").cloned()), Some(val!("signed")));
            assert_eq!(unsigned.and_then(|d| d.get("kind").cloned()), Some(val!("unsigned")));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_delete_is_idempotent() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            collection.set(dict! { id: "keep" })?;

            collection.delete("absent")?;
            collection.delete("absent")?;
            assert_eq!(collection.size()?, 1);
            assert!(collection.contains("keep")?);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_negative_key_never_matches() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            collection.set(dict! { id: 1 })?;
            assert!(collection.get(-1)?.is_none());
            collection.delete(-1)?;
            assert_eq!(collection.size()?, 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_documents_are_listed_in_id_order() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            collection.set(dict! { id: "b" })?;
            collection.set(dict! { id: 2u64 })?;
            collection.set(dict! { id: "a" })?;
            collection.set(dict! { id: 1 })?;

            let ids: Vec<DocumentId> = collection
                .documents()?
                .iter()
                .map(|d| d.id().clone())
                .collect();
            assert_eq!(
                ids,
                vec![
                    DocumentId::Int64(1),
                    DocumentId::UInt64(2),
                    DocumentId::from("a"),
                    DocumentId::from("b"),
                ]
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_clear_removes_every_document() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            for i in 0..10u64 {
                collection.set(dict! { id: i, value: (i * 2) })?;
            }
            assert_eq!(collection.size()?, 10);

            collection.clear()?;
            assert!(collection.is_empty()?);
            assert!(ctx.db().has_collection("test")?);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_validated_document_can_be_stored() {
    run_test(
        create_test_context,
        |ctx| {
            let collection = ctx.db().collection("test")?;
            let document = Document::validate(val!(dict! { id: "doc", n: 1 }))?;

            collection.set(document.clone())?;
            assert_eq!(collection.get(document.id().to_value())?, Some(document));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_closed_handle_is_replaced_on_next_lookup() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let collection = db.collection("test")?;
            collection.set(dict! { id: "x", v: 1 })?;
            collection.close()?;
            assert!(!collection.is_open()?);

            let reopened = db.collection("test")?;
            assert!(reopened.is_open()?);
            assert_eq!(
                reopened.get("x")?.and_then(|d| d.get("v").cloned()),
                Some(Value::Int64(1))
            );
            Ok(())
        },
        cleanup,
    )
}
