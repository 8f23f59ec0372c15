//! # Persist - Embedded Document Store
//!
//! Persist keeps named collections of documents in a pluggable storage
//! backend. A document is a dictionary of typed values that carries its
//! primary key in the reserved `id` field.
//!
//! ## Quick Start
//!
//! ```rust
//! use persist::{dict, Database};
//!
//! # fn main() -> persist::errors::PersistResult<()> {
//! let db = Database::builder().open()?;
//! let users = db.collection("users")?;
//!
//! users.set(dict! { id: "alice", age: 30 })?;
//! let alice = users.get("alice")?.expect("stored above");
//! assert_eq!(alice.get("age").and_then(|v| v.as_i64()), Some(30));
//!
//! users.delete("alice")?;
//! assert!(users.get("alice")?.is_none());
//!
//! db.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Every failure is a [errors::PersistError]. Its [errors::ErrorKind] tells
//! usage errors (a wrong argument type, a bad key or name) apart from
//! validity errors (a document without a usable `id`) and operational ones
//! (a closed store, a backend failure).
//!
//! ## Module Organization
//!
//! - [`collection`] - Collections, documents and document ids
//! - [`common`] - Values, dictionaries, locks and shared constants
//! - [`errors`] - Error types and result definitions
//! - [`database`] - The database handle
//! - [`database_builder`] - Fluent database construction
//! - [`persist_config`] - Database configuration
//! - [`store`] - Storage backend abstractions and the in-memory store

pub mod collection;
pub mod common;
pub mod database;
pub mod database_builder;
pub mod errors;
pub mod persist_config;
pub mod store;

pub use collection::{Collection, Document, DocumentId};
pub use common::{Dictionary, Value};
pub use database::Database;
pub use database_builder::DatabaseBuilder;
pub use persist_config::PersistConfig;
