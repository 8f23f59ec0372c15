//! Documents and the collections that store them.
//!
//! A [Collection] holds [Document]s keyed by their [DocumentId]. Collections
//! are obtained from a [crate::Database]; documents are produced by
//! [Document::validate], which every `set` runs before storing anything.

#[allow(clippy::module_inception)]
mod collection;
pub(crate) mod collection_factory;
mod default_collection;
mod document;

pub use collection::*;
pub use document::*;
