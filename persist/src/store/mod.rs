//! Storage backends and abstractions.
//!
//! The storage layer is pluggable. A backend implements [StoreProvider] and
//! hands out named maps implementing [MapProvider]; each collection is backed
//! by one map, and the reserved `__collections` map holds the [StoreCatalog].
//!
//! The crate ships [memory::InMemoryStore], which is also what
//! [crate::PersistConfig::auto_configure] installs when no store is set.

pub mod memory;
mod map;
#[allow(clippy::module_inception)]
mod store;
mod store_catalog;

pub use map::*;
pub use store::*;
pub use store_catalog::*;
