// document constants
pub const DOC_ID: &str = "id";

// catalog constants
pub const COLLECTION_CATALOG: &str = "__collections";
pub const CATALOG_CREATED_AT: &str = "created_at";
pub const CATALOG_MIGRATIONS: &str = "migrations";
pub const CATALOG_METADATA: &str = "metadata";

pub const RESERVED_NAMES: [&str; 1] = [COLLECTION_CATALOG];

pub const PERSIST_VERSION: &str = env!("CARGO_PKG_VERSION");
