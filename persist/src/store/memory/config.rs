/// Configuration of an [crate::store::memory::InMemoryStore].
///
/// # Examples
///
/// ```rust
/// use persist::store::memory::InMemoryStoreConfig;
///
/// let config = InMemoryStoreConfig::new().with_map_capacity(64);
/// assert_eq!(config.map_capacity(), 64);
/// assert!(!config.is_read_only());
/// ```
#[derive(Clone, Debug)]
pub struct InMemoryStoreConfig {
    map_capacity: usize,
    read_only: bool,
}

impl InMemoryStoreConfig {
    /// Default number of maps the store reserves room for.
    pub const DEFAULT_MAP_CAPACITY: usize = 16;

    pub fn new() -> InMemoryStoreConfig {
        InMemoryStoreConfig {
            map_capacity: Self::DEFAULT_MAP_CAPACITY,
            read_only: false,
        }
    }

    /// Sets how many maps the store's registry reserves room for up front.
    pub fn with_map_capacity(mut self, map_capacity: usize) -> Self {
        self.map_capacity = map_capacity;
        self
    }

    /// Makes every map of the store reject writes.
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn map_capacity(&self) -> usize {
        self.map_capacity
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }
}

impl Default for InMemoryStoreConfig {
    fn default() -> Self {
        Self::new()
    }
}
