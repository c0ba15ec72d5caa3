/// Construction options for a [`Cache`](crate::Cache)
///
/// # Example
///
/// ```rust
/// use tillcache_core::{Cache, CacheConfig};
///
/// let config = CacheConfig::default().with_initial_capacity(1024);
/// let cache = Cache::with_config(config);
/// assert!(cache.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheConfig {
    /// Number of entries to reserve room for up front (default: 0).
    ///
    /// This is not a limit; the cache grows past it as needed.
    pub initial_capacity: usize,
}

impl CacheConfig {
    /// Creates a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial capacity of the underlying map
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.initial_capacity, 0);
    }

    #[test]
    fn test_builder_pattern_chaining() {
        let config = CacheConfig::new()
            .with_initial_capacity(16)
            .with_initial_capacity(64);
        assert_eq!(config.initial_capacity, 64);
    }
}
