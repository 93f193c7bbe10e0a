//! Configuration for Meridian
//!
//! Centralized configuration with sensible defaults.

/// Main configuration for a Meridian client instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Range Cache Configuration
    // -------------------------------------------------------------------------
    /// Max number of range descriptors kept in the cache before the least
    /// recently used entry is evicted.
    pub cache_capacity: usize,

    // -------------------------------------------------------------------------
    // Resolution Configuration
    // -------------------------------------------------------------------------
    /// Max depth of the bi-level metadata descent. Resolving a data key
    /// normally takes three levels (data -> meta2 -> meta1 -> first range);
    /// exceeding the cap fails the lookup instead of looping on corrupt
    /// metadata.
    pub max_meta_depth: usize,

    // -------------------------------------------------------------------------
    // Dispatch Configuration
    // -------------------------------------------------------------------------
    /// How many times a call is re-sent after a stale-route failure evicts
    /// the cached descriptor. Past the limit the failure escalates into the
    /// response instead of retrying indefinitely.
    pub stale_retry_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: 256,
            max_meta_depth: 4,
            stale_retry_limit: 1,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the range cache capacity (number of descriptors)
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache_capacity = capacity;
        self
    }

    /// Set the metadata lookup recursion cap
    pub fn max_meta_depth(mut self, depth: usize) -> Self {
        self.config.max_meta_depth = depth;
        self
    }

    /// Set the stale-route retry limit
    pub fn stale_retry_limit(mut self, retries: usize) -> Self {
        self.config.stale_retry_limit = retries;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
