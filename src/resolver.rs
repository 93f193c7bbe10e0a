//! Resolver Module
//!
//! Maps a key to the node currently owning its range.
//!
//! ## Responsibilities
//! - Consult the range cache first; on a hit no metadata I/O happens
//! - On a miss, walk the bi-level metadata index down to the data range
//! - Populate the cache with every descriptor learned along the way
//! - Provide epoch-checked eviction for the dispatcher's failure path
//!
//! ## Lookup Path (cold cache)
//! ```text
//! data key k
//!   └─ meta2 record for k ──── held by some range
//!        └─ meta1 record ───── held by some range
//!             └─ first range ─ location published by the topology source
//! ```
//! Each level is resolved through the cache when possible, so a warm cache
//! answers in one ordered-map probe with no store traffic.

use std::sync::Arc;

use crate::config::Config;
use crate::error::{Result, RouteError};
use crate::key::{meta_key, Key};
use crate::range::{NodeAddr, RangeCache, RangeDescriptor};

/// Authoritative source of range metadata (external collaborator).
///
/// Combines the two external feeds the resolver needs: the topology
/// broadcast, which only ever supplies the location of the first range, and
/// the metadata ranges themselves, read record-by-record from whichever node
/// holds them.
pub trait DescriptorStore: Send + Sync {
    /// Current descriptor of the first range, as published by the cluster
    /// topology source. The first range covers all first-level metadata
    /// records and anchors every cold lookup.
    fn first_range(&self) -> Result<RangeDescriptor>;

    /// Read the range record addressed by `meta_key` from the metadata
    /// range owned by `node`. Returns `Ok(None)` when no record covers the
    /// key, which the resolver treats as a consistency fault, since
    /// descriptors partition the key space.
    fn descriptor(&self, node: &NodeAddr, meta_key: &[u8]) -> Result<Option<RangeDescriptor>>;
}

/// A resolved route: the descriptor to dispatch against plus the cache
/// epoch it was observed under.
#[derive(Debug, Clone)]
pub struct Route {
    pub descriptor: RangeDescriptor,
    pub epoch: u64,
}

impl Route {
    /// Node to send the call to.
    pub fn node(&self) -> &NodeAddr {
        &self.descriptor.node
    }
}

/// Resolves keys to owning nodes through the range cache and the
/// descriptor store.
pub struct Resolver {
    store: Arc<dyn DescriptorStore>,
    cache: RangeCache,
    max_meta_depth: usize,
}

impl Resolver {
    pub fn new(store: Arc<dyn DescriptorStore>, config: &Config) -> Self {
        Self {
            store,
            cache: RangeCache::new(config.cache_capacity),
            max_meta_depth: config.max_meta_depth,
        }
    }

    /// Resolve `key` to the range currently owning it.
    ///
    /// Fails with [`RouteError::NodeResolution`] when no route can be
    /// determined: the store is unreachable, the metadata descent exceeds
    /// the depth cap, or a record is missing/ill-fitting for an existing
    /// key (an internal consistency fault, not a normal miss).
    pub fn resolve(&self, key: &[u8]) -> Result<Route> {
        self.resolve_at_depth(key, self.max_meta_depth)
    }

    /// Evict the cache entry behind `route` if it has not been refreshed
    /// since the route was handed out.
    pub fn evict_stale(&self, route: &Route) {
        let evicted = self
            .cache
            .evict_if_epoch(&route.descriptor.start_key, route.epoch);
        if evicted {
            tracing::debug!(range = %route.descriptor, "evicted stale range descriptor");
        }
    }

    /// The cache, exposed for inspection in tests and tooling.
    pub fn cache(&self) -> &RangeCache {
        &self.cache
    }

    fn resolve_at_depth(&self, key: &[u8], depth_budget: usize) -> Result<Route> {
        if let Some(hit) = self.cache.lookup(key) {
            tracing::trace!(key = ?key, range = %hit.descriptor, "range cache hit");
            return Ok(Route {
                descriptor: hit.descriptor,
                epoch: hit.epoch,
            });
        }

        if depth_budget == 0 {
            return Err(RouteError::NodeResolution(format!(
                "metadata recursion cap ({}) exceeded resolving key {:?}",
                self.max_meta_depth, key
            )));
        }

        let descriptor = match meta_key(key) {
            // First-level metadata keys are covered by the first range,
            // whose location comes straight from the topology source.
            None => self.store.first_range()?,
            Some(mk) => {
                let holder = self.resolve_at_depth(&mk, depth_budget - 1)?;
                self.lookup_record(holder.node(), &mk)?
            }
        };

        if !descriptor.contains(key) {
            return Err(RouteError::NodeResolution(format!(
                "descriptor {} does not cover key {:?}: metadata inconsistent",
                descriptor, key
            )));
        }

        tracing::debug!(key = ?key, range = %descriptor, "resolved range via metadata lookup");
        let epoch = self.cache.insert(descriptor.clone());
        Ok(Route { descriptor, epoch })
    }

    fn lookup_record(&self, holder: &NodeAddr, mk: &Key) -> Result<RangeDescriptor> {
        self.store.descriptor(holder, mk)?.ok_or_else(|| {
            RouteError::NodeResolution(format!(
                "no range record at metadata key {:?}: metadata inconsistent",
                mk
            ))
        })
    }
}
