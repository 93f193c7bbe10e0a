//! Range descriptor cache
//!
//! Bounded, least-recently-used cache mapping a range's start key to its
//! descriptor. Populated lazily during resolution, evicted when a routing
//! failure reveals the entry is stale.
//!
//! ## Concurrency:
//! - `entries`: BTreeMap under RwLock (many concurrent readers, brief
//!   exclusive writers); the lock is never held across a remote call
//! - recency stamps: per-entry atomics bumped under the read lock
//! - epochs: global atomic counter; entries are replaced whole, and eviction
//!   is epoch-checked so a slow failure path cannot clobber a fresher entry

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::key::Key;
use crate::range::RangeDescriptor;

/// A cache read: the descriptor plus the epoch it was inserted under.
///
/// Callers hand the epoch back to [`RangeCache::evict_if_epoch`] when a
/// remote call proves the route stale; if the entry was refreshed in the
/// meantime the eviction is a no-op.
#[derive(Debug, Clone)]
pub struct CachedRange {
    pub descriptor: RangeDescriptor,
    pub epoch: u64,
}

struct Slot {
    descriptor: RangeDescriptor,
    epoch: u64,
    last_used: AtomicU64,
}

/// Bounded LRU cache of range descriptors, keyed by range start key.
pub struct RangeCache {
    /// Max entries before LRU eviction kicks in
    capacity: usize,

    /// Descriptors keyed by start key; ordered so lookup can find the
    /// nearest range at or below a key
    entries: RwLock<BTreeMap<Key, Slot>>,

    /// Logical clock for recency stamps (lock-free)
    tick: AtomicU64,

    /// Monotonically increasing insertion epoch (lock-free)
    next_epoch: AtomicU64,
}

impl RangeCache {
    /// Create an empty cache holding at most `capacity` descriptors.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: RwLock::new(BTreeMap::new()),
            tick: AtomicU64::new(1),
            next_epoch: AtomicU64::new(1),
        }
    }

    /// Find the cached descriptor whose `[start, end)` interval contains
    /// `key`, bumping its recency on a hit.
    pub fn lookup(&self, key: &[u8]) -> Option<CachedRange> {
        let entries = self.entries.read();

        // Nearest entry at or below `key`; the interval check rejects a
        // neighbor range that merely precedes the key.
        let (_, slot) = entries
            .range::<[u8], _>((Bound::Unbounded, Bound::Included(key)))
            .next_back()?;
        if !slot.descriptor.contains(key) {
            return None;
        }

        let now = self.tick.fetch_add(1, Ordering::Relaxed);
        slot.last_used.store(now, Ordering::Relaxed);

        Some(CachedRange {
            descriptor: slot.descriptor.clone(),
            epoch: slot.epoch,
        })
    }

    /// Insert or replace the entry for `descriptor`'s start key, returning
    /// the epoch assigned to it. Entries are replaced whole; if the cache is
    /// over capacity the least recently used entry is dropped.
    pub fn insert(&self, descriptor: RangeDescriptor) -> u64 {
        let epoch = self.next_epoch.fetch_add(1, Ordering::Relaxed);
        let now = self.tick.fetch_add(1, Ordering::Relaxed);

        let mut entries = self.entries.write();
        entries.insert(
            descriptor.start_key.clone(),
            Slot {
                descriptor,
                epoch,
                last_used: AtomicU64::new(now),
            },
        );

        if entries.len() > self.capacity {
            if let Some(coldest) = entries
                .iter()
                .min_by_key(|(_, slot)| slot.last_used.load(Ordering::Relaxed))
                .map(|(start, _)| start.clone())
            {
                tracing::trace!(start_key = ?coldest, "range cache full, evicting LRU entry");
                entries.remove(&coldest);
            }
        }

        epoch
    }

    /// Evict the entry for `start_key` if it still carries `epoch`.
    /// Returns whether an entry was removed.
    pub fn evict_if_epoch(&self, start_key: &[u8], epoch: u64) -> bool {
        let mut entries = self.entries.write();
        match entries.get(start_key) {
            Some(slot) if slot.epoch == epoch => {
                entries.remove(start_key);
                true
            }
            _ => false,
        }
    }

    /// Number of cached descriptors.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every entry (used when the whole topology is known to have moved).
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
