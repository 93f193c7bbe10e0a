//! Range Module
//!
//! Range descriptors and the client-side descriptor cache.
//!
//! ## Responsibilities
//! - Describe a contiguous key range and its current owner
//! - Cache descriptors learned during resolution (bounded, LRU)
//! - Atomic whole-entry replacement and epoch-checked eviction

mod cache;
mod descriptor;

pub use cache::{CachedRange, RangeCache};
pub use descriptor::{NodeAddr, RangeDescriptor};
