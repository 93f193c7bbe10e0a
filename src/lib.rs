//! # Meridian
//!
//! Client-side routing layer for a distributed key-value store:
//! - Range-addressed routing with a bounded LRU descriptor cache
//! - Bi-level metadata lookups anchored at the topology source
//! - Generic asynchronous dispatch with single-slot response futures
//! - Bounded eviction-and-retry on stale routes
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Operation Façade                           │
//! │     (Get/Put/Scan/EndTransaction... + range splitting)       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  Async Dispatcher                            │
//! │        (task per call, single-slot future, retry)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Resolver   │          │  Transport  │
//!   │ (key→node)  │          │  (injected) │
//!   └──────┬──────┘          └──────┬──────┘
//!          │                        │
//!          ▼                        ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ Range Cache │          │ remote node │
//!   │ (LRU, epoch)│          └─────────────┘
//!   └──────┬──────┘
//!          ▼
//!   ┌─────────────────┐
//!   │ DescriptorStore │
//!   │   (injected)    │
//!   └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod client;
pub mod key;
pub mod protocol;
pub mod range;
pub mod resolver;
pub mod rpc;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use client::Client;
pub use config::Config;
pub use error::{Result, RouteError};
pub use key::Key;
pub use range::{NodeAddr, RangeDescriptor};
pub use resolver::{DescriptorStore, Resolver, Route};
pub use rpc::{Call, Dispatcher, Reply, ResponseFuture, Transport};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of Meridian
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
