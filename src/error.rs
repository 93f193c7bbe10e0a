//! Error types for Meridian
//!
//! Provides a unified error type for all routing operations.
//!
//! Errors here are data: they travel inside response error fields through
//! the dispatch future, never as panics across task boundaries. Every
//! variant carries only a `String` payload so responses holding an error
//! can cross the wire with the rest of the message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using RouteError
pub type Result<T> = std::result::Result<T, RouteError>;

/// Unified error type for Meridian routing operations
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RouteError {
    // -------------------------------------------------------------------------
    // Resolution Errors
    // -------------------------------------------------------------------------
    /// No route could be determined for a key: the descriptor store is
    /// unreachable, the metadata recursion cap was exceeded, or the store
    /// returned an empty/ill-fitting record for an existing key (an internal
    /// consistency fault, not a normal miss).
    #[error("node resolution failed: {0}")]
    NodeResolution(String),

    // -------------------------------------------------------------------------
    // Remote Call Errors
    // -------------------------------------------------------------------------
    /// Transport failure while invoking the resolved node, or the escalated
    /// form of a stale route that persisted past the retry limit.
    #[error("remote call failed: {0}")]
    RemoteCall(String),

    /// The contacted node reports it does not own the key, or the range
    /// boundaries have moved. Triggers eviction of the cached descriptor
    /// and a bounded retry.
    #[error("stale route: {0}")]
    StaleRoute(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Unsupported Operations
    // -------------------------------------------------------------------------
    /// Operation intentionally not supported; fails immediately with no
    /// dispatch attempted.
    #[error("operation not implemented: {0}")]
    Unimplemented(String),
}

impl RouteError {
    /// Whether this error indicates the cached route was stale and the
    /// call is worth retrying after eviction.
    pub fn is_stale_route(&self) -> bool {
        matches!(self, RouteError::StaleRoute(_))
    }
}
