//! Transport seam
//!
//! The wire transport is an external collaborator: something that can
//! perform a named method against a node with encoded payloads.

use crate::error::Result;
use crate::range::NodeAddr;

/// A callable that performs remote method invocations (external collaborator).
///
/// Payloads are bincode-encoded request/response messages (see
/// [`crate::protocol::codec`]); the transport moves opaque bytes and is
/// unaware of operation kinds.
///
/// Error contract: transport-level failures surface as
/// [`crate::RouteError::RemoteCall`]; a node refusing the call because it no
/// longer owns the addressed range surfaces as
/// [`crate::RouteError::StaleRoute`] so the dispatcher can refresh its
/// routing metadata and retry.
pub trait Transport: Send + Sync {
    /// Invoke `method` on `node` with an encoded request, returning the
    /// encoded response.
    fn call(&self, node: &NodeAddr, method: &str, request: &[u8]) -> Result<Vec<u8>>;
}
