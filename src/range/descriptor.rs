//! Range descriptor definitions
//!
//! A descriptor identifies a range's boundaries and current owner.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::key::Key;

/// Address of a cluster node's RPC endpoint (`host:port`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeAddr(String);

impl NodeAddr {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeAddr {
    fn from(addr: &str) -> Self {
        Self(addr.to_string())
    }
}

/// Metadata identifying a key range and the node(s) holding it.
///
/// Descriptors partition the key space: `[start_key, end_key)` with the
/// start inclusive and the end exclusive. The `node` is the owner currently
/// serving the range; `replicas` lists every node holding a copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeDescriptor {
    /// First key of the range (inclusive)
    pub start_key: Key,

    /// End of the range (exclusive)
    pub end_key: Key,

    /// Node currently owning the range
    pub node: NodeAddr,

    /// All nodes holding a replica of the range
    pub replicas: Vec<NodeAddr>,
}

impl RangeDescriptor {
    /// Build a descriptor owned by a single node with no extra replicas.
    pub fn new(start_key: impl Into<Key>, end_key: impl Into<Key>, node: NodeAddr) -> Self {
        let replicas = vec![node.clone()];
        Self {
            start_key: start_key.into(),
            end_key: end_key.into(),
            node,
            replicas,
        }
    }

    /// Whether `key` falls inside `[start_key, end_key)`.
    pub fn contains(&self, key: &[u8]) -> bool {
        key >= self.start_key.as_ref() && key < self.end_key.as_ref()
    }
}

impl fmt::Display for RangeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:?}, {:?}) @ {}",
            self.start_key, self.end_key, self.node
        )
    }
}
