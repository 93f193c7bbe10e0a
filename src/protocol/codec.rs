//! Protocol codec
//!
//! Bincode encoding of request/response messages at the transport seam.
//! The transport moves the resulting bytes opaquely; only this layer and
//! the remote node interpret them.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, RouteError};

/// Encode a message for the wire.
pub fn encode<T: Serialize>(message: &T) -> Result<Vec<u8>> {
    bincode::serialize(message)
        .map_err(|e| RouteError::Serialization(format!("encode failed: {}", e)))
}

/// Decode a message received from the wire.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    bincode::deserialize(bytes)
        .map_err(|e| RouteError::Serialization(format!("decode failed: {}", e)))
}
