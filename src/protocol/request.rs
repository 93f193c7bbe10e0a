//! Request definitions
//!
//! One request type per operation, each carrying its routing key(s) and
//! operation-specific fields.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::key::Key;

/// Check for the existence of a key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainsRequest {
    pub key: Key,
}

/// Fetch the value stored at a key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetRequest {
    pub key: Key,
}

/// Store a value at a key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutRequest {
    pub key: Key,
    pub value: Bytes,
}

/// Atomically add `amount` to the integer stored at a key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncrementRequest {
    pub key: Key,
    pub amount: i64,
}

/// Remove a key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub key: Key,
}

/// Remove every key in `[start_key, end_key)`.
///
/// The façade splits the interval per owning range before dispatch, so a
/// single request on the wire never crosses a range boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRangeRequest {
    pub start_key: Key,
    pub end_key: Key,
}

/// Read keys in `[start_key, end_key)` in ascending order, up to
/// `max_results` rows (`0` means unlimited).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRequest {
    pub start_key: Key,
    pub end_key: Key,
    pub max_results: u64,
}

/// Commit a transaction across every range touched by `keys`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndTransactionRequest {
    pub keys: Vec<Key>,
}

/// Accumulate a time series of integer counts into the value at a key.
///
/// A key/value might represent a minute of data as 60 per-second counts;
/// the node merges `counts` element-wise into the stored series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccumulateTsRequest {
    pub key: Key,
    pub counts: Vec<i64>,
}

/// Scan and delete messages from a recipient inbox, up to `max_results`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReapQueueRequest {
    pub inbox: Key,
    pub max_results: u64,
}

/// Enqueue an update for eventual execution against reserved system keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnqueueUpdateRequest {
    pub key: Key,
    pub value: Bytes,
}

/// Enqueue a message for delivery to an inbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnqueueMessageRequest {
    pub inbox: Key,
    pub message: Bytes,
}
