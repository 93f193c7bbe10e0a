//! Response definitions
//!
//! One response type per operation. Every response carries a mandatory
//! error slot next to its result fields and implements [`Reply`] so the
//! dispatcher can deliver failures as data.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::RouteError;
use crate::key::Key;
use crate::rpc::Reply;

/// One key/value row returned by a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub key: Key,
    pub value: Bytes,
}

// =============================================================================
// Response Types
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContainsResponse {
    pub exists: bool,
    pub error: Option<RouteError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetResponse {
    /// Stored value, `None` when the key does not exist.
    pub value: Option<Bytes>,
    pub error: Option<RouteError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PutResponse {
    pub error: Option<RouteError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncrementResponse {
    /// Value after the increment was applied.
    pub new_value: i64,
    pub error: Option<RouteError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub error: Option<RouteError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteRangeResponse {
    /// Number of entries removed. For a multi-range delete this is the sum
    /// across all sub-intervals that succeeded.
    pub num_deleted: u64,
    pub error: Option<RouteError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanResponse {
    /// Rows in ascending key order.
    pub rows: Vec<Row>,
    pub error: Option<RouteError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndTransactionResponse {
    /// True only when every participant range acknowledged the commit.
    pub committed: bool,
    pub error: Option<RouteError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccumulateTsResponse {
    pub error: Option<RouteError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReapQueueResponse {
    /// Reaped messages, up to the requested maximum. Fewer than the maximum
    /// means the inbox is empty.
    pub messages: Vec<Bytes>,
    pub error: Option<RouteError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnqueueUpdateResponse {
    pub error: Option<RouteError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnqueueMessageResponse {
    pub error: Option<RouteError>,
}

// =============================================================================
// Reply Implementations
// =============================================================================

impl Reply for ContainsResponse {
    fn set_error(&mut self, err: RouteError) {
        self.error = Some(err);
    }
    fn error(&self) -> Option<&RouteError> {
        self.error.as_ref()
    }
}

impl Reply for GetResponse {
    fn set_error(&mut self, err: RouteError) {
        self.error = Some(err);
    }
    fn error(&self) -> Option<&RouteError> {
        self.error.as_ref()
    }
}

impl Reply for PutResponse {
    fn set_error(&mut self, err: RouteError) {
        self.error = Some(err);
    }
    fn error(&self) -> Option<&RouteError> {
        self.error.as_ref()
    }
}

impl Reply for IncrementResponse {
    fn set_error(&mut self, err: RouteError) {
        self.error = Some(err);
    }
    fn error(&self) -> Option<&RouteError> {
        self.error.as_ref()
    }
}

impl Reply for DeleteResponse {
    fn set_error(&mut self, err: RouteError) {
        self.error = Some(err);
    }
    fn error(&self) -> Option<&RouteError> {
        self.error.as_ref()
    }
}

impl Reply for DeleteRangeResponse {
    fn set_error(&mut self, err: RouteError) {
        self.error = Some(err);
    }
    fn error(&self) -> Option<&RouteError> {
        self.error.as_ref()
    }
}

impl Reply for ScanResponse {
    fn set_error(&mut self, err: RouteError) {
        self.error = Some(err);
    }
    fn error(&self) -> Option<&RouteError> {
        self.error.as_ref()
    }
}

impl Reply for EndTransactionResponse {
    fn set_error(&mut self, err: RouteError) {
        self.error = Some(err);
    }
    fn error(&self) -> Option<&RouteError> {
        self.error.as_ref()
    }
}

impl Reply for AccumulateTsResponse {
    fn set_error(&mut self, err: RouteError) {
        self.error = Some(err);
    }
    fn error(&self) -> Option<&RouteError> {
        self.error.as_ref()
    }
}

impl Reply for ReapQueueResponse {
    fn set_error(&mut self, err: RouteError) {
        self.error = Some(err);
    }
    fn error(&self) -> Option<&RouteError> {
        self.error.as_ref()
    }
}

impl Reply for EnqueueUpdateResponse {
    fn set_error(&mut self, err: RouteError) {
        self.error = Some(err);
    }
    fn error(&self) -> Option<&RouteError> {
        self.error.as_ref()
    }
}

impl Reply for EnqueueMessageResponse {
    fn set_error(&mut self, err: RouteError) {
        self.error = Some(err);
    }
    fn error(&self) -> Option<&RouteError> {
        self.error.as_ref()
    }
}
