//! Protocol Module
//!
//! Typed request/response messages for every operation, the marker types
//! binding them to remote method names, and the bincode codec used at the
//! transport seam.
//!
//! ## Message Contract
//! - every request carries one or more routing keys plus operation fields
//! - every response carries its result fields plus a mandatory error slot;
//!   a delivered response holds either a valid result or a populated error
//!
//! ## Method Names
//! `"Node.<OperationName>"`, e.g. `Node.Get`, `Node.DeleteRange`,
//! `Node.EndTransaction`.

pub mod codec;

mod calls;
mod request;
mod response;

pub use calls::{
    AccumulateTs, Contains, Delete, DeleteRange, EndTransaction, EnqueueMessage, EnqueueUpdate,
    Get, Increment, Put, ReapQueue, Scan,
};
pub use request::{
    AccumulateTsRequest, ContainsRequest, DeleteRangeRequest, DeleteRequest,
    EndTransactionRequest, EnqueueMessageRequest, EnqueueUpdateRequest, GetRequest,
    IncrementRequest, PutRequest, ReapQueueRequest, ScanRequest,
};
pub use response::{
    AccumulateTsResponse, ContainsResponse, DeleteRangeResponse, DeleteResponse,
    EndTransactionResponse, EnqueueMessageResponse, EnqueueUpdateResponse, GetResponse,
    IncrementResponse, PutResponse, ReapQueueResponse, Row, ScanResponse,
};
