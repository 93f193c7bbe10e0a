//! Call bindings
//!
//! Marker types binding each request/response pair to its remote method
//! name, so the dispatcher stays generic over operation kinds.

use crate::rpc::Call;

use super::request::*;
use super::response::*;

/// `Node.Contains`: existence check.
pub struct Contains;

impl Call for Contains {
    const METHOD: &'static str = "Node.Contains";
    type Request = ContainsRequest;
    type Response = ContainsResponse;
}

/// `Node.Get`: point read.
pub struct Get;

impl Call for Get {
    const METHOD: &'static str = "Node.Get";
    type Request = GetRequest;
    type Response = GetResponse;
}

/// `Node.Put`: point write.
pub struct Put;

impl Call for Put {
    const METHOD: &'static str = "Node.Put";
    type Request = PutRequest;
    type Response = PutResponse;
}

/// `Node.Increment`: atomic counter update.
pub struct Increment;

impl Call for Increment {
    const METHOD: &'static str = "Node.Increment";
    type Request = IncrementRequest;
    type Response = IncrementResponse;
}

/// `Node.Delete`: point delete.
pub struct Delete;

impl Call for Delete {
    const METHOD: &'static str = "Node.Delete";
    type Request = DeleteRequest;
    type Response = DeleteResponse;
}

/// `Node.DeleteRange`: delete within one range's boundaries.
pub struct DeleteRange;

impl Call for DeleteRange {
    const METHOD: &'static str = "Node.DeleteRange";
    type Request = DeleteRangeRequest;
    type Response = DeleteRangeResponse;
}

/// `Node.Scan`: ordered read within one range's boundaries.
pub struct Scan;

impl Call for Scan {
    const METHOD: &'static str = "Node.Scan";
    type Request = ScanRequest;
    type Response = ScanResponse;
}

/// `Node.EndTransaction`: commit acknowledgement from one participant range.
pub struct EndTransaction;

impl Call for EndTransaction {
    const METHOD: &'static str = "Node.EndTransaction";
    type Request = EndTransactionRequest;
    type Response = EndTransactionResponse;
}

/// `Node.AccumulateTS`: time-series accumulation.
pub struct AccumulateTs;

impl Call for AccumulateTs {
    const METHOD: &'static str = "Node.AccumulateTS";
    type Request = AccumulateTsRequest;
    type Response = AccumulateTsResponse;
}

/// `Node.ReapQueue`: scan-and-delete from an inbox.
pub struct ReapQueue;

impl Call for ReapQueue {
    const METHOD: &'static str = "Node.ReapQueue";
    type Request = ReapQueueRequest;
    type Response = ReapQueueResponse;
}

/// `Node.EnqueueUpdate`: reserved; the façade fails this operation before
/// any dispatch, so the method name is never sent.
pub struct EnqueueUpdate;

impl Call for EnqueueUpdate {
    const METHOD: &'static str = "Node.EnqueueUpdate";
    type Request = EnqueueUpdateRequest;
    type Response = EnqueueUpdateResponse;
}

/// `Node.EnqueueMessage`: message delivery to an inbox.
pub struct EnqueueMessage;

impl Call for EnqueueMessage {
    const METHOD: &'static str = "Node.EnqueueMessage";
    type Request = EnqueueMessageRequest;
    type Response = EnqueueMessageResponse;
}
