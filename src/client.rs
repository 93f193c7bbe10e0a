//! Client Module
//!
//! The operation façade over the routing layer.
//!
//! ## Responsibilities
//! - One entry point per operation, each adapting its routing key(s) to the
//!   generic dispatcher
//! - Range splitting for operations spanning multiple key ranges
//! - Aggregation of multi-range sub-responses into one response
//!
//! Every method returns immediately with a [`ResponseFuture`]; the caller
//! decides when (or whether) to read it. No ordering is guaranteed between
//! two dispatches, even to the same key; callers requiring ordering must
//! serialize at a higher layer.

use std::cmp;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;

use crate::config::Config;
use crate::error::RouteError;
use crate::key::Key;
use crate::protocol;
use crate::protocol::{
    AccumulateTsRequest, AccumulateTsResponse, ContainsRequest, ContainsResponse,
    DeleteRangeRequest, DeleteRangeResponse, DeleteRequest, DeleteResponse,
    EndTransactionRequest, EndTransactionResponse, EnqueueMessageRequest, EnqueueMessageResponse,
    EnqueueUpdateRequest, EnqueueUpdateResponse, GetRequest, GetResponse, IncrementRequest,
    IncrementResponse, PutRequest, PutResponse, ReapQueueRequest, ReapQueueResponse, ScanRequest,
    ScanResponse,
};
use crate::resolver::{DescriptorStore, Resolver};
use crate::rpc::{Dispatcher, Reply, ResponseFuture, Transport};

/// Asynchronous client to the distributed key-value store.
///
/// Hides cluster topology, replica placement, and RPC mechanics behind a
/// uniform operation interface. Construction wires the injected descriptor
/// store and transport into a resolver and dispatcher shared by every call.
pub struct Client {
    resolver: Arc<Resolver>,
    dispatcher: Arc<Dispatcher>,
}

impl Client {
    /// Build a client from the external collaborators and configuration.
    pub fn new(
        store: Arc<dyn DescriptorStore>,
        transport: Arc<dyn Transport>,
        config: Config,
    ) -> Self {
        let resolver = Arc::new(Resolver::new(store, &config));
        let dispatcher = Arc::new(Dispatcher::new(
            Arc::clone(&resolver),
            transport,
            config.stale_retry_limit,
        ));
        Self {
            resolver,
            dispatcher,
        }
    }

    /// The resolver, exposed for inspection in tests and tooling.
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    // =========================================================================
    // Single-Key Operations
    // =========================================================================

    /// Check for the existence of a key.
    pub fn contains(&self, request: ContainsRequest) -> ResponseFuture<ContainsResponse> {
        self.dispatcher
            .dispatch::<protocol::Contains>(request.key.clone(), request)
    }

    /// Fetch the value stored at a key.
    pub fn get(&self, request: GetRequest) -> ResponseFuture<GetResponse> {
        self.dispatcher
            .dispatch::<protocol::Get>(request.key.clone(), request)
    }

    /// Store a value at a key.
    pub fn put(&self, request: PutRequest) -> ResponseFuture<PutResponse> {
        self.dispatcher
            .dispatch::<protocol::Put>(request.key.clone(), request)
    }

    /// Atomically add to the integer stored at a key.
    pub fn increment(&self, request: IncrementRequest) -> ResponseFuture<IncrementResponse> {
        self.dispatcher
            .dispatch::<protocol::Increment>(request.key.clone(), request)
    }

    /// Remove a key.
    pub fn delete(&self, request: DeleteRequest) -> ResponseFuture<DeleteResponse> {
        self.dispatcher
            .dispatch::<protocol::Delete>(request.key.clone(), request)
    }

    /// Accumulate a time series of integer counts into the value at a key.
    pub fn accumulate_ts(
        &self,
        request: AccumulateTsRequest,
    ) -> ResponseFuture<AccumulateTsResponse> {
        self.dispatcher
            .dispatch::<protocol::AccumulateTs>(request.key.clone(), request)
    }

    /// Scan and delete messages from a recipient inbox. Must be part of an
    /// extant transaction or the node rejects it.
    pub fn reap_queue(&self, request: ReapQueueRequest) -> ResponseFuture<ReapQueueResponse> {
        self.dispatcher
            .dispatch::<protocol::ReapQueue>(request.inbox.clone(), request)
    }

    /// Enqueue a message for delivery to an inbox.
    pub fn enqueue_message(
        &self,
        request: EnqueueMessageRequest,
    ) -> ResponseFuture<EnqueueMessageResponse> {
        self.dispatcher
            .dispatch::<protocol::EnqueueMessage>(request.inbox.clone(), request)
    }

    /// Enqueue an update for eventual execution.
    ///
    /// Queued updates target reserved system keys whose routing is not
    /// wired up; the call fails with [`RouteError::Unimplemented`] before
    /// any dispatch rather than silently doing nothing.
    pub fn enqueue_update(
        &self,
        _request: EnqueueUpdateRequest,
    ) -> ResponseFuture<EnqueueUpdateResponse> {
        let mut response = EnqueueUpdateResponse::default();
        response.set_error(RouteError::Unimplemented("EnqueueUpdate".to_string()));
        ResponseFuture::ready(response)
    }

    // =========================================================================
    // Multi-Range Operations
    // =========================================================================

    /// Remove every key in `[start_key, end_key)`.
    ///
    /// The interval is partitioned into the minimal ordered sequence of
    /// sub-intervals each inside one range; one sub-call is dispatched per
    /// interval, concurrently. `num_deleted` aggregates the counts of every
    /// sub-interval that succeeded; partial failures are reported alongside
    /// those counts (best effort).
    pub fn delete_range(&self, request: DeleteRangeRequest) -> ResponseFuture<DeleteRangeResponse> {
        let resolver = Arc::clone(&self.resolver);
        let dispatcher = Arc::clone(&self.dispatcher);
        let (tx, future) = ResponseFuture::channel();
        thread::spawn(move || {
            let response = run_delete_range(&resolver, &dispatcher, request);
            let _ = tx.send(response);
        });
        future
    }

    /// Read keys in `[start_key, end_key)` in ascending order, up to
    /// `max_results` rows (`0` means unlimited).
    ///
    /// Sub-ranges are visited in key order and scanning stops early once
    /// the quota is met, so later sub-ranges are never dispatched to.
    pub fn scan(&self, request: ScanRequest) -> ResponseFuture<ScanResponse> {
        let resolver = Arc::clone(&self.resolver);
        let dispatcher = Arc::clone(&self.dispatcher);
        let (tx, future) = ResponseFuture::channel();
        thread::spawn(move || {
            let response = run_scan(&resolver, &dispatcher, request);
            let _ = tx.send(response);
        });
        future
    }

    /// Commit a transaction across every range touched by its key set.
    ///
    /// Each key's range is resolved, participants are deduplicated by
    /// range, and one commit call is dispatched per distinct range. The
    /// transaction commits only if every participant acknowledges; any
    /// dissent or failure is a transaction failure, never partial success.
    pub fn end_transaction(
        &self,
        request: EndTransactionRequest,
    ) -> ResponseFuture<EndTransactionResponse> {
        let resolver = Arc::clone(&self.resolver);
        let dispatcher = Arc::clone(&self.dispatcher);
        let (tx, future) = ResponseFuture::channel();
        thread::spawn(move || {
            let response = run_end_transaction(&resolver, &dispatcher, request);
            let _ = tx.send(response);
        });
        future
    }
}

// =============================================================================
// Multi-Range Coordinators
// =============================================================================

/// Partition `[start, end)` into the minimal ordered sub-intervals each
/// fully contained in one range. On a resolution failure the intervals
/// found so far are returned with the error, so the caller can still
/// operate best-effort on the resolvable prefix.
fn split_ranges(
    resolver: &Resolver,
    start: &Key,
    end: &Key,
) -> (Vec<(Key, Key)>, Option<RouteError>) {
    let mut intervals = Vec::new();
    let mut cursor = start.clone();

    while cursor < *end {
        let route = match resolver.resolve(&cursor) {
            Ok(route) => route,
            Err(err) => return (intervals, Some(err)),
        };
        // resolve() guarantees the descriptor contains `cursor`, so the
        // range end is strictly past it and the loop advances.
        let range_end = route.descriptor.end_key.clone();
        let sub_end = cmp::min(range_end.clone(), end.clone());
        intervals.push((cursor, sub_end));
        cursor = range_end;
    }

    (intervals, None)
}

fn run_delete_range(
    resolver: &Resolver,
    dispatcher: &Dispatcher,
    request: DeleteRangeRequest,
) -> DeleteRangeResponse {
    let mut response = DeleteRangeResponse::default();
    let (intervals, split_err) = split_ranges(resolver, &request.start_key, &request.end_key);

    // One sub-call per interval, all in flight at once.
    let pending: Vec<_> = intervals
        .into_iter()
        .map(|(start_key, end_key)| {
            let sub = DeleteRangeRequest {
                start_key: start_key.clone(),
                end_key,
            };
            dispatcher.dispatch::<protocol::DeleteRange>(start_key, sub)
        })
        .collect();

    let mut failures: Vec<String> = split_err.into_iter().map(|e| e.to_string()).collect();
    for future in pending {
        let sub = future.wait();
        response.num_deleted += sub.num_deleted;
        if let Some(err) = sub.error {
            failures.push(err.to_string());
        }
    }

    if !failures.is_empty() {
        tracing::debug!(failures = failures.len(), "delete range partially failed");
        response.error = Some(RouteError::RemoteCall(format!(
            "{} sub-range(s) failed: {}",
            failures.len(),
            failures.join("; ")
        )));
    }
    response
}

fn run_scan(resolver: &Resolver, dispatcher: &Dispatcher, request: ScanRequest) -> ScanResponse {
    let mut response = ScanResponse::default();
    let quota = request.max_results;
    let mut cursor = request.start_key.clone();

    while cursor < request.end_key {
        let route = match resolver.resolve(&cursor) {
            Ok(route) => route,
            Err(err) => {
                response.error = Some(err);
                break;
            }
        };
        let range_end = route.descriptor.end_key.clone();
        let sub_end = cmp::min(range_end.clone(), request.end_key.clone());
        let remaining = match quota {
            0 => 0,
            n => n - response.rows.len() as u64,
        };

        let sub = dispatcher
            .dispatch::<protocol::Scan>(
                cursor.clone(),
                ScanRequest {
                    start_key: cursor,
                    end_key: sub_end,
                    max_results: remaining,
                },
            )
            .wait();

        if let Some(err) = sub.error {
            response.error = Some(err);
            break;
        }
        response.rows.extend(sub.rows);

        // Quota satisfied: stop before touching later sub-ranges.
        if quota != 0 && response.rows.len() as u64 >= quota {
            response.rows.truncate(quota as usize);
            break;
        }
        cursor = range_end;
    }

    response
}

fn run_end_transaction(
    resolver: &Resolver,
    dispatcher: &Dispatcher,
    request: EndTransactionRequest,
) -> EndTransactionResponse {
    let mut response = EndTransactionResponse::default();

    // Dedupe participant ranges by start key, keeping one routing key each.
    let mut participants: BTreeMap<Key, Key> = BTreeMap::new();
    for key in &request.keys {
        match resolver.resolve(key) {
            Ok(route) => {
                participants
                    .entry(route.descriptor.start_key.clone())
                    .or_insert_with(|| key.clone());
            }
            Err(err) => {
                // A commit cannot proceed with an unresolvable participant.
                response.set_error(err);
                return response;
            }
        }
    }

    let pending: Vec<_> = participants
        .into_values()
        .map(|routing_key| {
            dispatcher.dispatch::<protocol::EndTransaction>(routing_key, request.clone())
        })
        .collect();

    let mut committed = true;
    let mut failures: Vec<String> = Vec::new();
    for future in pending {
        let ack = future.wait();
        if let Some(err) = ack.error {
            failures.push(err.to_string());
            committed = false;
        } else if !ack.committed {
            committed = false;
        }
    }

    if !failures.is_empty() {
        response.error = Some(RouteError::RemoteCall(format!(
            "{} participant(s) failed: {}",
            failures.len(),
            failures.join("; ")
        )));
    }
    response.committed = committed && response.error.is_none();
    response
}
