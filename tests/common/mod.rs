//! Shared test fixture: an in-memory cluster behind the `DescriptorStore`
//! and `Transport` seams. Import with `mod common;` in test files.
//!
//! The fixture keeps one authoritative topology (the data ranges) and
//! derives everything else from it:
//! - metadata lookups answer from the topology and count their traffic
//! - transport calls execute against a shared in-memory store, and a call
//!   reaching a node that no longer owns the addressed key answers with a
//!   stale-route error, exactly like a real node would after a range moved
//!
//! Faults are scripted per node: `force_stale` makes the next N calls fail
//! at the transport level, `set_dissent` makes a node refuse commits.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;

use meridian::key::{META1_PREFIX, META2_PREFIX};
use meridian::protocol::codec;
use meridian::protocol::{
    AccumulateTsRequest, AccumulateTsResponse, ContainsRequest, ContainsResponse,
    DeleteRangeRequest, DeleteRangeResponse, DeleteRequest, DeleteResponse,
    EndTransactionRequest, EndTransactionResponse, EnqueueMessageRequest, EnqueueMessageResponse,
    GetRequest, GetResponse, IncrementRequest, IncrementResponse, PutRequest, PutResponse,
    ReapQueueRequest, ReapQueueResponse, Row, ScanRequest, ScanResponse,
};
use meridian::{
    Client, Config, DescriptorStore, NodeAddr, RangeDescriptor, Result, RouteError, Transport,
};

/// Node name owning the metadata ranges in every test topology.
pub const META_NODE: &str = "meta-node:26257";

/// Initialize test logging once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Client wired to `cluster` with the default config.
pub fn client(cluster: &Arc<TestCluster>) -> Client {
    client_with(cluster, Config::default())
}

pub fn client_with(cluster: &Arc<TestCluster>, config: Config) -> Client {
    Client::new(
        Arc::clone(cluster) as Arc<dyn DescriptorStore>,
        Arc::clone(cluster) as Arc<dyn Transport>,
        config,
    )
}

/// In-memory cluster implementing both external seams.
pub struct TestCluster {
    /// Data ranges, the single source of truth for ownership
    ranges: Mutex<Vec<RangeDescriptor>>,

    /// Shared key-value contents (routing is under test, not storage)
    data: Mutex<BTreeMap<Bytes, Bytes>>,

    /// Inbox queues for ReapQueue / EnqueueMessage
    queues: Mutex<HashMap<Bytes, Vec<Bytes>>>,

    /// Every transport call as (node, method), in arrival order
    calls: Mutex<Vec<(String, String)>>,

    /// Metadata traffic counters
    first_range_calls: AtomicUsize,
    record_lookups: AtomicUsize,

    /// node -> number of upcoming calls to fail with a transport-level
    /// stale-route error
    force_stale: Mutex<HashMap<String, usize>>,

    /// Nodes that refuse EndTransaction commits
    dissenting: Mutex<HashSet<String>>,
}

impl TestCluster {
    /// Build a cluster from `(start_key, end_key, node)` data ranges.
    pub fn new(ranges: &[(&[u8], &[u8], &str)]) -> Arc<Self> {
        let descriptors = ranges
            .iter()
            .map(|(start, end, node)| {
                RangeDescriptor::new(
                    Bytes::copy_from_slice(start),
                    Bytes::copy_from_slice(end),
                    NodeAddr::new(*node),
                )
            })
            .collect();
        Arc::new(Self {
            ranges: Mutex::new(descriptors),
            data: Mutex::new(BTreeMap::new()),
            queues: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            first_range_calls: AtomicUsize::new(0),
            record_lookups: AtomicUsize::new(0),
            force_stale: Mutex::new(HashMap::new()),
            dissenting: Mutex::new(HashSet::new()),
        })
    }

    // -------------------------------------------------------------------------
    // Topology & fault scripting
    // -------------------------------------------------------------------------

    /// Reassign the range starting at `start` to `new_node`. Calls still
    /// reaching the old owner will answer stale from now on.
    pub fn move_range(&self, start: &[u8], new_node: &str) {
        let mut ranges = self.ranges.lock();
        let range = ranges
            .iter_mut()
            .find(|d| d.start_key.as_ref() == start)
            .expect("no range with that start key");
        range.node = NodeAddr::new(new_node);
        range.replicas = vec![range.node.clone()];
    }

    /// Fail the next `count` transport calls to `node` with a
    /// transport-level stale-route error.
    pub fn force_stale(&self, node: &str, count: usize) {
        self.force_stale.lock().insert(node.to_string(), count);
    }

    /// Make `node` refuse EndTransaction commits.
    pub fn set_dissent(&self, node: &str) {
        self.dissenting.lock().insert(node.to_string());
    }

    /// Seed a key-value pair directly, bypassing routing.
    pub fn seed(&self, key: &[u8], value: &[u8]) {
        self.data
            .lock()
            .insert(Bytes::copy_from_slice(key), Bytes::copy_from_slice(value));
    }

    // -------------------------------------------------------------------------
    // Observation
    // -------------------------------------------------------------------------

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }

    pub fn calls_to_method(&self, method: &str) -> usize {
        self.calls.lock().iter().filter(|(_, m)| m == method).count()
    }

    pub fn record_lookups(&self) -> usize {
        self.record_lookups.load(Ordering::SeqCst)
    }

    pub fn first_range_calls(&self) -> usize {
        self.first_range_calls.load(Ordering::SeqCst)
    }

    pub fn value_of(&self, key: &[u8]) -> Option<Bytes> {
        self.data.lock().get(key).cloned()
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn data_range_for(&self, key: &[u8]) -> Option<RangeDescriptor> {
        self.ranges
            .lock()
            .iter()
            .find(|d| d.contains(key))
            .cloned()
    }

    fn owns(&self, node: &NodeAddr, key: &[u8]) -> bool {
        self.data_range_for(key)
            .map(|d| d.node == *node)
            .unwrap_or(false)
    }

    fn stale<R: meridian::Reply + serde::Serialize>(
        &self,
        node: &NodeAddr,
        key: &[u8],
    ) -> Result<Vec<u8>> {
        let mut response = R::default();
        response.set_error(RouteError::StaleRoute(format!(
            "{} does not own key {:?}",
            node, key
        )));
        codec::encode(&response)
    }
}

// =============================================================================
// DescriptorStore Implementation
// =============================================================================

impl DescriptorStore for TestCluster {
    fn first_range(&self) -> Result<RangeDescriptor> {
        self.first_range_calls.fetch_add(1, Ordering::SeqCst);
        // The first range covers everything below the meta2 prefix, which
        // includes all meta1 records.
        Ok(RangeDescriptor::new(
            Bytes::new(),
            Bytes::copy_from_slice(META2_PREFIX),
            NodeAddr::new(META_NODE),
        ))
    }

    fn descriptor(&self, _node: &NodeAddr, meta_key: &[u8]) -> Result<Option<RangeDescriptor>> {
        self.record_lookups.fetch_add(1, Ordering::SeqCst);

        if meta_key.starts_with(META1_PREFIX) {
            // The meta1 record locates the (single) meta2 range, which spans
            // every meta2 key.
            return Ok(Some(RangeDescriptor::new(
                Bytes::copy_from_slice(META2_PREFIX),
                Bytes::copy_from_slice(b"\x00\x00meta3"),
                NodeAddr::new(META_NODE),
            )));
        }

        if let Some(data_key) = meta_key.strip_prefix(META2_PREFIX) {
            return Ok(self.data_range_for(data_key));
        }

        Err(RouteError::NodeResolution(format!(
            "lookup for non-metadata key {:?}",
            meta_key
        )))
    }
}

// =============================================================================
// Transport Implementation
// =============================================================================

impl Transport for TestCluster {
    fn call(&self, node: &NodeAddr, method: &str, request: &[u8]) -> Result<Vec<u8>> {
        self.calls
            .lock()
            .push((node.to_string(), method.to_string()));

        // Scripted transport-level staleness.
        {
            let mut force = self.force_stale.lock();
            if let Some(remaining) = force.get_mut(node.as_str()) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(RouteError::StaleRoute(format!(
                        "{} refused the call (scripted)",
                        node
                    )));
                }
            }
        }

        match method {
            "Node.Contains" => {
                let req: ContainsRequest = codec::decode(request)?;
                if !self.owns(node, &req.key) {
                    return self.stale::<ContainsResponse>(node, &req.key);
                }
                let response = ContainsResponse {
                    exists: self.data.lock().contains_key(&req.key),
                    error: None,
                };
                codec::encode(&response)
            }

            "Node.Get" => {
                let req: GetRequest = codec::decode(request)?;
                if !self.owns(node, &req.key) {
                    return self.stale::<GetResponse>(node, &req.key);
                }
                let response = GetResponse {
                    value: self.data.lock().get(&req.key).cloned(),
                    error: None,
                };
                codec::encode(&response)
            }

            "Node.Put" => {
                let req: PutRequest = codec::decode(request)?;
                if !self.owns(node, &req.key) {
                    return self.stale::<PutResponse>(node, &req.key);
                }
                self.data.lock().insert(req.key, req.value);
                codec::encode(&PutResponse { error: None })
            }

            "Node.Increment" => {
                let req: IncrementRequest = codec::decode(request)?;
                if !self.owns(node, &req.key) {
                    return self.stale::<IncrementResponse>(node, &req.key);
                }
                let mut data = self.data.lock();
                let current = data
                    .get(&req.key)
                    .and_then(|v| <[u8; 8]>::try_from(v.as_ref()).ok())
                    .map(i64::from_be_bytes)
                    .unwrap_or(0);
                let new_value = current + req.amount;
                data.insert(req.key, Bytes::copy_from_slice(&new_value.to_be_bytes()));
                codec::encode(&IncrementResponse {
                    new_value,
                    error: None,
                })
            }

            "Node.Delete" => {
                let req: DeleteRequest = codec::decode(request)?;
                if !self.owns(node, &req.key) {
                    return self.stale::<DeleteResponse>(node, &req.key);
                }
                self.data.lock().remove(&req.key);
                codec::encode(&DeleteResponse { error: None })
            }

            "Node.DeleteRange" => {
                let req: DeleteRangeRequest = codec::decode(request)?;
                if !self.owns(node, &req.start_key) {
                    return self.stale::<DeleteRangeResponse>(node, &req.start_key);
                }
                let mut data = self.data.lock();
                let doomed: Vec<Bytes> = data
                    .range(req.start_key.clone()..req.end_key.clone())
                    .map(|(k, _)| k.clone())
                    .collect();
                for key in &doomed {
                    data.remove(key);
                }
                codec::encode(&DeleteRangeResponse {
                    num_deleted: doomed.len() as u64,
                    error: None,
                })
            }

            "Node.Scan" => {
                let req: ScanRequest = codec::decode(request)?;
                if !self.owns(node, &req.start_key) {
                    return self.stale::<ScanResponse>(node, &req.start_key);
                }
                let data = self.data.lock();
                let mut rows = Vec::new();
                for (key, value) in data.range(req.start_key.clone()..req.end_key.clone()) {
                    if req.max_results != 0 && rows.len() as u64 >= req.max_results {
                        break;
                    }
                    rows.push(Row {
                        key: key.clone(),
                        value: value.clone(),
                    });
                }
                codec::encode(&ScanResponse { rows, error: None })
            }

            "Node.EndTransaction" => {
                let req: EndTransactionRequest = codec::decode(request)?;
                let owned = req.keys.iter().any(|k| self.owns(node, k));
                if !owned {
                    let key = req.keys.first().cloned().unwrap_or_default();
                    return self.stale::<EndTransactionResponse>(node, &key);
                }
                let committed = !self.dissenting.lock().contains(node.as_str());
                codec::encode(&EndTransactionResponse {
                    committed,
                    error: None,
                })
            }

            "Node.AccumulateTS" => {
                let req: AccumulateTsRequest = codec::decode(request)?;
                if !self.owns(node, &req.key) {
                    return self.stale::<AccumulateTsResponse>(node, &req.key);
                }
                let mut data = self.data.lock();
                let mut series: Vec<i64> = data
                    .get(&req.key)
                    .map(|v| codec::decode(v))
                    .transpose()?
                    .unwrap_or_default();
                if series.len() < req.counts.len() {
                    series.resize(req.counts.len(), 0);
                }
                for (slot, count) in series.iter_mut().zip(req.counts.iter()) {
                    *slot += count;
                }
                data.insert(req.key, Bytes::from(codec::encode(&series)?));
                codec::encode(&AccumulateTsResponse { error: None })
            }

            "Node.ReapQueue" => {
                let req: ReapQueueRequest = codec::decode(request)?;
                if !self.owns(node, &req.inbox) {
                    return self.stale::<ReapQueueResponse>(node, &req.inbox);
                }
                let mut queues = self.queues.lock();
                let queue = queues.entry(req.inbox).or_default();
                let take = if req.max_results == 0 {
                    queue.len()
                } else {
                    queue.len().min(req.max_results as usize)
                };
                let messages: Vec<Bytes> = queue.drain(..take).collect();
                codec::encode(&ReapQueueResponse {
                    messages,
                    error: None,
                })
            }

            "Node.EnqueueMessage" => {
                let req: EnqueueMessageRequest = codec::decode(request)?;
                if !self.owns(node, &req.inbox) {
                    return self.stale::<EnqueueMessageResponse>(node, &req.inbox);
                }
                self.queues
                    .lock()
                    .entry(req.inbox)
                    .or_default()
                    .push(req.message);
                codec::encode(&EnqueueMessageResponse { error: None })
            }

            other => Err(RouteError::RemoteCall(format!(
                "unknown method {:?}",
                other
            ))),
        }
    }
}
