//! Async Dispatcher
//!
//! Turns any typed request/response pair into a non-blocking call: dispatch
//! immediately returns a single-slot future and a background task resolves
//! the owning node, performs the remote call, and delivers exactly one
//! response (success or error-populated) through the future.
//!
//! ## Concurrency Model
//! One task per outstanding call; tasks run independently with no global
//! lock. The caller's thread never blocks inside `dispatch`; blocking (if
//! any) happens only when the caller chooses to read the returned future.
//! Abandoning a future does not cancel the task: it completes and its
//! result is dropped with the channel.

use std::sync::Arc;
use std::thread;

use crossbeam::channel::{bounded, Receiver, Sender, TryRecvError};

use crate::error::{Result, RouteError};
use crate::key::Key;
use crate::protocol::codec;
use crate::resolver::Resolver;
use crate::rpc::{Call, Reply, Transport};

/// A single-use, single-value handle to an in-flight call.
///
/// Exactly one value is ever written to it; ownership transfers to the
/// caller upon return, who is solely responsible for reading or discarding
/// it.
pub struct ResponseFuture<R> {
    rx: Receiver<R>,
}

impl<R: Reply> ResponseFuture<R> {
    fn new(rx: Receiver<R>) -> Self {
        Self { rx }
    }

    /// Build an unfilled future plus the sender that will complete it.
    /// Used by multi-range coordinators that aggregate sub-calls into one
    /// response.
    pub(crate) fn channel() -> (Sender<R>, Self) {
        let (tx, rx) = bounded(1);
        (tx, Self { rx })
    }

    /// Build a future that is already completed with `response`.
    /// Used for operations that fail before any dispatch is attempted.
    pub(crate) fn ready(response: R) -> Self {
        let (tx, rx) = bounded(1);
        // Capacity one and a single send: cannot fail.
        let _ = tx.send(response);
        Self { rx }
    }

    /// Block until the response arrives and take it.
    pub fn wait(self) -> R {
        match self.rx.recv() {
            Ok(response) => response,
            // The task writes exactly once before terminating on every code
            // path, so a closed-without-send channel means it was killed
            // externally (e.g. its thread could not be spawned).
            Err(_) => {
                let mut response = R::default();
                response.set_error(RouteError::RemoteCall(
                    "dispatch task terminated without a reply".to_string(),
                ));
                response
            }
        }
    }

    /// Take the response if it has already arrived.
    pub fn poll(&self) -> Option<R> {
        match self.rx.try_recv() {
            Ok(response) => Some(response),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

/// Generic engine dispatching typed calls to resolved nodes.
pub struct Dispatcher {
    resolver: Arc<Resolver>,
    transport: Arc<dyn Transport>,
    stale_retry_limit: usize,
}

impl Dispatcher {
    pub fn new(
        resolver: Arc<Resolver>,
        transport: Arc<dyn Transport>,
        stale_retry_limit: usize,
    ) -> Self {
        Self {
            resolver,
            transport,
            stale_retry_limit,
        }
    }

    /// Dispatch `request` to the node owning `key`, returning immediately.
    ///
    /// The background task delivers exactly one response through the
    /// returned future; any failure (resolution or remote call) arrives in
    /// the response's error field rather than as a panic.
    pub fn dispatch<C: Call>(&self, key: Key, request: C::Request) -> ResponseFuture<C::Response> {
        let (tx, rx) = bounded(1);
        let resolver = Arc::clone(&self.resolver);
        let transport = Arc::clone(&self.transport);
        let retry_limit = self.stale_retry_limit;

        thread::spawn(move || {
            let response = match Self::run_call::<C>(&resolver, &*transport, &key, &request, retry_limit)
            {
                Ok(response) => response,
                Err(err) => {
                    tracing::debug!(method = C::METHOD, key = ?key, %err, "call failed");
                    let mut response = C::Response::default();
                    response.set_error(err);
                    response
                }
            };
            // Single-slot channel owned by this task: the one send cannot
            // block, and a receiver dropped early just discards the value.
            let _ = tx.send(response);
        });

        ResponseFuture::new(rx)
    }

    /// Resolve, call, and decode, retrying through stale routes up to the
    /// configured limit.
    fn run_call<C: Call>(
        resolver: &Resolver,
        transport: &dyn Transport,
        key: &Key,
        request: &C::Request,
        retry_limit: usize,
    ) -> Result<C::Response> {
        let payload = codec::encode(request)?;
        let mut attempts_left = retry_limit + 1;

        loop {
            attempts_left -= 1;
            let route = resolver.resolve(key)?;

            tracing::trace!(method = C::METHOD, node = %route.node(), "sending call");
            let outcome = transport
                .call(route.node(), C::METHOD, &payload)
                .and_then(|bytes| codec::decode::<C::Response>(&bytes));

            // A stale route can surface either as a transport-level error or
            // inside the decoded response, when the node answered but
            // disowned the range.
            let stale_reason = match &outcome {
                Ok(response) => response.error().filter(|e| e.is_stale_route()).cloned(),
                Err(err) if err.is_stale_route() => Some(err.clone()),
                Err(_) => None,
            };

            if let Some(reason) = stale_reason {
                resolver.evict_stale(&route);
                if attempts_left > 0 {
                    tracing::debug!(method = C::METHOD, key = ?key, %reason, "stale route, retrying");
                    continue;
                }
                return Err(RouteError::RemoteCall(format!(
                    "range still moved after {} refresh(es): {}",
                    retry_limit, reason
                )));
            }

            return outcome;
        }
    }
}
