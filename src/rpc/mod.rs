//! RPC Module
//!
//! The generic asynchronous dispatch seam.
//!
//! ## Architecture
//! - `Transport`: a callable performing `method` against node `N` (injected)
//! - `Call`: a typed request/response pair plus its remote method name
//! - `Dispatcher`: per-call background task, single-slot future, bounded
//!   retry on stale routes

mod call;
mod dispatch;
mod transport;

pub use call::{Call, Reply};
pub use dispatch::{Dispatcher, ResponseFuture};
pub use transport::Transport;
