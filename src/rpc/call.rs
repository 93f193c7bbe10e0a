//! Typed call definitions
//!
//! A `Call` ties together a remote method name and its request/response
//! message types, so one generic dispatch path serves every operation kind
//! without per-kind duplication.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::RouteError;

/// A typed remote call: method name plus its matched request/response pair.
///
/// Implementors are zero-sized markers (one per operation); see
/// [`crate::protocol::calls`].
pub trait Call: Send + 'static {
    /// Remote method identifier, `"<Service>.<OperationName>"`.
    const METHOD: &'static str;

    /// Request message carrying the routing key(s) and operation fields.
    type Request: Serialize + Send + 'static;

    /// Response message; always carries an error slot.
    type Response: Reply + DeserializeOwned + Send + 'static;
}

/// Response-side contract: every response starts empty and carries a
/// mandatory error slot.
///
/// A delivered response holds either its result fields or a populated
/// error; the dispatcher writes failures here instead of raising across
/// the task boundary.
pub trait Reply: Default {
    /// Record a failure in the response.
    fn set_error(&mut self, err: RouteError);

    /// The recorded failure, if any.
    fn error(&self) -> Option<&RouteError>;
}
