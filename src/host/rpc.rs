//! Node RPC Client
//!
//! Wraps a `Transport` with request-id allocation and reply resolution.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use probe_protocol::ops::{names, ChainHeader};
use probe_protocol::{ProtocolError, Reply, RpcErrorPayload, RpcRequest};
use serde_json::Value;

use crate::endpoint::Endpoint;
use crate::summary::FailureKind;

use super::transport::{Transport, TransportError};

/// Errors from a single call, classified by where it went wrong
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    #[error("transport error: {0}")]
    Transport(TransportError),

    #[error("rpc error: {0}")]
    Rpc(RpcErrorPayload),

    #[error("decode error: {0}")]
    Decode(#[from] ProtocolError),
}

/// Reachability is decided here: a malformed reply means the node answered.
impl From<TransportError> for CallError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Malformed(inner) => CallError::Decode(inner),
            other => CallError::Transport(other),
        }
    }
}

impl CallError {
    /// Map to the failure taxonomy
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            CallError::Transport(_) => FailureKind::TransportError,
            CallError::Rpc(_) => FailureKind::RpcError,
            CallError::Decode(_) => FailureKind::DecodeError,
        }
    }
}

/// Result type for RPC operations
pub type RpcResult<T> = Result<T, CallError>;

/// Node RPC client
pub struct RpcClient {
    transport: Arc<dyn Transport>,
    /// Request ID counter
    request_counter: AtomicU64,
}

impl RpcClient {
    /// Create a new RPC client with the given transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            request_counter: AtomicU64::new(1),
        }
    }

    /// Endpoint of the underlying transport
    pub fn endpoint(&self) -> &Endpoint {
        self.transport.endpoint()
    }

    /// Allocate the next request id
    fn next_request_id(&self) -> u64 {
        self.request_counter.fetch_add(1, Ordering::SeqCst)
    }

    /// Issue one call.
    ///
    /// An `error` member in the response is returned as `Reply::RpcError`;
    /// only transport and decoding failures are `Err`.
    pub fn call(&self, method: &str, params: Vec<Value>) -> RpcResult<Reply> {
        let request = RpcRequest::new(self.next_request_id(), method, params);
        let response = self.transport.execute(&request)?;
        let reply = response.into_reply(request.id)?;

        if let Reply::RpcError(ref error) = reply {
            tracing::warn!(method, code = error.code, message = %error.message, "node returned an error");
        }
        Ok(reply)
    }

    /// Issue one call and return its result payload, treating
    /// `Reply::RpcError` as a failure.
    pub fn request_value(&self, method: &str, params: Vec<Value>) -> RpcResult<Value> {
        self.call(method, params)?.into_result().map_err(CallError::Rpc)
    }

    /// `chain_getHeader` for the best block
    pub fn header(&self) -> RpcResult<ChainHeader> {
        let value = self.request_value(names::CHAIN_GET_HEADER, vec![])?;
        Ok(ChainHeader::from_value(&value)?)
    }
}
