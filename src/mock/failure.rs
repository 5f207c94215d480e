//! Scripted replies and failure injection for the mock node
//!
//! Supports configurable failure injection for testing error paths.

use std::time::Duration;

use probe_protocol::{RpcErrorPayload, RpcRequest, RpcResponse};
use serde_json::Value;

use crate::host::TransportError;

/// A scripted answer for one method
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Successful `result` payload
    Result(Value),
    /// JSON-RPC `error` member
    Error(RpcErrorPayload),
    /// Well-formed envelope that answers a different request id
    WrongId,
    /// Envelope with neither `result` nor `error`
    Empty,
    /// Connection refused
    Refused,
    /// Call timed out
    Timeout(Duration),
}

impl MockReply {
    /// Turn the scripted reply into what the transport returns for `request`
    pub(crate) fn respond(&self, request: &RpcRequest) -> Result<RpcResponse, TransportError> {
        match self {
            MockReply::Result(value) => Ok(RpcResponse::success(request.id, value.clone())),
            MockReply::Error(error) => Ok(RpcResponse::error(request.id, error.clone())),
            MockReply::WrongId => Ok(RpcResponse::success(request.id + 1000, Value::Null)),
            MockReply::Empty => {
                let mut response = RpcResponse::success(request.id, Value::Null);
                response.result = None;
                Ok(response)
            }
            MockReply::Refused => Err(TransportError::ConnectionFailed(
                "connection refused (os error 111)".to_string(),
            )),
            MockReply::Timeout(after) => Err(TransportError::Timeout(*after)),
        }
    }
}

/// Failure configuration for a method
#[derive(Debug, Clone)]
pub struct FailureConfig {
    /// Reply to return while failing
    pub reply: MockReply,
    /// Delay to add before responding
    pub delay: Option<Duration>,
    /// Number of times to fail before answering normally (None = always fail)
    pub fail_count: Option<u32>,
}

impl FailureConfig {
    /// Fail every call with `reply`
    pub fn reply(reply: MockReply) -> Self {
        Self {
            reply,
            delay: None,
            fail_count: None,
        }
    }

    /// Set the number of times to fail before succeeding
    pub fn with_fail_count(mut self, count: u32) -> Self {
        self.fail_count = Some(count);
        self
    }

    /// Delay the failing reply
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Consume one failure; returns false once the budget is spent
    pub(crate) fn take(&mut self) -> bool {
        match self.fail_count.as_mut() {
            None => true,
            Some(0) => false,
            Some(remaining) => {
                *remaining -= 1;
                true
            }
        }
    }
}
