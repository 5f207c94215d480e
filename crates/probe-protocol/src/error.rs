//! Error types for the JSON-RPC protocol.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::hex::HexError;

/// Well-known JSON-RPC 2.0 error codes.
pub mod codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
}

/// Error member of a JSON-RPC response.
///
/// The node reports application-level failures (unknown method, bad params)
/// through this payload. It is data, not a transport fault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorPayload {
    /// Numeric error code.
    pub code: i64,
    /// Human-readable, single-line message.
    pub message: String,
    /// Optional extra data supplied by the node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RpcErrorPayload {
    /// Create a new error payload.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Create a METHOD_NOT_FOUND error for the given method.
    pub fn method_not_found(method: &str) -> Self {
        Self::new(codes::METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }

    /// Create an INVALID_PARAMS error.
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(codes::INVALID_PARAMS, message)
    }
}

impl fmt::Display for RpcErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

/// Errors raised while interpreting a node's reply.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response id mismatch: expected {expected}, got {actual}")]
    IdMismatch { expected: u64, actual: String },

    #[error("response carries neither result nor error")]
    EmptyResponse,

    #[error("unsupported jsonrpc version: {0}")]
    Version(String),

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` has unexpected type: expected {expected}")]
    UnexpectedType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("invalid block number: {0}")]
    Hex(#[from] HexError),

    #[error("HTTP {status} reply is not JSON-RPC: {body}")]
    NotJsonRpc { status: u16, body: String },
}
