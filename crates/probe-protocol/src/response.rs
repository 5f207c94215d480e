//! JSON-RPC response envelope and the tagged reply it resolves to.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{ProtocolError, RpcErrorPayload};
use crate::JSONRPC_VERSION;

/// JSON-RPC 2.0 response envelope.
///
/// Exactly one of `result` / `error` is expected. A present-but-null
/// `result` is kept as `Some(Value::Null)` so it is not confused with a
/// missing member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    /// Echoed request id (null when the node could not parse the request).
    #[serde(default)]
    pub id: Value,
    /// Protocol version string.
    #[serde(default)]
    pub jsonrpc: String,
    /// Success payload.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub result: Option<Value>,
    /// Error payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorPayload>,
}

fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl RpcResponse {
    /// Build a success response.
    pub fn success(id: u64, result: Value) -> Self {
        Self {
            id: Value::from(id),
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
        }
    }

    /// Build an error response.
    pub fn error(id: u64, error: RpcErrorPayload) -> Self {
        Self {
            id: Value::from(id),
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
        }
    }

    /// Parse a response body.
    pub fn from_json(body: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Resolve the envelope into a `Reply`, checking it answers `expected_id`.
    ///
    /// An error envelope is matched even when its id is null, since nodes
    /// answer unparseable requests that way.
    pub fn into_reply(self, expected_id: u64) -> Result<Reply, ProtocolError> {
        if !self.jsonrpc.is_empty() && self.jsonrpc != JSONRPC_VERSION {
            return Err(ProtocolError::Version(self.jsonrpc));
        }

        let id_matches = self.id.as_u64() == Some(expected_id);
        if !id_matches && !(self.id.is_null() && self.error.is_some()) {
            return Err(ProtocolError::IdMismatch {
                expected: expected_id,
                actual: self.id.to_string(),
            });
        }

        match (self.error, self.result) {
            (Some(error), _) => Ok(Reply::RpcError(error)),
            (None, Some(result)) => Ok(Reply::Ok(result)),
            (None, None) => Err(ProtocolError::EmptyResponse),
        }
    }
}

/// Outcome of a call that reached the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Reply {
    /// The node answered with a result payload.
    Ok(Value),
    /// The node answered with an application-level error.
    RpcError(RpcErrorPayload),
}

impl Reply {
    /// Returns true for `Reply::Ok`.
    pub fn is_ok(&self) -> bool {
        matches!(self, Reply::Ok(_))
    }

    /// Convert into a standard `Result`.
    pub fn into_result(self) -> Result<Value, RpcErrorPayload> {
        match self {
            Reply::Ok(value) => Ok(value),
            Reply::RpcError(error) => Err(error),
        }
    }
}
