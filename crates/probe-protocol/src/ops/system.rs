//! `system_*` reply types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Node health as returned by `system_health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    /// Number of connected peers.
    pub peers: u64,
    /// Whether the node is major-syncing.
    pub is_syncing: bool,
    /// Whether the node expects to have peers (false for `--dev`).
    #[serde(default)]
    pub should_have_peers: bool,
}

/// One entry of `system_peers`. Only the fields used in reports are typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerInfo {
    /// Remote peer id.
    pub peer_id: String,
    /// Peer role ("FULL", "AUTHORITY", ...).
    #[serde(default)]
    pub roles: String,
    /// Best block number reported by the peer.
    #[serde(default)]
    pub best_number: Option<u64>,
}

/// Chain properties as returned by `system_properties`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(pub Map<String, Value>);

impl Properties {
    /// Token symbol. Multi-token chains report an array; the first entry is used.
    pub fn token_symbol(&self) -> Option<String> {
        first_or_scalar(self.0.get("tokenSymbol")?)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    /// Token decimals, with the same array handling as `token_symbol`.
    pub fn token_decimals(&self) -> Option<u64> {
        first_or_scalar(self.0.get("tokenDecimals")?).and_then(Value::as_u64)
    }

    /// SS58 address format, if present.
    pub fn ss58_format(&self) -> Option<u64> {
        self.0.get("ss58Format").and_then(Value::as_u64)
    }
}

fn first_or_scalar(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.first(),
        other => Some(other),
    }
}
