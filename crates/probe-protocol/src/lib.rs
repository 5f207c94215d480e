//! Probe Protocol Types
//!
//! Defines the JSON-RPC 2.0 envelope used to talk to a node's RPC endpoint,
//! the tagged `Reply` a call resolves to, and the typed shapes of the
//! node replies the prober interprets.

pub mod error;
pub mod hex;
pub mod ops;
pub mod request;
pub mod response;

pub use error::{ProtocolError, RpcErrorPayload};
pub use hex::{decode_height, encode_height, HexError};
pub use request::RpcRequest;
pub use response::{Reply, RpcResponse};

/// JSON-RPC version string carried by every envelope.
pub const JSONRPC_VERSION: &str = "2.0";

/// Default node RPC endpoint (Substrate dev node HTTP/WS port).
pub const DEFAULT_ENDPOINT: &str = "http://localhost:9944";
