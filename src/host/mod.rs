//! Host-Side Components
//!
//! The pieces of the prober that talk to the node: the transport that moves
//! one JSON-RPC exchange, and the client that allocates ids and interprets
//! replies.

pub mod rpc;
pub mod transport;

pub use rpc::{CallError, RpcClient, RpcResult};
pub use transport::{HttpTransport, Transport, TransportError, DEFAULT_CALL_TIMEOUT};
