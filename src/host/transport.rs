//! Transport Layer for the RPC Client
//!
//! Abstracts the wire for testability. Provides:
//! - Transport trait: one request in, one response out
//! - HttpTransport: JSON-RPC over HTTP POST for production
//!
//! The in-process mock lives in `crate::mock`.

use std::error::Error as StdError;
use std::time::Duration;

use probe_protocol::{ProtocolError, RpcRequest, RpcResponse};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;

use crate::endpoint::Endpoint;

/// Default per-call timeout
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Longest slice of an unexpected response body kept for error messages
const BODY_EXCERPT_LEN: usize = 200;

/// Transport trait for RPC communication
pub trait Transport: Send + Sync {
    /// Send one request and wait for its response.
    ///
    /// Implementations must return within their configured timeout.
    fn execute(&self, request: &RpcRequest) -> Result<RpcResponse, TransportError>;

    /// Endpoint this transport talks to
    fn endpoint(&self) -> &Endpoint;
}

/// Transport errors
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Gateway in front of the node could not reach it (502/503/504)
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("request failed: {0}")]
    Request(String),

    #[error("client setup failed: {0}")]
    Setup(String),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("malformed response: {0}")]
    Malformed(#[from] ProtocolError),
}

/// JSON-RPC over HTTP POST.
pub struct HttpTransport {
    endpoint: Endpoint,
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport with the given per-call timeout.
    pub fn new(endpoint: Endpoint, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| TransportError::Setup(describe(&e)))?;

        Ok(Self {
            endpoint,
            client,
            timeout,
        })
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else if err.is_connect() {
            TransportError::ConnectionFailed(describe(&err))
        } else {
            TransportError::Request(describe(&err))
        }
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &RpcRequest) -> Result<RpcResponse, TransportError> {
        let body = request.to_json()?;
        tracing::debug!(id = request.id, method = %request.method, "sending request");

        let response = self
            .client
            .post(self.endpoint.url().clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let text = response.text().map_err(|e| self.classify(e))?;
        tracing::debug!(id = request.id, status = status.as_u16(), bytes = text.len(), "received response");

        // Some servers answer JSON-RPC errors with a 4xx/5xx status; the
        // envelope is still authoritative when it parses. Any other non-JSON
        // reply came from the node itself, so it is malformed, not unreachable.
        match RpcResponse::from_json(&text) {
            Ok(parsed) => Ok(parsed),
            Err(_) if is_gateway_failure(status) => Err(TransportError::HttpStatus {
                status: status.as_u16(),
                body: excerpt(&text),
            }),
            Err(_) if !status.is_success() => Err(TransportError::Malformed(ProtocolError::NotJsonRpc {
                status: status.as_u16(),
                body: excerpt(&text),
            })),
            Err(e) => Err(TransportError::Malformed(e)),
        }
    }

    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

/// A proxy answered on behalf of a node it could not reach.
fn is_gateway_failure(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
    )
}

/// Flatten an error and its sources into one line.
fn describe(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}
