//! Mock Node Implementation
//!
//! Configurable in-process dev node answering the methods the probes use.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread;

use probe_protocol::ops::names;
use probe_protocol::{encode_height, RpcErrorPayload, RpcRequest, RpcResponse, DEFAULT_ENDPOINT};
use serde_json::{json, Value};

use crate::endpoint::Endpoint;
use crate::host::{Transport, TransportError};

use super::failure::{FailureConfig, MockReply};

/// How the chain height moves each time the run pauses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightChange {
    /// Blocks keep coming
    Advance(u64),
    /// Height goes backwards
    Rewind(u64),
    /// Block production stalled
    Hold,
}

/// Mutable node state
#[derive(Debug)]
struct NodeState {
    height: u64,
    on_pause: HeightChange,
    chain: String,
    version: String,
    is_syncing: bool,
    peers: Vec<Value>,
    nonces: HashMap<String, u64>,
    runtime: Value,
    properties: Value,
    replies: HashMap<String, MockReply>,
    failures: HashMap<String, FailureConfig>,
    unreachable: bool,
    requests: Vec<RpcRequest>,
}

impl NodeState {
    fn dev() -> Self {
        Self {
            height: 100,
            on_pause: HeightChange::Advance(5),
            chain: "Development".to_string(),
            version: "4.0.0-dev-2b4ad5c".to_string(),
            is_syncing: false,
            peers: Vec::new(),
            nonces: HashMap::new(),
            runtime: json!({
                "specName": "node-template",
                "implName": "node-template",
                "authoringVersion": 1,
                "specVersion": 100,
                "implVersion": 1,
                "apis": [],
                "transactionVersion": 1,
                "stateVersion": 1
            }),
            properties: json!({
                "ss58Format": 42,
                "tokenDecimals": 12,
                "tokenSymbol": "UNIT"
            }),
            replies: HashMap::new(),
            failures: HashMap::new(),
            unreachable: false,
            requests: Vec::new(),
        }
    }

    /// Answer from the simulated chain state
    fn default_reply(&self, request: &RpcRequest) -> MockReply {
        let result = match request.method.as_str() {
            names::SYSTEM_HEALTH => json!({
                "peers": self.peers.len(),
                "isSyncing": self.is_syncing,
                "shouldHavePeers": !self.peers.is_empty()
            }),
            names::SYSTEM_CHAIN => json!(self.chain),
            names::SYSTEM_VERSION => json!(self.version),
            names::CHAIN_GET_HEADER => json!({
                "number": encode_height(self.height),
                "parentHash": format!("0x{:064x}", self.height.saturating_sub(1)),
                "stateRoot": format!("0x{:064x}", 0),
                "extrinsicsRoot": format!("0x{:064x}", 0),
                "digest": {"logs": []}
            }),
            names::SYSTEM_ACCOUNT_NEXT_INDEX => {
                let Some(account) = request.params.first().and_then(Value::as_str) else {
                    return MockReply::Error(RpcErrorPayload::invalid_params(
                        "expected an account address",
                    ));
                };
                json!(self.nonces.get(account).copied().unwrap_or(0))
            }
            names::STATE_GET_RUNTIME_VERSION => self.runtime.clone(),
            names::SYSTEM_PROPERTIES => self.properties.clone(),
            names::SYSTEM_PEERS => Value::Array(self.peers.clone()),
            other => return MockReply::Error(RpcErrorPayload::method_not_found(other)),
        };
        MockReply::Result(result)
    }
}

/// Configurable mock node for testing
pub struct MockNode {
    state: Mutex<NodeState>,
}

impl MockNode {
    /// A healthy single-node dev chain at height 100 producing 5 blocks per pause
    pub fn dev() -> Self {
        Self {
            state: Mutex::new(NodeState::dev()),
        }
    }

    // === Public API for test configuration ===

    /// Script a fixed reply for `method`
    pub fn set_reply(&self, method: &str, reply: MockReply) {
        self.state.lock().unwrap().replies.insert(method.to_string(), reply);
    }

    /// Inject a failure for `method`
    pub fn inject_failure(&self, method: &str, config: FailureConfig) {
        self.state.lock().unwrap().failures.insert(method.to_string(), config);
    }

    /// Clear all scripted replies and failures
    pub fn clear_overrides(&self) {
        let mut state = self.state.lock().unwrap();
        state.replies.clear();
        state.failures.clear();
    }

    /// Refuse every connection
    pub fn set_unreachable(&self, unreachable: bool) {
        self.state.lock().unwrap().unreachable = unreachable;
    }

    /// Set the best block height
    pub fn set_height(&self, height: u64) {
        self.state.lock().unwrap().height = height;
    }

    /// Current best block height
    pub fn height(&self) -> u64 {
        self.state.lock().unwrap().height
    }

    /// Set how the height moves on each pause
    pub fn set_height_change(&self, change: HeightChange) {
        self.state.lock().unwrap().on_pause = change;
    }

    /// Set the chain name
    pub fn set_chain(&self, chain: &str) {
        self.state.lock().unwrap().chain = chain.to_string();
    }

    /// Set the runtime spec name and version
    pub fn set_runtime(&self, spec_name: &str, spec_version: u32) {
        let mut state = self.state.lock().unwrap();
        state.runtime["specName"] = json!(spec_name);
        state.runtime["specVersion"] = json!(spec_version);
    }

    /// Set the raw `system_properties` payload
    pub fn set_properties(&self, properties: Value) {
        self.state.lock().unwrap().properties = properties;
    }

    /// Mark the node as major-syncing
    pub fn set_syncing(&self, syncing: bool) {
        self.state.lock().unwrap().is_syncing = syncing;
    }

    /// Connect `count` synthetic peers
    pub fn set_peer_count(&self, count: usize) {
        let height = self.height();
        let peers = (0..count)
            .map(|i| {
                json!({
                    "peerId": format!("12D3KooWPeer{:04}", i),
                    "roles": "FULL",
                    "bestHash": format!("0x{:064x}", height),
                    "bestNumber": height
                })
            })
            .collect();
        self.state.lock().unwrap().peers = peers;
    }

    /// Set the next index of `account`
    pub fn set_nonce(&self, account: &str, nonce: u64) {
        self.state
            .lock()
            .unwrap()
            .nonces
            .insert(account.to_string(), nonce);
    }

    /// Apply the configured height change, as if time had passed
    pub fn on_pause(&self) {
        let mut state = self.state.lock().unwrap();
        state.height = match state.on_pause {
            HeightChange::Advance(n) => state.height.saturating_add(n),
            HeightChange::Rewind(n) => state.height.saturating_sub(n),
            HeightChange::Hold => state.height,
        };
    }

    /// Every request received so far, in arrival order
    pub fn requests(&self) -> Vec<RpcRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Number of requests for `method`
    pub fn request_count(&self, method: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|r| r.method == method)
            .count()
    }

    /// Handle one request
    pub fn handle_request(&self, request: &RpcRequest) -> Result<RpcResponse, TransportError> {
        let (reply, delay) = {
            let mut state = self.state.lock().unwrap();
            state.requests.push(request.clone());

            if state.unreachable {
                (MockReply::Refused, None)
            } else if let Some(failure) = state
                .failures
                .get_mut(&request.method)
                .filter(|f| f.fail_count != Some(0))
            {
                failure.take();
                (failure.reply.clone(), failure.delay)
            } else if let Some(reply) = state.replies.get(&request.method) {
                (reply.clone(), None)
            } else {
                (state.default_reply(request), None)
            }
        };

        // Sleep outside the lock so concurrent probes are not serialized.
        if let Some(delay) = delay {
            thread::sleep(delay);
        }
        reply.respond(request)
    }
}

impl Default for MockNode {
    fn default() -> Self {
        Self::dev()
    }
}

/// In-process transport backed by a `MockNode`
pub struct MockTransport {
    node: Arc<MockNode>,
    endpoint: Endpoint,
}

impl MockTransport {
    /// Transport to `node` at the default endpoint
    pub fn new(node: Arc<MockNode>) -> Self {
        let endpoint = Endpoint::parse(DEFAULT_ENDPOINT).expect("default endpoint parses");
        Self { node, endpoint }
    }

    /// Report a different endpoint
    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: &RpcRequest) -> Result<RpcResponse, TransportError> {
        self.node.handle_request(request)
    }

    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}
