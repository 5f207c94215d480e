//! Declarative single-shot probes
//!
//! Each `Check` names the calls it needs and how to read their replies.
//! Adding a probe means adding a descriptor to `standard_probes`; the
//! orchestrator does not change.

use probe_protocol::ops::{names, ChainHeader, Health, PeerInfo, Properties, RuntimeVersion};
use probe_protocol::ProtocolError;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::config::ProbeConfig;
use crate::host::CallError;

use super::block_production::BlockProductionMonitor;
use super::{Probe, ProbeContext, ProbeError, ProbeResult};

/// One request a check issues
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub params: Vec<Value>,
}

impl Call {
    /// Call without parameters
    pub fn new(method: &'static str) -> Self {
        Self {
            method,
            params: Vec::new(),
        }
    }

    /// Call with positional parameters
    pub fn with_params(method: &'static str, params: Vec<Value>) -> Self {
        Self { method, params }
    }
}

/// What a passing check reports
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub detail: String,
    pub raw: Option<Value>,
}

impl Finding {
    fn new(detail: impl Into<String>, raw: Value) -> Self {
        Self {
            detail: detail.into(),
            raw: Some(raw),
        }
    }
}

type RequestBuilder = fn(&ProbeConfig) -> Vec<Call>;
type Interpreter = fn(&ProbeConfig, Vec<Value>) -> Result<Finding, ProbeError>;

/// Probe descriptor: name, request builder, response interpreter
pub struct Check {
    name: &'static str,
    requests: RequestBuilder,
    interpret: Interpreter,
}

impl Check {
    pub fn new(name: &'static str, requests: RequestBuilder, interpret: Interpreter) -> Self {
        Self {
            name,
            requests,
            interpret,
        }
    }

    /// Issue the calls in order, then interpret all replies together
    fn execute(&self, ctx: &ProbeContext<'_>) -> Result<Finding, ProbeError> {
        let mut replies = Vec::new();
        for call in (self.requests)(ctx.config) {
            replies.push(ctx.client.request_value(call.method, call.params)?);
        }
        (self.interpret)(ctx.config, replies)
    }
}

impl Probe for Check {
    fn name(&self) -> &str {
        self.name
    }

    fn run(&self, ctx: &ProbeContext<'_>) -> ProbeResult {
        match self.execute(ctx) {
            Ok(finding) => ProbeResult::pass(self.name, finding.detail, finding.raw),
            Err(err) => {
                tracing::debug!(probe = self.name, error = %err, "check failed");
                ProbeResult::from_error(self.name, &err, None)
            }
        }
    }
}

/// The declared probe sequence, in report order
pub fn standard_probes() -> Vec<Box<dyn Probe>> {
    vec![
        Box::new(Check::new("health", |_| vec![Call::new(names::SYSTEM_HEALTH)], interpret_health)),
        Box::new(Check::new(
            "chain",
            |_| vec![Call::new(names::SYSTEM_CHAIN), Call::new(names::SYSTEM_VERSION)],
            interpret_chain,
        )),
        Box::new(Check::new(
            "latest block",
            |_| vec![Call::new(names::CHAIN_GET_HEADER)],
            interpret_header,
        )),
        Box::new(Check::new(
            "account nonce",
            |config| {
                vec![Call::with_params(
                    names::SYSTEM_ACCOUNT_NEXT_INDEX,
                    vec![json!(config.reference_account)],
                )]
            },
            interpret_nonce,
        )),
        Box::new(Check::new(
            "runtime",
            |_| vec![Call::new(names::STATE_GET_RUNTIME_VERSION)],
            interpret_runtime,
        )),
        Box::new(Check::new(
            "properties",
            |_| vec![Call::new(names::SYSTEM_PROPERTIES)],
            interpret_properties,
        )),
        Box::new(BlockProductionMonitor::new()),
        Box::new(Check::new("peers", |_| vec![Call::new(names::SYSTEM_PEERS)], interpret_peers)),
    ]
}

// === Interpreters ===

fn decode<T: DeserializeOwned>(reply: Option<Value>) -> Result<T, ProbeError> {
    let value = reply.ok_or(CallError::Decode(ProtocolError::MissingField("result")))?;
    serde_json::from_value(value).map_err(|e| CallError::Decode(ProtocolError::Json(e)).into())
}

fn interpret_health(_: &ProbeConfig, replies: Vec<Value>) -> Result<Finding, ProbeError> {
    let raw = replies.into_iter().next();
    let health: Health = decode(raw.clone())?;
    let sync = if health.is_syncing { "syncing" } else { "not syncing" };
    let expects_peers = if health.should_have_peers { "yes" } else { "no" };

    Ok(Finding {
        detail: format!(
            "node healthy: {} peers, {}, should have peers: {}",
            health.peers, sync, expects_peers
        ),
        raw,
    })
}

fn interpret_chain(config: &ProbeConfig, replies: Vec<Value>) -> Result<Finding, ProbeError> {
    let mut replies = replies.into_iter();
    let chain: String = decode(replies.next())?;
    let version: String = decode(replies.next())?;

    if let Some(expected) = &config.expected.chain {
        if *expected != chain {
            return Err(ProbeError::Mismatch {
                what: "chain",
                expected: expected.clone(),
                actual: chain,
            });
        }
    }

    Ok(Finding::new(
        format!("{} (version {})", chain, version),
        json!({"chain": chain, "version": version}),
    ))
}

fn interpret_header(_: &ProbeConfig, replies: Vec<Value>) -> Result<Finding, ProbeError> {
    let value = replies.into_iter().next().unwrap_or_default();
    let header = ChainHeader::from_value(&value).map_err(CallError::Decode)?;

    Ok(Finding::new(
        format!("#{}", header.number),
        json!({"height": header.number, "number": header.number_hex()}),
    ))
}

fn interpret_nonce(config: &ProbeConfig, replies: Vec<Value>) -> Result<Finding, ProbeError> {
    let nonce: u64 = decode(replies.into_iter().next())?;
    let account = &config.reference_account;

    Ok(Finding::new(
        format!("{}: next index {}", short_address(account), nonce),
        json!({"account": account, "nonce": nonce}),
    ))
}

fn interpret_runtime(config: &ProbeConfig, replies: Vec<Value>) -> Result<Finding, ProbeError> {
    let raw = replies.into_iter().next();
    let runtime: RuntimeVersion = decode(raw.clone())?;

    if let Some(expected) = &config.expected.spec_name {
        if *expected != runtime.spec_name {
            return Err(ProbeError::Mismatch {
                what: "runtime spec name",
                expected: expected.clone(),
                actual: runtime.spec_name,
            });
        }
    }

    Ok(Finding {
        detail: format!("{} v{}", runtime.spec_name, runtime.spec_version),
        raw,
    })
}

fn interpret_properties(_: &ProbeConfig, replies: Vec<Value>) -> Result<Finding, ProbeError> {
    let raw = replies.into_iter().next();
    let properties: Properties = decode(raw.clone())?;

    let mut parts = Vec::new();
    if let Some(symbol) = properties.token_symbol() {
        parts.push(format!("token {}", symbol));
    }
    if let Some(decimals) = properties.token_decimals() {
        parts.push(format!("{} decimals", decimals));
    }
    if let Some(format) = properties.ss58_format() {
        parts.push(format!("ss58 format {}", format));
    }

    let detail = if parts.is_empty() {
        "no token properties reported".to_string()
    } else {
        parts.join(", ")
    };
    Ok(Finding { detail, raw })
}

fn interpret_peers(config: &ProbeConfig, replies: Vec<Value>) -> Result<Finding, ProbeError> {
    let peers: Vec<PeerInfo> = decode(replies.into_iter().next())?;
    let count = peers.len();

    let detail = match (count, config.dev_mode) {
        (0, true) => "0 (expected 0 in dev mode)".to_string(),
        (0, false) => return Err(ProbeError::NoPeers),
        (n, _) => format!("{} connected", n),
    };
    let ids: Vec<&str> = peers.iter().map(|p| p.peer_id.as_str()).collect();
    Ok(Finding::new(detail, json!({"count": count, "peers": ids})))
}

/// `5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY` -> `5Grwva…utQY`
fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 12 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}
