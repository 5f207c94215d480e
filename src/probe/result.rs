//! Probe results and the errors captured at the probe boundary

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::host::{CallError, TransportError};
use crate::summary::FailureKind;

/// Outcome class of one probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    Pass,
    Fail,
    Error,
}

impl ProbeStatus {
    /// Glyph printed in front of the probe line
    pub fn glyph(&self) -> &'static str {
        match self {
            ProbeStatus::Pass => "✅",
            ProbeStatus::Fail => "❌",
            ProbeStatus::Error => "⚠️",
        }
    }
}

/// Everything that can go wrong inside a probe
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("{}", call_detail(.0))]
    Call(#[from] CallError),

    #[error("chain height regressed: #{first} → #{second}")]
    Regression { first: u64, second: u64 },

    #[error("{0}")]
    Stuck(String),

    #[error("{what} mismatch: expected {expected:?}, got {actual:?}")]
    Mismatch {
        what: &'static str,
        expected: String,
        actual: String,
    },

    #[error("no peers connected (dev mode disabled)")]
    NoPeers,

    #[error("timed out waiting for {0}")]
    DeadlineExceeded(&'static str),

    #[error("interrupted waiting for {0}")]
    Interrupted(&'static str),

    #[error("probe panicked: {0}")]
    Panicked(String),
}

fn call_detail(err: &CallError) -> String {
    match err {
        CallError::Transport(inner) => unreachable_detail(inner),
        CallError::Rpc(payload) => format!("rpc error: {}", payload),
        CallError::Decode(inner) => format!("decode error: {}", inner),
    }
}

fn unreachable_detail(err: &TransportError) -> String {
    format!("endpoint unreachable: {}", err)
}

impl ProbeError {
    /// Map to the failure taxonomy
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            ProbeError::Call(err) => err.failure_kind(),
            ProbeError::Regression { .. } => FailureKind::RegressionError,
            ProbeError::Stuck(_) => FailureKind::Stuck,
            ProbeError::Mismatch { .. } | ProbeError::NoPeers => FailureKind::Mismatch,
            ProbeError::DeadlineExceeded(_) => FailureKind::Deadline,
            ProbeError::Interrupted(_) => FailureKind::Interrupted,
            ProbeError::Panicked(_) => FailureKind::Panicked,
        }
    }

    /// Status this error produces
    pub fn status(&self) -> ProbeStatus {
        if self.failure_kind().is_soft() {
            ProbeStatus::Fail
        } else {
            ProbeStatus::Error
        }
    }
}

/// Result of one probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// Probe name
    pub name: String,
    /// Outcome
    pub status: ProbeStatus,
    /// Human-readable detail
    pub detail: String,
    /// Raw reply data backing the detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
    /// Failure classification (None on pass)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FailureKind>,
}

impl ProbeResult {
    /// Passing result
    pub fn pass(name: impl Into<String>, detail: impl Into<String>, raw: Option<Value>) -> Self {
        Self {
            name: name.into(),
            status: ProbeStatus::Pass,
            detail: detail.into(),
            raw,
            kind: None,
        }
    }

    /// Result for a captured error
    pub fn from_error(name: impl Into<String>, err: &ProbeError, raw: Option<Value>) -> Self {
        Self {
            name: name.into(),
            status: err.status(),
            detail: err.to_string(),
            raw,
            kind: Some(err.failure_kind()),
        }
    }

    /// Probe that never started
    pub fn aborted(name: impl Into<String>, kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ProbeStatus::Error,
            detail: detail.into(),
            raw: None,
            kind: Some(kind),
        }
    }

    /// Synthetic result standing in for every probe after an unreachable endpoint
    pub fn skipped_unreachable() -> Self {
        Self {
            name: "remaining probes".to_string(),
            status: ProbeStatus::Error,
            detail: "remaining probes skipped: endpoint unreachable".to_string(),
            raw: None,
            kind: Some(FailureKind::Skipped),
        }
    }

    /// True when the probe passed
    pub fn is_pass(&self) -> bool {
        self.status == ProbeStatus::Pass
    }

    /// Block height reported in `raw`, if any
    pub fn height(&self) -> Option<u64> {
        self.raw.as_ref()?.get("height")?.as_u64()
    }
}
