//! Built-in defaults (layer 1)

use serde::{Deserialize, Serialize};

use crate::host::DEFAULT_CALL_TIMEOUT;

/// Alice's dev account, funded on every Substrate dev chain.
pub const DEV_REFERENCE_ACCOUNT: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Node RPC endpoint (default: "http://localhost:9944")
    pub endpoint: String,

    /// Per-call timeout in seconds (default: 5)
    pub call_timeout_seconds: u64,

    /// Overall run budget in seconds (default: 60)
    pub overall_seconds: u64,

    /// Block production wait in seconds (default: 7, one 6s slot plus margin)
    pub wait_seconds: u64,

    /// Minimum new blocks across the wait (default: 1)
    pub min_delta: u64,

    /// Account used for the nonce probe (default: Alice)
    pub reference_account: String,

    /// Zero peers is acceptable (default: true)
    pub dev_mode: bool,

    /// Run probes after the connectivity check concurrently (default: true)
    pub concurrent: bool,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            endpoint: probe_protocol::DEFAULT_ENDPOINT.to_string(),
            call_timeout_seconds: DEFAULT_CALL_TIMEOUT.as_secs(),
            overall_seconds: 60,
            wait_seconds: 7,
            min_delta: 1,
            reference_account: DEV_REFERENCE_ACCOUNT.to_string(),
            dev_mode: true,
            concurrent: true,
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "endpoint": self.endpoint,
            "call_timeout_seconds": self.call_timeout_seconds,
            "overall_seconds": self.overall_seconds,
            "block_production": {
                "wait_seconds": self.wait_seconds,
                "min_delta": self.min_delta
            },
            "reference_account": self.reference_account,
            "dev_mode": self.dev_mode,
            "concurrent": self.concurrent,
            "expected": {}
        })
    }
}
