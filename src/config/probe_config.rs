//! Typed probe configuration
//!
//! The merged configuration value deserializes into `ProbeConfig`, which is
//! validated once and then passed by reference into the orchestrator.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::endpoint::{Endpoint, EndpointError};
use crate::timeout::{TimeoutConfig, TimeoutValidationError};

use super::defaults::BuiltinDefaults;

/// Block production monitor parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockProductionConfig {
    /// Seconds between the two header samples
    pub wait_seconds: u64,

    /// Minimum height increase for the node to count as producing
    pub min_delta: u64,
}

impl BlockProductionConfig {
    /// Wait interval as a `Duration`
    pub fn wait_interval(&self) -> Duration {
        Duration::from_secs(self.wait_seconds)
    }
}

/// Optional identity the node is expected to report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpectedIdentity {
    /// Expected `system_chain` value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,

    /// Expected runtime `specName`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_name: Option<String>,
}

/// Complete configuration for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeConfig {
    /// Node RPC endpoint URL
    pub endpoint: String,

    /// Per-call transport timeout in seconds
    pub call_timeout_seconds: u64,

    /// Overall run budget in seconds
    pub overall_seconds: u64,

    /// Block production monitor parameters
    pub block_production: BlockProductionConfig,

    /// Account queried by the nonce probe
    pub reference_account: String,

    /// Zero peers is acceptable
    pub dev_mode: bool,

    /// Run probes after the connectivity check concurrently
    pub concurrent: bool,

    /// Optional identity checks
    #[serde(default)]
    pub expected: ExpectedIdentity,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        let defaults = BuiltinDefaults::default();
        Self {
            endpoint: defaults.endpoint,
            call_timeout_seconds: defaults.call_timeout_seconds,
            overall_seconds: defaults.overall_seconds,
            block_production: BlockProductionConfig {
                wait_seconds: defaults.wait_seconds,
                min_delta: defaults.min_delta,
            },
            reference_account: defaults.reference_account,
            dev_mode: defaults.dev_mode,
            concurrent: defaults.concurrent,
            expected: ExpectedIdentity::default(),
        }
    }
}

impl ProbeConfig {
    /// Timeout settings
    pub fn timeouts(&self) -> TimeoutConfig {
        TimeoutConfig {
            overall_seconds: self.overall_seconds,
            call_timeout_seconds: self.call_timeout_seconds,
        }
    }

    /// Parsed endpoint
    pub fn endpoint(&self) -> Result<Endpoint, EndpointError> {
        Endpoint::parse(&self.endpoint)
    }

    /// Validate every field
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.timeouts().validate()?;
        self.endpoint()?;

        let wait = self.block_production.wait_seconds;
        if wait == 0 || wait >= self.overall_seconds {
            return Err(ValidationError::WaitOutOfBounds {
                value: wait,
                overall: self.overall_seconds,
            });
        }

        if self.block_production.min_delta == 0 {
            return Err(ValidationError::MinDeltaZero);
        }

        if self.reference_account.trim().is_empty() {
            return Err(ValidationError::EmptyAccount);
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error(transparent)]
    Timeout(#[from] TimeoutValidationError),

    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    #[error("block_production.wait_seconds must be in (0, overall_seconds={overall}), got {value}")]
    WaitOutOfBounds { value: u64, overall: u64 },

    #[error("block_production.min_delta must be at least 1")]
    MinDeltaZero,

    #[error("reference_account must not be empty")]
    EmptyAccount,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_is_valid() {
        let config = ProbeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.block_production.wait_interval(), Duration::from_secs(7));
    }

    #[test]
    fn test_deserialize_from_defaults_value() {
        let config: ProbeConfig =
            serde_json::from_value(BuiltinDefaults::default().to_value()).unwrap();
        assert_eq!(config, ProbeConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut value = BuiltinDefaults::default().to_value();
        value["wait"] = json!(7);
        assert!(serde_json::from_value::<ProbeConfig>(value).is_err());
    }

    #[test]
    fn test_wait_must_fit_in_overall() {
        let mut config = ProbeConfig::default();
        config.block_production.wait_seconds = 60;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::WaitOutOfBounds { value: 60, overall: 60 })
        ));

        config.block_production.wait_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_min_delta_zero_rejected() {
        let mut config = ProbeConfig::default();
        config.block_production.min_delta = 0;
        assert!(matches!(config.validate(), Err(ValidationError::MinDeltaZero)));
    }

    #[test]
    fn test_bad_endpoint_rejected() {
        let config = ProbeConfig {
            endpoint: "gopher://node:70".to_string(),
            ..ProbeConfig::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::Endpoint(_))));
    }

    #[test]
    fn test_empty_account_rejected() {
        let config = ProbeConfig {
            reference_account: "  ".to_string(),
            ..ProbeConfig::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::EmptyAccount)));
    }
}
