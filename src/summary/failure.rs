//! Failure taxonomy and stable exit codes

use serde::{Deserialize, Serialize};

/// Failure kind - categorizes why a probe did not pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Endpoint unreachable, refused, or timed out
    TransportError,
    /// Node answered with an application-level error
    RpcError,
    /// Reply shape or hex encoding did not match expectations
    DecodeError,
    /// Block height decreased between samples
    RegressionError,
    /// Not enough new blocks within the wait interval
    Stuck,
    /// Node answered, but not with the expected identity/state
    Mismatch,
    /// Overall run deadline cut the probe short
    Deadline,
    /// Operator interrupt cut the probe short
    Interrupted,
    /// Probe never ran because the endpoint was unreachable
    Skipped,
    /// Probe panicked; captured at the orchestrator boundary
    Panicked,
}

impl FailureKind {
    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            FailureKind::TransportError => "Endpoint unreachable",
            FailureKind::RpcError => "Node returned an error",
            FailureKind::DecodeError => "Unexpected reply",
            FailureKind::RegressionError => "Chain height regressed",
            FailureKind::Stuck => "Block production stalled",
            FailureKind::Mismatch => "Unexpected node state",
            FailureKind::Deadline => "Run deadline exceeded",
            FailureKind::Interrupted => "Interrupted",
            FailureKind::Skipped => "Skipped",
            FailureKind::Panicked => "Probe crashed",
        }
    }

    /// Soft failures are reported as `fail`; everything else is `error`.
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            FailureKind::RpcError | FailureKind::Stuck | FailureKind::Mismatch
        )
    }
}

/// Stable process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum ExitCode {
    /// Every probe passed
    Success = 0,
    /// Configuration could not be loaded or validated; nothing ran
    ConfigError = 2,
    /// Node reachable, at least one probe failed
    ProbeFailed = 10,
    /// Endpoint could not be reached at all
    Unreachable = 20,
    /// Run interrupted by the operator
    Cancelled = 80,
}

impl ExitCode {
    /// Get the integer value of the exit code
    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    /// Create from integer value
    pub fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(ExitCode::Success),
            2 => Some(ExitCode::ConfigError),
            10 => Some(ExitCode::ProbeFailed),
            20 => Some(ExitCode::Unreachable),
            80 => Some(ExitCode::Cancelled),
            _ => None,
        }
    }

    /// Check if this exit code indicates success
    pub fn is_success(&self) -> bool {
        matches!(self, ExitCode::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::ProbeFailed.as_i32(), 10);
        assert_eq!(ExitCode::Unreachable.as_i32(), 20);
        assert_eq!(ExitCode::Cancelled.as_i32(), 80);
    }

    #[test]
    fn test_exit_code_roundtrip() {
        for code in [
            ExitCode::Success,
            ExitCode::ConfigError,
            ExitCode::ProbeFailed,
            ExitCode::Unreachable,
            ExitCode::Cancelled,
        ] {
            assert_eq!(ExitCode::from_i32(code.as_i32()), Some(code));
        }
        assert_eq!(ExitCode::from_i32(1), None);
    }

    #[test]
    fn test_unreachable_distinct_from_probe_failure() {
        assert_ne!(ExitCode::Unreachable.as_i32(), ExitCode::ProbeFailed.as_i32());
        assert!(!ExitCode::Unreachable.is_success());
    }

    #[test]
    fn test_soft_kinds() {
        assert!(FailureKind::Stuck.is_soft());
        assert!(FailureKind::RpcError.is_soft());
        assert!(!FailureKind::RegressionError.is_soft());
        assert!(!FailureKind::TransportError.is_soft());
        assert!(!FailureKind::DecodeError.is_soft());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&FailureKind::RegressionError).unwrap();
        assert_eq!(json, "\"regression_error\"");
    }
}
