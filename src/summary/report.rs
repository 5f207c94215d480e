//! Probe report: overall status, exit code and the human/JSON renderings

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ConfigSource;
use crate::endpoint::Endpoint;
use crate::pipeline::{ProbeRun, Reachability};
use crate::probe::ProbeResult;

use super::failure::ExitCode;

/// Schema version for JSON reports
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Schema identifier for JSON reports
pub const REPORT_SCHEMA_ID: &str = "devnet-probe/report@1";

const RULE_WIDTH: usize = 50;

/// Overall run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Pass,
    Fail,
}

/// Report for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeReport {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished
    pub finished_at: DateTime<Utc>,

    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,

    /// Endpoint under test (credentials redacted)
    pub endpoint: String,

    /// WebSocket form of the endpoint
    pub ws_url: String,

    /// Polkadot.js apps link for the endpoint
    pub polkadot_js: String,

    /// `pass` only if every probe passed
    pub status: OverallStatus,

    /// Process exit code
    pub exit_code: i32,

    /// Connectivity outcome
    pub reachability: Reachability,

    /// An operator interrupt arrived during the run
    pub interrupted: bool,

    /// Number of passing probes
    pub passed: usize,

    /// Highest block height any probe observed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_height: Option<u64>,

    /// Per-probe results in declaration order
    pub results: Vec<ProbeResult>,

    /// Configuration sources that shaped the run
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub config_sources: Vec<ConfigSource>,
}

impl ProbeReport {
    /// Build the report for a finished run
    pub fn from_run(
        run: ProbeRun,
        endpoint: &Endpoint,
        started_at: DateTime<Utc>,
        duration: Duration,
    ) -> Self {
        let exit_code = exit_code_for(&run);
        let passed = run.results.iter().filter(|r| r.is_pass()).count();
        let status = if !run.results.is_empty() && passed == run.results.len() {
            OverallStatus::Pass
        } else {
            OverallStatus::Fail
        };
        let best_height = run.results.iter().filter_map(ProbeResult::height).max();

        Self {
            schema_version: REPORT_SCHEMA_VERSION,
            schema_id: REPORT_SCHEMA_ID.to_string(),
            started_at,
            finished_at: Utc::now(),
            duration_ms: duration.as_millis() as u64,
            endpoint: endpoint.to_string(),
            ws_url: endpoint.ws_url(),
            polkadot_js: endpoint.polkadot_js_link(),
            status,
            exit_code: exit_code.as_i32(),
            reachability: run.reachability,
            interrupted: run.interrupted,
            passed,
            best_height,
            results: run.results,
            config_sources: Vec::new(),
        }
    }

    /// Attach configuration provenance
    pub fn with_sources(mut self, sources: Vec<ConfigSource>) -> Self {
        self.config_sources = sources;
        self
    }

    /// Process exit code
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from_i32(self.exit_code).unwrap_or(ExitCode::ProbeFailed)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Exit code for a run: unreachable beats interrupted beats probe failures
pub fn exit_code_for(run: &ProbeRun) -> ExitCode {
    if run.reachability == Reachability::Unreachable {
        ExitCode::Unreachable
    } else if run.interrupted {
        ExitCode::Cancelled
    } else if !run.results.is_empty() && run.results.iter().all(ProbeResult::is_pass) {
        ExitCode::Success
    } else {
        ExitCode::ProbeFailed
    }
}

impl fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(f, "{}", rule)?;
        writeln!(f, "Devnet probe: {}", self.endpoint)?;
        writeln!(f, "{}", rule)?;
        writeln!(f)?;

        for result in &self.results {
            writeln!(f, "{} {}: {}", result.status.glyph(), result.name, result.detail)?;
        }

        writeln!(f)?;
        writeln!(f, "{}", rule)?;
        match self.status {
            OverallStatus::Pass => writeln!(
                f,
                "✅ PASS: {}/{} probes passed",
                self.passed,
                self.results.len()
            )?,
            OverallStatus::Fail => writeln!(
                f,
                "❌ FAIL: {}/{} probes passed",
                self.passed,
                self.results.len()
            )?,
        }
        if self.reachability == Reachability::Unreachable {
            writeln!(f, "   Endpoint unreachable")?;
        }
        if self.interrupted {
            writeln!(f, "   Interrupted by operator")?;
        }
        writeln!(f, "   RPC: {}", self.ws_url)?;
        writeln!(f, "   Polkadot.js: {}", self.polkadot_js)?;
        if let Some(height) = self.best_height {
            writeln!(f, "   Blocks: #{}", height)?;
        }
        writeln!(f, "{}", rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbeError;
    use serde_json::json;

    fn endpoint() -> Endpoint {
        Endpoint::parse("http://localhost:9944").unwrap()
    }

    fn report(results: Vec<ProbeResult>, reachability: Reachability, interrupted: bool) -> ProbeReport {
        let run = ProbeRun {
            results,
            reachability,
            interrupted,
        };
        ProbeReport::from_run(run, &endpoint(), Utc::now(), Duration::from_millis(7042))
    }

    fn passing() -> Vec<ProbeResult> {
        vec![
            ProbeResult::pass("health", "node healthy: 0 peers, not syncing, should have peers: no", None),
            ProbeResult::pass("latest block", "#100", Some(json!({"height": 100}))),
            ProbeResult::pass(
                "block production",
                "blocks producing: #100 → #105 (5 new blocks in 7s)",
                Some(json!({"height": 105})),
            ),
        ]
    }

    #[test]
    fn test_all_pass() {
        let report = report(passing(), Reachability::Reachable, false);

        assert_eq!(report.status, OverallStatus::Pass);
        assert_eq!(report.exit_code(), ExitCode::Success);
        assert_eq!(report.best_height, Some(105));
        assert_eq!(report.duration_ms, 7042);

        let text = report.to_string();
        assert!(text.contains("✅ latest block: #100\n"));
        assert!(text.contains("✅ PASS: 3/3 probes passed"));
        assert!(text.contains("   RPC: ws://localhost:9944"));
        assert!(text.contains("   Polkadot.js: https://polkadot.js.org/apps/?rpc=ws%3A%2F%2Flocalhost%3A9944"));
        assert!(text.contains("   Blocks: #105"));
    }

    #[test]
    fn test_one_failure_fails_run() {
        let mut results = passing();
        results[2] = ProbeResult::from_error(
            "block production",
            &ProbeError::Stuck("no new blocks in 7s (stuck at #100)".to_string()),
            None,
        );
        let report = report(results, Reachability::Reachable, false);

        assert_eq!(report.status, OverallStatus::Fail);
        assert_eq!(report.exit_code(), ExitCode::ProbeFailed);
        let text = report.to_string();
        assert!(text.contains("❌ block production: no new blocks in 7s (stuck at #100)"));
        assert!(text.contains("❌ FAIL: 2/3 probes passed"));
    }

    #[test]
    fn test_unreachable_exit_code() {
        let results = vec![
            ProbeResult::aborted("health", crate::summary::FailureKind::TransportError, "endpoint unreachable"),
            ProbeResult::skipped_unreachable(),
        ];
        let report = report(results, Reachability::Unreachable, false);

        assert_eq!(report.exit_code(), ExitCode::Unreachable);
        assert_eq!(report.best_height, None);
        let text = report.to_string();
        assert!(text.contains("⚠️ remaining probes: remaining probes skipped: endpoint unreachable"));
        assert!(!text.contains("Blocks:"));
    }

    #[test]
    fn test_interrupted_exit_code() {
        let report = report(passing(), Reachability::Reachable, true);
        assert_eq!(report.exit_code(), ExitCode::Cancelled);
        assert!(report.to_string().contains("Interrupted by operator"));
    }

    #[test]
    fn test_empty_run_is_not_a_pass() {
        let report = report(Vec::new(), Reachability::Reachable, false);
        assert_eq!(report.status, OverallStatus::Fail);
        assert_eq!(report.exit_code(), ExitCode::ProbeFailed);
    }

    #[test]
    fn test_json_shape() {
        let report = report(passing(), Reachability::Reachable, false);
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(value["schema_id"], REPORT_SCHEMA_ID);
        assert_eq!(value["status"], "pass");
        assert_eq!(value["exit_code"], 0);
        assert_eq!(value["reachability"], "reachable");
        assert_eq!(value["results"][1]["detail"], "#100");
        assert!(value.get("config_sources").is_none());
    }
}
