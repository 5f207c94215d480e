//! End-to-end probe runs against the in-process mock node
//!
//! Covers the operator-facing scenarios:
//! - Healthy dev node (every probe passes, exit 0)
//! - Block production progressing, stalled, or regressing
//! - Unreachable endpoint short-circuit (exit 20)
//! - Per-probe failure isolation, ordering and panic capture
//! - Deadline and operator interrupt

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use devnet_probe::mock::{FailureConfig, HeightChange, MockNode, MockPause, MockReply, MockTransport};
use devnet_probe::probe::{standard_probes, Probe, ProbeContext};
use devnet_probe::{
    Endpoint, ExitCode, FailureKind, Orchestrator, ProbeConfig, ProbeReport, ProbeResult,
    ProbeStatus, Reachability, RpcClient, RunDeadline,
};
use probe_protocol::ops::names;
use probe_protocol::RpcErrorPayload;
use serde_json::json;

fn client(node: &Arc<MockNode>) -> RpcClient {
    RpcClient::new(Arc::new(MockTransport::new(Arc::clone(node))))
}

fn sequential() -> ProbeConfig {
    ProbeConfig {
        concurrent: false,
        ..ProbeConfig::default()
    }
}

/// Run the standard probes and build the report
fn probe(node: &Arc<MockNode>, config: ProbeConfig) -> ProbeReport {
    let pause = MockPause::for_node(Arc::clone(node));
    probe_with(node, config, &pause, Duration::from_secs(60))
}

fn probe_with(node: &Arc<MockNode>, config: ProbeConfig, pause: &MockPause, budget: Duration) -> ProbeReport {
    let orchestrator = Orchestrator::new(client(node), config);
    let deadline = RunDeadline::start(budget);
    let run = orchestrator.run(&deadline, pause);
    ProbeReport::from_run(run, orchestrator.endpoint(), Utc::now(), deadline.elapsed())
}

fn result<'a>(report: &'a ProbeReport, name: &str) -> &'a ProbeResult {
    report
        .results
        .iter()
        .find(|r| r.name == name)
        .unwrap_or_else(|| panic!("no result for {name}: {:?}", report.results))
}

// =============================================================================
// Healthy node
// =============================================================================

mod healthy_tests {
    use super::*;

    #[test]
    fn test_scenario_a_latest_block_reports_height() {
        let node = Arc::new(MockNode::dev());
        let report = probe(&node, sequential());

        assert!(result(&report, "health").is_pass());
        assert_eq!(result(&report, "chain").detail, "Development (version 4.0.0-dev-2b4ad5c)");
        assert_eq!(result(&report, "latest block").detail, "#100");
    }

    #[test]
    fn test_all_probes_pass_exit_zero() {
        let node = Arc::new(MockNode::dev());
        let report = probe(&node, ProbeConfig::default());

        assert_eq!(report.results.len(), 8);
        assert!(report.results.iter().all(ProbeResult::is_pass), "{:#?}", report.results);
        assert_eq!(report.exit_code(), ExitCode::Success);
        assert_eq!(report.best_height, Some(105));

        let text = report.to_string();
        assert!(text.contains("✅ PASS: 8/8 probes passed"));
        assert!(text.contains("✅ peers: 0 (expected 0 in dev mode)"));
    }

    #[test]
    fn test_every_method_called_once_except_header() {
        let node = Arc::new(MockNode::dev());
        probe(&node, sequential());

        for method in [
            names::SYSTEM_HEALTH,
            names::SYSTEM_CHAIN,
            names::SYSTEM_VERSION,
            names::SYSTEM_ACCOUNT_NEXT_INDEX,
            names::STATE_GET_RUNTIME_VERSION,
            names::SYSTEM_PROPERTIES,
            names::SYSTEM_PEERS,
        ] {
            assert_eq!(node.request_count(method), 1, "{method}");
        }
        // latest block + two samples from the monitor
        assert_eq!(node.request_count(names::CHAIN_GET_HEADER), 3);
    }

    #[test]
    fn test_report_names_the_endpoint_under_test() {
        let node = Arc::new(MockNode::dev());
        let endpoint = Endpoint::parse("ws://10.0.0.5:9944").unwrap();
        let transport = MockTransport::new(Arc::clone(&node)).with_endpoint(endpoint);
        let orchestrator = Orchestrator::new(RpcClient::new(Arc::new(transport)), sequential());

        let pause = MockPause::for_node(Arc::clone(&node));
        let deadline = RunDeadline::start(Duration::from_secs(60));
        let run = orchestrator.run(&deadline, &pause);
        let report = ProbeReport::from_run(run, orchestrator.endpoint(), Utc::now(), deadline.elapsed());

        assert_eq!(report.endpoint, "http://10.0.0.5:9944");
        assert_eq!(report.ws_url, "ws://10.0.0.5:9944");
        let text = report.to_string();
        assert!(text.contains("Devnet probe: http://10.0.0.5:9944"));
        assert!(text.contains("   RPC: ws://10.0.0.5:9944"));
    }

    #[test]
    fn test_request_ids_unique_within_run() {
        let node = Arc::new(MockNode::dev());
        probe(&node, ProbeConfig::default());

        let mut ids: Vec<u64> = node.requests().iter().map(|r| r.id).collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }
}

// =============================================================================
// Block production
// =============================================================================

mod block_production_tests {
    use super::*;

    #[test]
    fn test_scenario_b_blocks_producing() {
        let node = Arc::new(MockNode::dev());
        let pause = MockPause::for_node(Arc::clone(&node));
        let report = probe_with(&node, sequential(), &pause, Duration::from_secs(60));

        let monitor = result(&report, "block production");
        assert_eq!(monitor.status, ProbeStatus::Pass);
        assert!(monitor.detail.contains("#100 → #105 (5 new blocks in 7s)"));
        assert_eq!(pause.requested(), vec![Duration::from_secs(7)]);
        assert!(report.to_string().contains("   Blocks: #105"));
    }

    #[test]
    fn test_progression_from_arbitrary_height() {
        let node = Arc::new(MockNode::dev());
        node.set_height(1_000);
        let report = probe(&node, sequential());

        assert_eq!(result(&report, "latest block").detail, "#1000");
        assert!(result(&report, "block production")
            .detail
            .contains("#1000 → #1005 (5 new blocks in 7s)"));
        assert_eq!(node.height(), 1_005);
    }

    #[test]
    fn test_scenario_c_stuck_node() {
        let node = Arc::new(MockNode::dev());
        node.set_height_change(HeightChange::Hold);
        let report = probe(&node, sequential());

        let monitor = result(&report, "block production");
        assert_eq!(monitor.status, ProbeStatus::Fail);
        assert_eq!(monitor.detail, "no new blocks in 7s (stuck at #100)");
        assert_eq!(report.exit_code(), ExitCode::ProbeFailed);
        assert_ne!(report.exit_code().as_i32(), 0);
    }

    #[test]
    fn test_regression_is_error_never_suppressed() {
        let node = Arc::new(MockNode::dev());
        node.set_height_change(HeightChange::Rewind(5));
        let report = probe(&node, sequential());

        let monitor = result(&report, "block production");
        assert_eq!(monitor.status, ProbeStatus::Error);
        assert_eq!(monitor.kind, Some(FailureKind::RegressionError));
        assert_eq!(report.exit_code(), ExitCode::ProbeFailed);
    }

    #[test]
    fn test_min_delta_from_config() {
        let node = Arc::new(MockNode::dev());
        node.set_height_change(HeightChange::Advance(1));
        let mut config = sequential();
        config.block_production.min_delta = 2;

        let report = probe(&node, config);
        assert_eq!(result(&report, "block production").status, ProbeStatus::Fail);
    }
}

// =============================================================================
// Connectivity short-circuit
// =============================================================================

mod unreachable_tests {
    use super::*;

    #[test]
    fn test_scenario_d_connection_refused() {
        let node = Arc::new(MockNode::dev());
        node.set_unreachable(true);
        let report = probe(&node, ProbeConfig::default());

        assert_eq!(report.reachability, Reachability::Unreachable);
        assert_eq!(report.results.len(), 2);

        let health = &report.results[0];
        assert_eq!(health.name, "health");
        assert_eq!(health.status, ProbeStatus::Error);
        assert!(health.detail.starts_with("endpoint unreachable"));

        let skipped = &report.results[1];
        assert_eq!(skipped.status, ProbeStatus::Error);
        assert_eq!(skipped.detail, "remaining probes skipped: endpoint unreachable");

        assert_eq!(report.exit_code(), ExitCode::Unreachable);
        assert_eq!(report.exit_code().as_i32(), 20);
        assert_eq!(node.requests().len(), 1);
    }

    #[test]
    fn test_connectivity_timeout_also_short_circuits() {
        let node = Arc::new(MockNode::dev());
        node.set_reply(names::SYSTEM_HEALTH, MockReply::Timeout(Duration::from_secs(5)));
        let report = probe(&node, ProbeConfig::default());

        assert_eq!(report.exit_code(), ExitCode::Unreachable);
        assert!(report.results[0].detail.contains("timed out after 5000ms"));
    }

    #[test]
    fn test_rpc_error_on_health_does_not_short_circuit() {
        let node = Arc::new(MockNode::dev());
        node.set_reply(
            names::SYSTEM_HEALTH,
            MockReply::Error(RpcErrorPayload::method_not_found(names::SYSTEM_HEALTH)),
        );
        let report = probe(&node, ProbeConfig::default());

        assert_eq!(report.reachability, Reachability::Reachable);
        assert_eq!(report.results.len(), 8);
        assert_eq!(report.results[0].status, ProbeStatus::Fail);
        assert_eq!(report.exit_code(), ExitCode::ProbeFailed);
    }

    #[test]
    fn test_recovers_once_node_answers_again() {
        let node = Arc::new(MockNode::dev());
        node.set_reply(names::SYSTEM_HEALTH, MockReply::Refused);
        assert_eq!(probe(&node, ProbeConfig::default()).exit_code(), ExitCode::Unreachable);

        node.clear_overrides();
        assert_eq!(probe(&node, ProbeConfig::default()).exit_code(), ExitCode::Success);
    }

    #[test]
    fn test_later_transport_failure_is_isolated() {
        let node = Arc::new(MockNode::dev());
        node.set_reply(names::SYSTEM_PROPERTIES, MockReply::Refused);
        let report = probe(&node, ProbeConfig::default());

        assert_eq!(report.reachability, Reachability::Reachable);
        assert_eq!(result(&report, "properties").status, ProbeStatus::Error);
        assert!(result(&report, "peers").is_pass());
        assert_eq!(report.exit_code(), ExitCode::ProbeFailed);
    }
}

// =============================================================================
// Failure isolation and ordering
// =============================================================================

mod isolation_tests {
    use super::*;

    #[test]
    fn test_decode_error_reported_for_that_probe_only() {
        let node = Arc::new(MockNode::dev());
        node.set_reply(names::SYSTEM_CHAIN, MockReply::WrongId);
        let report = probe(&node, ProbeConfig::default());

        let chain = result(&report, "chain");
        assert_eq!(chain.status, ProbeStatus::Error);
        assert_eq!(chain.kind, Some(FailureKind::DecodeError));
        assert_eq!(report.results.iter().filter(|r| r.is_pass()).count(), 7);
    }

    #[test]
    fn test_results_in_declaration_order_despite_latency() {
        let node = Arc::new(MockNode::dev());
        // Make the second probe the slowest to finish.
        node.inject_failure(
            names::SYSTEM_VERSION,
            FailureConfig::reply(MockReply::Result(json!("4.0.0-dev")))
                .with_delay(Duration::from_millis(200)),
        );
        let report = probe(&node, ProbeConfig::default());

        let names: Vec<&str> = report.results.iter().map(|r| r.name.as_str()).collect();
        let declared: Vec<String> = standard_probes().iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names, declared);
        assert_eq!(result(&report, "chain").detail, "Development (version 4.0.0-dev)");
    }

    #[test]
    fn test_non_dev_mode_requires_peers() {
        let node = Arc::new(MockNode::dev());
        let config = ProbeConfig {
            dev_mode: false,
            ..ProbeConfig::default()
        };

        let report = probe(&node, config.clone());
        assert_eq!(result(&report, "peers").status, ProbeStatus::Fail);

        node.set_peer_count(3);
        let report = probe(&node, config);
        assert_eq!(result(&report, "peers").detail, "3 connected");
    }

    #[test]
    fn test_expected_identity_mismatch() {
        let node = Arc::new(MockNode::dev());
        let mut config = ProbeConfig::default();
        config.expected.spec_name = Some("clawchain".to_string());

        let report = probe(&node, config);
        let runtime = result(&report, "runtime");
        assert_eq!(runtime.status, ProbeStatus::Fail);
        assert_eq!(runtime.kind, Some(FailureKind::Mismatch));
    }

    #[test]
    fn test_expected_chain_mismatch() {
        let node = Arc::new(MockNode::dev());
        node.set_chain("Local Testnet");
        let mut config = ProbeConfig::default();
        config.expected.chain = Some("Development".to_string());

        let report = probe(&node, config);
        let chain = result(&report, "chain");
        assert_eq!(chain.status, ProbeStatus::Fail);
        assert_eq!(
            chain.detail,
            "chain mismatch: expected \"Development\", got \"Local Testnet\""
        );
        assert_eq!(report.exit_code(), ExitCode::ProbeFailed);
    }

    struct Exploding;

    impl Probe for Exploding {
        fn name(&self) -> &str {
            "exploding"
        }

        fn run(&self, _ctx: &ProbeContext<'_>) -> ProbeResult {
            panic!("probe blew up");
        }
    }

    #[test]
    fn test_panicking_probe_becomes_error() {
        for concurrent in [true, false] {
            let node = Arc::new(MockNode::dev());
            let mut probes = standard_probes();
            probes.insert(2, Box::new(Exploding));
            let config = ProbeConfig {
                concurrent,
                ..ProbeConfig::default()
            };
            let orchestrator = Orchestrator::with_probes(client(&node), config, probes);

            let pause = MockPause::for_node(Arc::clone(&node));
            let run = orchestrator.run(&RunDeadline::start(Duration::from_secs(60)), &pause);

            assert_eq!(run.results.len(), 9);
            let exploding = &run.results[2];
            assert_eq!(exploding.name, "exploding");
            assert_eq!(exploding.status, ProbeStatus::Error);
            assert_eq!(exploding.kind, Some(FailureKind::Panicked));
            assert_eq!(exploding.detail, "probe panicked: probe blew up");
            assert!(run.results[3].is_pass());
        }
    }
}

// =============================================================================
// Deadline and interrupt
// =============================================================================

mod cancellation_tests {
    use super::*;

    #[test]
    fn test_deadline_cuts_block_production_wait() {
        let node = Arc::new(MockNode::dev());
        let pause = MockPause::for_node(Arc::clone(&node));
        let report = probe_with(&node, sequential(), &pause, Duration::from_secs(3));

        let monitor = result(&report, "block production");
        assert_eq!(monitor.status, ProbeStatus::Error);
        assert_eq!(monitor.detail, "timed out waiting for block production");
        assert!(pause.requested()[0] <= Duration::from_secs(3));
        assert_eq!(report.exit_code(), ExitCode::ProbeFailed);
    }

    #[test]
    fn test_interrupt_during_wait() {
        let node = Arc::new(MockNode::dev());
        let pause = MockPause::for_node(Arc::clone(&node));
        pause.interrupt_during_pause();
        let report = probe_with(&node, sequential(), &pause, Duration::from_secs(60));

        let monitor = result(&report, "block production");
        assert_eq!(monitor.detail, "interrupted waiting for block production");
        // Peers runs after the monitor in sequential mode and never starts.
        assert_eq!(result(&report, "peers").kind, Some(FailureKind::Interrupted));
        assert_eq!(report.exit_code(), ExitCode::Cancelled);
        assert!(report.interrupted);
    }

    #[test]
    fn test_interrupt_before_start_runs_nothing() {
        let node = Arc::new(MockNode::dev());
        let pause = MockPause::new();
        pause.interrupt();
        let report = probe_with(&node, ProbeConfig::default(), &pause, Duration::from_secs(60));

        assert!(node.requests().is_empty());
        assert_eq!(report.results.len(), 8);
        assert_eq!(report.exit_code(), ExitCode::Cancelled);
    }
}
