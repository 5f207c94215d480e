//! Devnet Probe - liveness and readiness checks for a Substrate dev node
//!
//! Issues a fixed, ordered sequence of JSON-RPC calls against a node,
//! verifies it answers, runs the expected runtime and keeps producing
//! blocks, and renders a report with a stable exit code.

pub mod config;
pub mod endpoint;
pub mod host;
pub mod mock;
pub mod pipeline;
pub mod probe;
pub mod signal;
pub mod summary;
pub mod timeout;

pub use config::{EffectiveConfig, ProbeConfig};
pub use endpoint::Endpoint;
pub use host::{HttpTransport, RpcClient, Transport};
pub use pipeline::{Orchestrator, ProbeRun, Reachability};
pub use probe::{Probe, ProbeContext, ProbeResult, ProbeStatus};
pub use summary::{ExitCode, FailureKind, ProbeReport};
pub use timeout::{Pause, PauseOutcome, RunDeadline};
