//! Probes
//!
//! A probe is one named verification step. Given the shared client it
//! produces exactly one `ProbeResult`; failures are captured here and never
//! escape to the orchestrator.
//!
//! Most probes are `Check` descriptors: a request builder plus a response
//! interpreter. The block production monitor needs a wait between its two
//! calls and implements `Probe` directly.

mod block_production;
mod checks;
mod result;

pub use block_production::{classify_progression, BlockProductionMonitor, ProgressionSample};
pub use checks::{standard_probes, Call, Check, Finding};
pub use result::{ProbeError, ProbeResult, ProbeStatus};

use crate::config::ProbeConfig;
use crate::host::RpcClient;
use crate::timeout::{Pause, RunDeadline};

/// Read-only view of the run handed to every probe
pub struct ProbeContext<'a> {
    /// Shared client
    pub client: &'a RpcClient,
    /// Validated configuration
    pub config: &'a ProbeConfig,
    /// Overall run deadline
    pub deadline: &'a RunDeadline,
    /// Cancellable wait
    pub pause: &'a dyn Pause,
}

/// One verification step
pub trait Probe: Send + Sync {
    /// Name shown in the report
    fn name(&self) -> &str;

    /// Run the probe. Must not panic on node misbehaviour.
    fn run(&self, ctx: &ProbeContext<'_>) -> ProbeResult;
}
