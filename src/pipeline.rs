//! Probe orchestration
//!
//! Runs the declared probe list against one endpoint:
//! - The first probe is the connectivity check. If it cannot reach the node,
//!   nothing else runs and a single synthetic skip result is emitted.
//! - The remaining probes run on scoped worker threads (or one after another
//!   in sequential mode). Results are gathered in declaration order.
//! - Every probe is guarded: deadline and interrupt are checked before it
//!   starts, and a panic inside it becomes an `error` result.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ProbeConfig;
use crate::endpoint::{Endpoint, EndpointError};
use crate::host::{HttpTransport, RpcClient, TransportError};
use crate::probe::{standard_probes, Probe, ProbeContext, ProbeError, ProbeResult};
use crate::summary::FailureKind;
use crate::timeout::{Pause, RunDeadline};

/// Errors setting up a run (nothing has been probed yet)
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("endpoint error: {0}")]
    Endpoint(#[from] EndpointError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Whether the connectivity probe reached the node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reachability {
    Reachable,
    Unreachable,
}

/// Ordered results of one run
#[derive(Debug, Clone)]
pub struct ProbeRun {
    /// One result per probe, in declaration order
    pub results: Vec<ProbeResult>,
    /// Connectivity outcome
    pub reachability: Reachability,
    /// An operator interrupt arrived during the run
    pub interrupted: bool,
}

/// Runs an ordered list of probes against one node
pub struct Orchestrator {
    client: RpcClient,
    config: ProbeConfig,
    probes: Vec<Box<dyn Probe>>,
}

impl Orchestrator {
    /// Orchestrator over the standard probe sequence
    pub fn new(client: RpcClient, config: ProbeConfig) -> Self {
        Self::with_probes(client, config, standard_probes())
    }

    /// Orchestrator over a custom probe list; the first probe is the
    /// connectivity check
    pub fn with_probes(client: RpcClient, config: ProbeConfig, probes: Vec<Box<dyn Probe>>) -> Self {
        Self {
            client,
            config,
            probes,
        }
    }

    /// Orchestrator talking HTTP to the configured endpoint
    pub fn connect(config: ProbeConfig) -> Result<Self, PipelineError> {
        let endpoint = config.endpoint()?;
        let transport = HttpTransport::new(endpoint, config.timeouts().call_timeout())?;
        Ok(Self::new(RpcClient::new(Arc::new(transport)), config))
    }

    /// Endpoint under test
    pub fn endpoint(&self) -> &Endpoint {
        self.client.endpoint()
    }

    /// Names of the declared probes, in order
    pub fn probe_names(&self) -> Vec<&str> {
        self.probes.iter().map(|p| p.name()).collect()
    }

    /// Run every probe and collect the results.
    ///
    /// Always returns a full result set; probe failures never escape.
    pub fn run(&self, deadline: &RunDeadline, pause: &dyn Pause) -> ProbeRun {
        let ctx = ProbeContext {
            client: &self.client,
            config: &self.config,
            deadline,
            pause,
        };

        tracing::info!(
            endpoint = %self.endpoint(),
            probes = self.probes.len(),
            concurrent = self.config.concurrent,
            "starting probe run"
        );

        let Some((connectivity, rest)) = self.probes.split_first() else {
            return ProbeRun {
                results: Vec::new(),
                reachability: Reachability::Reachable,
                interrupted: pause.is_interrupted(),
            };
        };

        let first = run_guarded(connectivity.as_ref(), &ctx);
        if first.kind == Some(FailureKind::TransportError) {
            tracing::warn!(detail = %first.detail, "connectivity probe failed, skipping remaining probes");
            return ProbeRun {
                results: vec![first, ProbeResult::skipped_unreachable()],
                reachability: Reachability::Unreachable,
                interrupted: pause.is_interrupted(),
            };
        }

        let mut results = Vec::with_capacity(self.probes.len());
        results.push(first);
        if self.config.concurrent {
            results.extend(run_concurrent(rest, &ctx));
        } else {
            results.extend(rest.iter().map(|probe| run_guarded(probe.as_ref(), &ctx)));
        }

        ProbeRun {
            results,
            reachability: Reachability::Reachable,
            interrupted: pause.is_interrupted(),
        }
    }
}

/// Run probes on scoped threads, joining in declaration order
fn run_concurrent(probes: &[Box<dyn Probe>], ctx: &ProbeContext<'_>) -> Vec<ProbeResult> {
    thread::scope(|scope| {
        let handles: Vec<_> = probes
            .iter()
            .map(|probe| {
                let probe = probe.as_ref();
                thread::Builder::new()
                    .name(format!("probe-{}", probe.name().replace(' ', "-")))
                    .spawn_scoped(scope, move || run_guarded(probe, ctx))
                    .map_err(|e| {
                        tracing::warn!(probe = probe.name(), error = %e, "could not spawn probe thread, running inline");
                    })
            })
            .collect();

        handles
            .into_iter()
            .zip(probes)
            .map(|(handle, probe)| match handle {
                Ok(handle) => handle.join().unwrap_or_else(|payload| {
                    let err = ProbeError::Panicked(panic_message(payload.as_ref()));
                    ProbeResult::from_error(probe.name(), &err, None)
                }),
                Err(()) => run_guarded(probe.as_ref(), ctx),
            })
            .collect()
    })
}

/// Run one probe with the deadline/interrupt gate and panic capture
fn run_guarded(probe: &dyn Probe, ctx: &ProbeContext<'_>) -> ProbeResult {
    let name = probe.name();

    if ctx.pause.is_interrupted() {
        return ProbeResult::aborted(name, FailureKind::Interrupted, "interrupted before start");
    }
    if ctx.deadline.is_expired() {
        return ProbeResult::aborted(name, FailureKind::Deadline, "run deadline exceeded before start");
    }

    let started = Instant::now();
    let result = panic::catch_unwind(AssertUnwindSafe(|| probe.run(ctx))).unwrap_or_else(|payload| {
        let err = ProbeError::Panicked(panic_message(payload.as_ref()));
        tracing::error!(probe = name, error = %err, "probe panicked");
        ProbeResult::from_error(name, &err, None)
    });

    let elapsed_ms = started.elapsed().as_millis() as u64;
    match result.kind {
        Some(kind) => tracing::warn!(
            probe = name,
            status = ?result.status,
            reason = kind.description(),
            elapsed_ms,
            "probe did not pass"
        ),
        None => tracing::info!(probe = name, elapsed_ms, "probe passed"),
    }
    result
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
