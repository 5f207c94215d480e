//! Block production monitor
//!
//! Samples the best header twice across a wait and decides liveness from the
//! height delta. The wait goes through `Pause`, bounded by the run deadline,
//! so an operator interrupt or an exhausted budget ends it early.

use std::time::{Duration, Instant};

use serde_json::json;

use crate::host::RpcClient;
use crate::timeout::{format_wait, PauseOutcome};

use super::{Probe, ProbeContext, ProbeError, ProbeResult};

const NAME: &str = "block production";

/// One header height observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressionSample {
    pub height: u64,
    pub taken_at: Instant,
}

impl ProgressionSample {
    fn take(client: &RpcClient) -> Result<Self, ProbeError> {
        let header = client.header()?;
        Ok(Self {
            height: header.number,
            taken_at: Instant::now(),
        })
    }
}

/// Classify two heights taken `wait` apart.
///
/// Returns the pass detail, or the error describing why the node is not
/// producing blocks.
pub fn classify_progression(
    first: u64,
    second: u64,
    wait: Duration,
    min_delta: u64,
) -> Result<String, ProbeError> {
    let Some(delta) = second.checked_sub(first) else {
        return Err(ProbeError::Regression { first, second });
    };
    let wait = format_wait(wait);

    if delta == 0 {
        return Err(ProbeError::Stuck(format!(
            "no new blocks in {} (stuck at #{})",
            wait, first
        )));
    }
    if delta < min_delta {
        return Err(ProbeError::Stuck(format!(
            "only {} new blocks in {} (expected at least {}): #{} → #{}",
            delta, wait, min_delta, first, second
        )));
    }

    Ok(format!(
        "blocks producing: #{} → #{} ({} new blocks in {})",
        first, second, delta, wait
    ))
}

/// Two-sample block production probe
#[derive(Debug, Default)]
pub struct BlockProductionMonitor;

impl BlockProductionMonitor {
    pub fn new() -> Self {
        Self
    }

    fn fail(err: ProbeError, raw: Option<serde_json::Value>) -> ProbeResult {
        tracing::debug!(probe = NAME, error = %err, "monitor failed");
        ProbeResult::from_error(NAME, &err, raw)
    }
}

impl Probe for BlockProductionMonitor {
    fn name(&self) -> &str {
        NAME
    }

    fn run(&self, ctx: &ProbeContext<'_>) -> ProbeResult {
        let settings = ctx.config.block_production;
        let wait = settings.wait_interval();

        let first = match ProgressionSample::take(ctx.client) {
            Ok(sample) => sample,
            Err(err) => return Self::fail(err, None),
        };

        let budget = wait.min(ctx.deadline.remaining());
        tracing::info!(height = first.height, wait = %format_wait(budget), "first height sampled");

        let partial = json!({"height": first.height, "first": first.height});
        if ctx.pause.pause(budget) == PauseOutcome::Interrupted {
            return Self::fail(ProbeError::Interrupted(NAME), Some(partial));
        }
        if budget < wait {
            return Self::fail(ProbeError::DeadlineExceeded(NAME), Some(partial));
        }

        let second = match ProgressionSample::take(ctx.client) {
            Ok(sample) => sample,
            Err(err) => return Self::fail(err, Some(partial)),
        };
        tracing::info!(height = second.height, "second height sampled");

        let raw = json!({
            "height": second.height.max(first.height),
            "first": first.height,
            "second": second.height,
            "delta": second.height.checked_sub(first.height),
            "wait_seconds": settings.wait_seconds,
            "elapsed_ms": second.taken_at.duration_since(first.taken_at).as_millis() as u64,
        });

        match classify_progression(first.height, second.height, wait, settings.min_delta) {
            Ok(detail) => ProbeResult::pass(NAME, detail, Some(raw)),
            Err(err) => Self::fail(err, Some(raw)),
        }
    }
}
