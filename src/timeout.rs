//! Timeout enforcement for a probe run
//!
//! Two bounds apply:
//! - `call_timeout_seconds`: each transport call (enforced by the transport)
//! - `overall_seconds`: wall-clock budget for the whole run
//!
//! The overall budget is tracked by `RunDeadline`. Probes consult it before
//! starting and the block production monitor clamps its wait to it. Waiting
//! goes through the `Pause` trait so an operator interrupt can cut it short.

use std::time::{Duration, Instant};

/// Timeout configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Wall-clock budget for the whole run (default: 60)
    pub overall_seconds: u64,

    /// Per-call transport timeout (default: 5)
    pub call_timeout_seconds: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            overall_seconds: 60,
            call_timeout_seconds: 5,
        }
    }
}

impl TimeoutConfig {
    /// Validate bounds
    pub fn validate(&self) -> Result<(), TimeoutValidationError> {
        // overall_seconds must be in (0, 3600]
        if self.overall_seconds == 0 || self.overall_seconds > 3600 {
            return Err(TimeoutValidationError::OverallOutOfBounds {
                value: self.overall_seconds,
            });
        }

        // call_timeout_seconds must be in (0, min(300, overall_seconds)]
        let max = self.overall_seconds.min(300);
        if self.call_timeout_seconds == 0 || self.call_timeout_seconds > max {
            return Err(TimeoutValidationError::CallOutOfBounds {
                value: self.call_timeout_seconds,
                max,
            });
        }

        Ok(())
    }

    /// Per-call timeout as a `Duration`
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_seconds)
    }

    /// Overall budget as a `Duration`
    pub fn overall(&self) -> Duration {
        Duration::from_secs(self.overall_seconds)
    }
}

/// Timeout validation errors
#[derive(Debug, thiserror::Error)]
pub enum TimeoutValidationError {
    #[error("overall_seconds must be in (0, 3600], got {value}")]
    OverallOutOfBounds { value: u64 },

    #[error("call_timeout_seconds must be in (0, {max}], got {value}")]
    CallOutOfBounds { value: u64, max: u64 },
}

/// Overall deadline for one run
#[derive(Debug, Clone, Copy)]
pub struct RunDeadline {
    start_time: Instant,
    budget: Duration,
}

impl RunDeadline {
    /// Start the clock now
    pub fn start(budget: Duration) -> Self {
        Self {
            start_time: Instant::now(),
            budget,
        }
    }

    /// Get elapsed time since the run started
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Get remaining time before the deadline
    pub fn remaining(&self) -> Duration {
        self.budget.saturating_sub(self.elapsed())
    }

    /// Returns true once the budget is spent
    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }

}

/// How a pause ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOutcome {
    /// The full duration elapsed
    Elapsed,
    /// An operator interrupt ended the pause early
    Interrupted,
}

/// A cancellable, non-busy suspension.
///
/// Production code uses `SignalState`, which parks the thread on a condvar
/// that the signal handler notifies. Tests substitute a pause that returns
/// immediately.
pub trait Pause: Send + Sync {
    /// Suspend for `duration` or until interrupted.
    fn pause(&self, duration: Duration) -> PauseOutcome;

    /// Returns true once an interrupt has been requested.
    fn is_interrupted(&self) -> bool;
}

/// Render a wait duration the way reports print it: `7s`, `1.5s`, `250ms`.
pub fn format_wait(duration: Duration) -> String {
    if duration.subsec_nanos() == 0 {
        format!("{}s", duration.as_secs())
    } else if duration < Duration::from_secs(1) {
        format!("{}ms", duration.as_millis())
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}
