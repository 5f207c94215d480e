//! Operator interrupts (SIGINT/SIGTERM)
//!
//! The first interrupt ends any in-progress pause, so the block production
//! monitor gives up its wait and the report is still printed. A second
//! interrupt exits at once with code 80.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::summary::ExitCode;
use crate::timeout::{Pause, PauseOutcome};

/// What an incoming signal escalates to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    /// Stop waiting and finish the report
    StopWaiting,
    /// Exit without a report
    ExitNow,
    /// Already exiting
    Ignore,
}

/// Interrupt flag shared between the signal handler and the probes
#[derive(Debug, Default)]
pub struct SignalState {
    interrupted: Mutex<bool>,
    wake: Condvar,
    received: AtomicU8,
}

impl SignalState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals received so far
    pub fn received(&self) -> u8 {
        self.received.load(Ordering::SeqCst)
    }

    /// Record one signal and decide how far to escalate
    pub fn on_signal(&self) -> Escalation {
        match self.received.fetch_add(1, Ordering::SeqCst) {
            0 => {
                self.interrupt();
                Escalation::StopWaiting
            }
            1 => Escalation::ExitNow,
            _ => Escalation::Ignore,
        }
    }

    /// Set the flag and wake every parked pause
    pub fn interrupt(&self) {
        if let Ok(mut flag) = self.interrupted.lock() {
            *flag = true;
        }
        self.wake.notify_all();
    }
}

impl Pause for SignalState {
    /// Parks on the condvar; a poisoned lock counts as an interrupt.
    fn pause(&self, duration: Duration) -> PauseOutcome {
        let until = Instant::now() + duration;
        let Ok(mut interrupted) = self.interrupted.lock() else {
            return PauseOutcome::Interrupted;
        };

        // Spurious wakeups re-enter the loop.
        while !*interrupted {
            let now = Instant::now();
            if now >= until {
                return PauseOutcome::Elapsed;
            }
            interrupted = match self.wake.wait_timeout(interrupted, until - now) {
                Ok((guard, _)) => guard,
                Err(_) => return PauseOutcome::Interrupted,
            };
        }
        PauseOutcome::Interrupted
    }

    fn is_interrupted(&self) -> bool {
        self.interrupted.lock().map(|flag| *flag).unwrap_or(true)
    }
}

/// Installs the process-wide handler over a shared `SignalState`
#[derive(Default)]
pub struct SignalHandler {
    state: Arc<SignalState>,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared state to hand to the orchestrator as its `Pause`
    pub fn state(&self) -> Arc<SignalState> {
        Arc::clone(&self.state)
    }

    /// Register for SIGINT and SIGTERM. Call once, at startup.
    pub fn install(&self) -> Result<(), ctrlc::Error> {
        let state = Arc::clone(&self.state);
        ctrlc::set_handler(move || match state.on_signal() {
            Escalation::StopWaiting => {
                tracing::warn!("interrupt received, finishing report");
            }
            Escalation::ExitNow => {
                eprintln!("\nSecond interrupt, exiting");
                std::process::exit(ExitCode::Cancelled.as_i32());
            }
            Escalation::Ignore => {}
        })
    }
}
