//! Non-sleeping pause for tests

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::timeout::{Pause, PauseOutcome};

use super::node::MockNode;

/// Pause that returns at once and records what was asked of it.
///
/// When attached to a node, every completed pause applies the node's
/// height change so the second header sample sees the simulated chain
/// after the wait.
#[derive(Default)]
pub struct MockPause {
    node: Option<Arc<MockNode>>,
    interrupted: AtomicBool,
    interrupt_on_pause: AtomicBool,
    requested: Mutex<Vec<Duration>>,
}

impl MockPause {
    /// Pause that is not attached to any node
    pub fn new() -> Self {
        Self::default()
    }

    /// Pause that advances `node` each time it elapses
    pub fn for_node(node: Arc<MockNode>) -> Self {
        Self {
            node: Some(node),
            ..Self::default()
        }
    }

    /// Mark the run as interrupted before anything starts
    pub fn interrupt(&self) {
        self.interrupted.store(true, Ordering::SeqCst);
    }

    /// Deliver an interrupt while the next pause is in progress
    pub fn interrupt_during_pause(&self) {
        self.interrupt_on_pause.store(true, Ordering::SeqCst);
    }

    /// Durations requested so far
    pub fn requested(&self) -> Vec<Duration> {
        self.requested.lock().unwrap().clone()
    }
}

impl Pause for MockPause {
    fn pause(&self, duration: Duration) -> PauseOutcome {
        self.requested.lock().unwrap().push(duration);

        if self.interrupt_on_pause.load(Ordering::SeqCst) {
            self.interrupted.store(true, Ordering::SeqCst);
        }
        if self.is_interrupted() {
            return PauseOutcome::Interrupted;
        }

        if let Some(node) = &self.node {
            node.on_pause();
        }
        PauseOutcome::Elapsed
    }

    fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_and_advances() {
        let node = Arc::new(MockNode::dev());
        let pause = MockPause::for_node(Arc::clone(&node));

        assert_eq!(pause.pause(Duration::from_secs(7)), PauseOutcome::Elapsed);
        assert_eq!(pause.requested(), vec![Duration::from_secs(7)]);
        assert_eq!(node.height(), 105);
    }

    #[test]
    fn test_interrupt_during_pause() {
        let node = Arc::new(MockNode::dev());
        let pause = MockPause::for_node(Arc::clone(&node));
        pause.interrupt_during_pause();

        assert!(!pause.is_interrupted());
        assert_eq!(pause.pause(Duration::from_secs(7)), PauseOutcome::Interrupted);
        assert!(pause.is_interrupted());
        assert_eq!(node.height(), 100);
    }
}
