//! Mock Node Implementation
//!
//! In-process stand-in for a Substrate dev node, used by unit and
//! integration tests to drive the probes without a network.
//!
//! # Pieces
//!
//! - `MockNode`: simulated chain state plus scripted replies per method
//! - `MockTransport`: `Transport` implementation backed by a `MockNode`
//! - `MockPause`: `Pause` implementation that returns at once and moves the
//!   simulated chain forward (or backward) as if the wait had elapsed

mod failure;
mod node;
mod pause;

pub use failure::{FailureConfig, MockReply};
pub use node::{HeightChange, MockNode, MockTransport};
pub use pause::MockPause;
