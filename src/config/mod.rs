//! Configuration merge system
//!
//! Implements the 4-layer configuration merge:
//! 1. Built-in defaults
//! 2. Host/user config (~/.config/devnet-probe/probe.toml)
//! 3. Explicit config file (--config)
//! 4. CLI flags

mod defaults;
mod effective;
mod merge;
mod probe_config;

pub use defaults::{BuiltinDefaults, DEV_REFERENCE_ACCOUNT};
pub use effective::{ConfigError, ConfigOrigin, ConfigSource, EffectiveConfig};
pub use merge::{deep_merge, merge_layers};
pub use probe_config::{BlockProductionConfig, ExpectedIdentity, ProbeConfig, ValidationError};
