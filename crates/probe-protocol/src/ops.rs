//! Typed shapes of the node replies the prober interprets.

pub mod chain;
pub mod state;
pub mod system;

pub use chain::ChainHeader;
pub use state::RuntimeVersion;
pub use system::{Health, PeerInfo, Properties};

/// RPC method names consumed by the prober.
pub mod names {
    pub const SYSTEM_HEALTH: &str = "system_health";
    pub const SYSTEM_CHAIN: &str = "system_chain";
    pub const SYSTEM_VERSION: &str = "system_version";
    pub const SYSTEM_ACCOUNT_NEXT_INDEX: &str = "system_accountNextIndex";
    pub const SYSTEM_PROPERTIES: &str = "system_properties";
    pub const SYSTEM_PEERS: &str = "system_peers";
    pub const CHAIN_GET_HEADER: &str = "chain_getHeader";
    pub const STATE_GET_RUNTIME_VERSION: &str = "state_getRuntimeVersion";
}
