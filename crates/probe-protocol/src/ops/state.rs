//! `state_*` reply types.

use serde::{Deserialize, Serialize};

/// Runtime version as returned by `state_getRuntimeVersion`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeVersion {
    /// Runtime spec name (e.g. "node-template").
    pub spec_name: String,
    /// Runtime spec version.
    pub spec_version: u32,
    /// Implementation name, if supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impl_name: Option<String>,
    /// Implementation version, if supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impl_version: Option<u32>,
    /// Transaction format version, if supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_version: Option<u32>,
}
