//! `chain_*` reply types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtocolError;
use crate::hex::{decode_height, encode_height};

/// Block header as returned by `chain_getHeader`.
///
/// Only the fields the prober relies on are kept. `number` is decoded from
/// its hex wire form on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainHeader {
    /// Block height.
    pub number: u64,
    /// Parent block hash, if supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_hash: Option<String>,
}

impl ChainHeader {
    /// Decode a header from a `chain_getHeader` result.
    pub fn from_value(value: &Value) -> Result<Self, ProtocolError> {
        let object = value.as_object().ok_or(ProtocolError::UnexpectedType {
            field: "header",
            expected: "object",
        })?;

        let number = object
            .get("number")
            .ok_or(ProtocolError::MissingField("number"))?
            .as_str()
            .ok_or(ProtocolError::UnexpectedType {
                field: "number",
                expected: "hex string",
            })?;

        let parent_hash = object
            .get("parentHash")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self {
            number: decode_height(number)?,
            parent_hash,
        })
    }

    /// Wire form of the header number.
    pub fn number_hex(&self) -> String {
        encode_height(self.number)
    }
}
