//! Block number hex codec.
//!
//! Substrate encodes header numbers as `0x`-prefixed, lowercase, minimal
//! hexadecimal strings (`"0x64"` is block 100, `"0x0"` is genesis).
//! Decoding also accepts uppercase digits and leading zeros; encoding
//! always produces the canonical form, so canonical strings round-trip.

/// Errors decoding a hex block number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HexError {
    #[error("missing 0x prefix in {0:?}")]
    MissingPrefix(String),

    #[error("no digits after 0x prefix")]
    Empty,

    #[error("invalid hex digit {digit:?} in {input:?}")]
    InvalidDigit { input: String, digit: char },

    #[error("value {0:?} does not fit in 64 bits")]
    Overflow(String),
}

/// Decode a `0x`-prefixed hex string into a block number.
pub fn decode_height(input: &str) -> Result<u64, HexError> {
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .ok_or_else(|| HexError::MissingPrefix(input.to_string()))?;

    if digits.is_empty() {
        return Err(HexError::Empty);
    }

    if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(HexError::InvalidDigit {
            input: input.to_string(),
            digit: bad,
        });
    }

    // All digits are valid here, so the only remaining failure is overflow.
    u64::from_str_radix(digits, 16).map_err(|_| HexError::Overflow(input.to_string()))
}

/// Encode a block number in canonical `0x` form.
pub fn encode_height(height: u64) -> String {
    format!("0x{:x}", height)
}
