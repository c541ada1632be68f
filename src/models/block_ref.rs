use serde::{Serialize, Serializer};
use serde_json::{Number, Value};
use std::fmt;

use crate::error::ValidationError;

/// Block tags accepted verbatim
pub const BLOCK_KEYWORDS: [&str; 3] = ["latest", "pending", "earliest"];

/// Canonical block identifier sent upstream: one of [`BLOCK_KEYWORDS`] or a
/// `0x`-prefixed lowercase hex quantity without leading zeros.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockReference(String);

impl BlockReference {
    /// Normalize a block given as text.
    ///
    /// Anything that is not a keyword is read as base 16, with or without a
    /// `0x` prefix. A decimal-looking string is therefore NOT decimal:
    /// `"10"` becomes `0x10` (sixteen). Existing clients rely on this.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        if BLOCK_KEYWORDS.contains(&value) {
            return Ok(Self(value.to_string()));
        }

        let digits = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
            .unwrap_or(value);

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ValidationError::InvalidBlockReference(value.to_string()));
        }

        let significant = digits.trim_start_matches('0');
        if significant.is_empty() {
            return Ok(Self("0x0".to_string()));
        }
        Ok(Self(format!("0x{}", significant.to_ascii_lowercase())))
    }

    /// Normalize a block given as an integer
    pub fn from_number(number: u64) -> Self {
        Self(format!("0x{:x}", number))
    }

    /// Normalize the `block_num` field of a request body, which may be a JSON
    /// string or a non-negative JSON integer.
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        match value {
            Value::String(text) => Self::parse(text),
            Value::Number(number) => number
                .as_u64()
                .map(Self::from_number)
                .ok_or_else(|| ValidationError::InvalidBlockReference(render_number(number))),
            other => Err(ValidationError::InvalidBlockReference(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Integers past `u64` arrive as floats; print those in positional form
/// rather than exponent notation.
fn render_number(number: &Number) -> String {
    match number.as_f64() {
        Some(value) if number.is_f64() && value.is_finite() && value.fract() == 0.0 => format!("{:.0}", value),
        _ => number.to_string(),
    }
}

impl fmt::Display for BlockReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for BlockReference {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}
