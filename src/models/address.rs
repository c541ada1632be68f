use serde::{Serialize, Serializer};
use sha3::{Digest, Keccak256};
use std::fmt;

use crate::error::ValidationError;

/// 20-byte account identifier, rendered in mixed-case checksum form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; 20]);

impl Address {
    /// Parse a hex address in any letter case, with or without `0x`.
    ///
    /// A mixed-case input is not checked against its checksum; the canonical
    /// form is always re-derived from the bytes.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let digits = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
            .unwrap_or(value);

        if digits.len() != 40 {
            return Err(ValidationError::InvalidAddress(value.to_string()));
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|_| ValidationError::InvalidAddress(value.to_string()))?;
        Ok(Self(bytes))
    }

    /// Mixed-case checksum encoding: a letter is upper-cased when the
    /// matching nibble of keccak256(lowercase hex digits) is 8 or more.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = Keccak256::digest(lower.as_bytes());

        let mut result = String::with_capacity(42);
        result.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let byte = hash[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                result.push(c.to_ascii_uppercase());
            } else {
                result.push(c);
            }
        }
        result
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_checksum())
    }
}
