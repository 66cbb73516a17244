//! Account addresses.

use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Opaque 20-byte account identifier.
///
/// Identifies the registry owner, joining players, and settlement
/// recipients. Serialized as a hex string.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; 20]);

impl Address {
    /// Create a new random address
    pub fn random() -> Self {
        let mut bytes = [0u8; 20];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

/// Errors from parsing an address out of a hex string
#[derive(Debug, Error)]
pub enum AddressParseError {
    #[error("address is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("address must be 20 bytes, got {0}")]
    Length(usize),
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        let arr: [u8; 20] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| AddressParseError::Length(bytes.len()))?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        hex::encode(self.0).serialize(s)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let hex_str = String::deserialize(d)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_generation() {
        let a = Address::random();
        let b = Address::random();
        assert_ne!(a, b);
    }

    #[test]
    fn test_address_hex_roundtrip() {
        let address = Address::random();
        let parsed: Address = address.to_string().parse().unwrap();
        assert_eq!(address, parsed);
    }

    #[test]
    fn test_address_accepts_0x_prefix() {
        let address = Address::random();
        let parsed: Address = format!("0x{}", address).parse().unwrap();
        assert_eq!(address, parsed);
    }

    #[test]
    fn test_address_rejects_wrong_length() {
        let result = "deadbeef".parse::<Address>();
        assert!(matches!(result, Err(AddressParseError::Length(4))));
    }

    #[test]
    fn test_address_rejects_non_hex() {
        let result = "zz".repeat(20).parse::<Address>();
        assert!(matches!(result, Err(AddressParseError::Hex(_))));
    }

    #[test]
    fn test_address_serde_as_hex_string() {
        let address = Address::random();
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{}\"", address));

        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(address, back);
    }
}
