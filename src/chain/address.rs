//! Bech32 account addresses

use crate::error::{RegistrarError, RegistrarResult};

use bech32::{FromBase32, ToBase32, Variant};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// Human readable part used by account addresses
pub const ADDRESS_HRP: &str = "erd";

/// Length of the public key behind an address
pub const PUBKEY_LENGTH: usize = 32;

/// Account address: a 32-byte public key rendered as bech32
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    pubkey: [u8; PUBKEY_LENGTH],
}

impl Address {
    /// Create an address from raw public key bytes
    pub fn from_pubkey(pubkey: [u8; PUBKEY_LENGTH]) -> Self {
        Self { pubkey }
    }

    /// Decode a bech32 address string
    pub fn from_bech32(value: &str) -> RegistrarResult<Self> {
        let invalid = |reason: String| RegistrarError::InvalidAddress {
            address: value.to_string(),
            reason,
        };

        let (hrp, data, variant) = bech32::decode(value).map_err(|e| invalid(e.to_string()))?;
        if hrp != ADDRESS_HRP {
            return Err(invalid(format!("expected prefix '{}', got '{}'", ADDRESS_HRP, hrp)));
        }
        if variant != Variant::Bech32 {
            return Err(invalid("expected bech32 variant, got bech32m".to_string()));
        }

        let bytes = Vec::<u8>::from_base32(&data).map_err(|e| invalid(e.to_string()))?;
        let pubkey: [u8; PUBKEY_LENGTH] = bytes.try_into().map_err(|b: Vec<u8>| {
            invalid(format!("expected {} pubkey bytes, got {}", PUBKEY_LENGTH, b.len()))
        })?;

        Ok(Self { pubkey })
    }

    /// Render as a bech32 string
    pub fn to_bech32(&self) -> String {
        // Encoding a fixed-size key under a valid HRP cannot fail
        bech32::encode(ADDRESS_HRP, self.pubkey.to_base32(), Variant::Bech32)
            .unwrap_or_default()
    }

    /// Raw public key bytes
    pub fn pubkey(&self) -> &[u8; PUBKEY_LENGTH] {
        &self.pubkey
    }

    /// Lowercase hex of the public key
    pub fn to_hex(&self) -> String {
        hex::encode(self.pubkey)
    }
}

impl FromStr for Address {
    type Err = RegistrarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bech32(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bech32())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_bech32())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Address::from_bech32(&value).map_err(serde::de::Error::custom)
    }
}
