//! Snapshot module - holder records and the registration pipeline
//!
//! This module provides:
//! - Holder records as returned by the index API
//! - Validated snapshot members in base units
//! - Decimal-shifted amount formatting for the audit log
//! - The single-pass registration pipeline

pub mod pipeline;

pub use pipeline::{Registration, SnapshotRegistrar};

use crate::error::{RegistrarError, RegistrarResult};

use num_bigint::BigUint;
use serde::Deserialize;
use std::str::FromStr;

/// Raw holder entry from the token accounts index
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HolderRecord {
    pub address: String,
    /// Balance in base units as a decimal string
    pub balance: String,
}

/// Fungible token properties relevant to the snapshot
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenDefinition {
    pub identifier: String,
    pub decimals: u32,
}

/// A holder to register, weight in token base units
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotMember {
    pub address: String,
    pub weight: BigUint,
}

impl SnapshotMember {
    pub fn new(address: impl Into<String>, weight: impl Into<BigUint>) -> Self {
        Self {
            address: address.into(),
            weight: weight.into(),
        }
    }

    /// Build a member from a holder record, rejecting balances that are not
    /// non-negative base-10 integers
    pub fn from_holder(record: &HolderRecord) -> RegistrarResult<Self> {
        let balance = record.balance.trim();
        let invalid = || RegistrarError::InvalidAmount {
            address: record.address.clone(),
            amount: record.balance.clone(),
        };

        // BigUint::from_str accepts a leading '+', the index never emits one
        if balance.is_empty() || !balance.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let weight = BigUint::from_str(balance).map_err(|_| invalid())?;

        Ok(Self {
            address: record.address.clone(),
            weight,
        })
    }
}

/// Convert holder records into members, preserving order
pub fn members_from_holders(records: &[HolderRecord]) -> RegistrarResult<Vec<SnapshotMember>> {
    records.iter().map(SnapshotMember::from_holder).collect()
}

/// Render a base-unit amount shifted by `decimals`, without trailing zeros
pub fn format_amount(weight: &BigUint, decimals: u32) -> String {
    let digits = weight.to_str_radix(10);
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals - digits.len() + 1), digits)
    } else {
        digits
    };
    let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
    let frac_part = frac_part.trim_end_matches('0');

    if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{}.{}", int_part, frac_part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(address: &str, balance: &str) -> HolderRecord {
        HolderRecord {
            address: address.to_string(),
            balance: balance.to_string(),
        }
    }

    #[test]
    fn test_member_from_holder() {
        let member = SnapshotMember::from_holder(&record("erd1a", "1000000000000000000000")).unwrap();
        assert_eq!(member.address, "erd1a");
        assert_eq!(member.weight, BigUint::from(10u32).pow(21));
    }

    #[test]
    fn test_zero_balance_is_kept() {
        let member = SnapshotMember::from_holder(&record("erd1a", "0")).unwrap();
        assert_eq!(member.weight, BigUint::from(0u32));
    }

    #[test]
    fn test_rejects_negative_and_non_numeric() {
        for bad in ["-5", "abc", "", "1.5", "+3", "1e18"] {
            let err = SnapshotMember::from_holder(&record("erd1a", bad)).unwrap_err();
            assert!(
                matches!(err, RegistrarError::InvalidAmount { ref amount, .. } if amount == bad),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_members_keep_input_order() {
        let records = vec![record("erd1b", "2"), record("erd1a", "1"), record("erd1b", "3")];
        let members = members_from_holders(&records).unwrap();
        let order: Vec<_> = members.iter().map(|m| m.address.as_str()).collect();
        assert_eq!(order, vec!["erd1b", "erd1a", "erd1b"]);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(&BigUint::from(1_500_000u32), 6), "1.5");
        assert_eq!(format_amount(&BigUint::from(1_000_000u32), 6), "1");
        assert_eq!(format_amount(&BigUint::from(42u32), 6), "0.000042");
        assert_eq!(format_amount(&BigUint::from(0u32), 18), "0");
        assert_eq!(format_amount(&BigUint::from(123u32), 0), "123");
    }
}
