//! Contract call payload encoding
//!
//! Call data is the function name followed by `@`-separated hex arguments.
//! Snapshot members are interleaved: address argument, then amount argument,
//! for each member in input order.

use crate::chain::Address;
use crate::error::RegistrarResult;
use crate::snapshot::SnapshotMember;

use num_bigint::BigUint;

/// Separator between the function name and each argument
pub const ARGUMENTS_SEPARATOR: char = '@';

/// Encoded contract call data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCallPayload {
    data: String,
}

impl ContractCallPayload {
    /// Payload bytes as attached to the transaction
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_bytes()
    }

    /// Byte length, the input to gas pricing
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Function name and hex arguments, in order
    pub fn parts(&self) -> (&str, Vec<&str>) {
        let mut parts = self.data.split(ARGUMENTS_SEPARATOR);
        let function = parts.next().unwrap_or_default();
        (function, parts.collect())
    }
}

impl std::fmt::Display for ContractCallPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.data)
    }
}

/// Builder for contract call payloads
#[derive(Debug, Clone)]
pub struct ContractCallPayloadBuilder {
    function: String,
    args: Vec<String>,
}

impl ContractCallPayloadBuilder {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            args: Vec::new(),
        }
    }

    /// Append an address argument (raw public key)
    pub fn address_arg(mut self, address: &Address) -> Self {
        self.args.push(address.to_hex());
        self
    }

    /// Append an unsigned big integer argument. Zero is an empty argument.
    pub fn biguint_arg(mut self, value: &BigUint) -> Self {
        self.args.push(encode_biguint(value));
        self
    }

    pub fn build(self) -> ContractCallPayload {
        let mut data = self.function;
        for arg in &self.args {
            data.push(ARGUMENTS_SEPARATOR);
            data.push_str(arg);
        }
        ContractCallPayload { data }
    }
}

/// Minimal big-endian hex of an unsigned integer; zero encodes to ""
pub fn encode_biguint(value: &BigUint) -> String {
    if value.bits() == 0 {
        return String::new();
    }
    hex::encode(value.to_bytes_be())
}

/// Encode a snapshot registration call for `members`
///
/// Every address is decoded before anything is returned, so an invalid member
/// anywhere in the list yields an error and no payload.
pub fn encode_snapshot(function: &str, members: &[SnapshotMember]) -> RegistrarResult<ContractCallPayload> {
    let builder = members.iter().try_fold(
        ContractCallPayloadBuilder::new(function),
        |builder, member| -> RegistrarResult<_> {
            let address = Address::from_bech32(&member.address)?;
            Ok(builder.address_arg(&address).biguint_arg(&member.weight))
        },
    )?;

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistrarError;

    fn member(seed: u8, weight: u64) -> SnapshotMember {
        SnapshotMember::new(Address::from_pubkey([seed; 32]).to_bech32(), weight)
    }

    #[test]
    fn test_interleaves_address_and_amount() {
        let members = vec![member(0xaa, 100), member(0xbb, 0)];
        let payload = encode_snapshot("registerMembersSnapshot", &members).unwrap();

        let (function, args) = payload.parts();
        assert_eq!(function, "registerMembersSnapshot");
        assert_eq!(args.len(), 4);
        assert_eq!(args[0], "aa".repeat(32));
        assert_eq!(args[1], "64");
        assert_eq!(args[2], "bb".repeat(32));
        assert_eq!(args[3], "");
        assert!(payload.to_string().ends_with(&format!("@{}@", "bb".repeat(32))));
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let members = vec![member(1, 5), member(2, u64::MAX), member(1, 5)];
        let first = encode_snapshot("f", &members).unwrap();
        let second = encode_snapshot("f", &members).unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn test_length_follows_argument_sizes() {
        // "f" + 2 * ("@" + 64 hex) + "@01" + "@ffffffffffffffff"
        let members = vec![member(1, 1), member(2, u64::MAX)];
        let payload = encode_snapshot("f", &members).unwrap();
        assert_eq!(payload.len(), 1 + 2 * 65 + 3 + 17);
    }

    #[test]
    fn test_minimal_big_endian_amounts() {
        assert_eq!(encode_biguint(&BigUint::from(0u32)), "");
        assert_eq!(encode_biguint(&BigUint::from(1u32)), "01");
        assert_eq!(encode_biguint(&BigUint::from(256u32)), "0100");
        let big = BigUint::from(10u32).pow(24);
        assert_eq!(encode_biguint(&big), "d3c21bcecceda1000000");
    }

    #[test]
    fn test_empty_member_list_is_bare_function() {
        let payload = encode_snapshot("registerMembersSnapshot", &[]).unwrap();
        assert_eq!(payload.to_string(), "registerMembersSnapshot");
        assert!(payload.parts().1.is_empty());
    }

    #[test]
    fn test_invalid_address_aborts_encoding() {
        let members = vec![member(1, 1), SnapshotMember::new("erd1broken", 7u32)];
        let err = encode_snapshot("f", &members).unwrap_err();
        assert!(matches!(err, RegistrarError::InvalidAddress { ref address, .. } if address == "erd1broken"));
    }
}
