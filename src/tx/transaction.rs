//! Contract call transaction record and its canonical serialization

use super::nonce::Account;
use super::payload::ContractCallPayload;
use crate::chain::{Address, NetworkConfig};
use crate::error::{RegistrarError, RegistrarResult};

use base64::Engine;
use serde::Serialize;

/// Transaction version using the plain JSON signing form
pub const TRANSACTION_VERSION: u32 = 1;

/// Default gas price when the network minimum is not higher
pub const DEFAULT_GAS_PRICE: u64 = 1_000_000_000;

/// A contract call transaction
///
/// Fields are fixed at construction. The only later change is attaching the
/// signature, so the signed bytes are exactly the submitted ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    nonce: u64,
    value: String,
    receiver: Address,
    sender: Address,
    gas_price: u64,
    gas_limit: u64,
    data: Vec<u8>,
    chain_id: String,
    version: u32,
    signature: Option<[u8; 64]>,
}

/// Wire shape shared by the signing form and the send request
#[derive(Serialize)]
struct TransactionJson<'a> {
    nonce: u64,
    value: &'a str,
    receiver: String,
    sender: String,
    #[serde(rename = "gasPrice")]
    gas_price: u64,
    #[serde(rename = "gasLimit")]
    gas_limit: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<String>,
    #[serde(rename = "chainID")]
    chain_id: &'a str,
    version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    signature: Option<String>,
}

impl Transaction {
    /// Assemble a zero-value call from `account` to `receiver`
    ///
    /// Uses the account's current nonce; the account is not advanced here.
    pub fn new_contract_call(
        account: &Account,
        network: &NetworkConfig,
        receiver: Address,
        payload: &ContractCallPayload,
        gas_limit: u64,
        gas_price: u64,
    ) -> Self {
        Self {
            nonce: account.nonce(),
            value: "0".to_string(),
            receiver,
            sender: *account.address(),
            gas_price,
            gas_limit,
            data: payload.as_bytes().to_vec(),
            chain_id: network.chain_id.clone(),
            version: TRANSACTION_VERSION,
            signature: None,
        }
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn receiver(&self) -> &Address {
        &self.receiver
    }

    pub fn sender(&self) -> &Address {
        &self.sender
    }

    pub fn gas_price(&self) -> u64 {
        self.gas_price
    }

    pub fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn signature(&self) -> Option<&[u8; 64]> {
        self.signature.as_ref()
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Canonical bytes covered by the signature: compact JSON of every field
    /// except the signature, empty data omitted
    pub fn serialize_for_signing(&self) -> RegistrarResult<Vec<u8>> {
        serde_json::to_vec(&self.to_json(false))
            .map_err(|e| RegistrarError::Signing(format!("Failed to serialize transaction: {}", e)))
    }

    /// JSON body for the send endpoint, signature included
    pub fn to_send_json(&self) -> RegistrarResult<serde_json::Value> {
        if !self.is_signed() {
            return Err(RegistrarError::Signing(
                "Refusing to serialize an unsigned transaction for sending".to_string(),
            ));
        }
        serde_json::to_value(self.to_json(true))
            .map_err(|e| RegistrarError::Signing(format!("Failed to serialize transaction: {}", e)))
    }

    pub(crate) fn apply_signature(&mut self, signature: [u8; 64]) {
        self.signature = Some(signature);
    }

    fn to_json(&self, with_signature: bool) -> TransactionJson<'_> {
        TransactionJson {
            nonce: self.nonce,
            value: &self.value,
            receiver: self.receiver.to_bech32(),
            sender: self.sender.to_bech32(),
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            data: (!self.data.is_empty())
                .then(|| base64::engine::general_purpose::STANDARD.encode(&self.data)),
            chain_id: &self.chain_id,
            version: self.version,
            signature: if with_signature {
                self.signature.map(hex::encode)
            } else {
                None
            },
        }
    }
}
