//! Account nonce tracking for a single registration run
//!
//! The nonce is read once from the network and advanced locally exactly once
//! per signed transaction. Nothing is persisted; concurrent runs against the
//! same account are the caller's responsibility to prevent.

use crate::chain::Address;

use tracing::debug;

/// Sender account with its locally tracked nonce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    address: Address,
    /// Next nonce to use
    nonce: u64,
}

impl Account {
    /// Account as fetched from the network
    pub fn new(address: Address, nonce: u64) -> Self {
        Self { address, nonce }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Advance after a transaction with the current nonce has been signed
    pub fn increment_nonce(&mut self) {
        self.nonce += 1;
        debug!("Advanced nonce for {} to {}", self.address, self.nonce);
    }
}
