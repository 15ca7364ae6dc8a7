//! Gas limit estimation for contract call payloads

use crate::chain::NetworkConfig;
use crate::config::RegistrarConfig;

use tracing::debug;

/// Fixed gas granted to the contract call itself
pub const DEFAULT_BASE_GAS: u64 = 50_000_000;

/// Extra gas per payload byte on top of the network's data cost
pub const DEFAULT_PER_BYTE_MARGIN_FEE: u64 = 10_000;

/// Gas estimator for snapshot registration calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasEstimator {
    /// Gas for executing the call regardless of payload size
    base_gas: u64,
    /// Margin added to the network gas-per-byte cost
    per_byte_margin_fee: u64,
}

impl GasEstimator {
    /// Create a new gas estimator
    pub fn new(base_gas: u64, per_byte_margin_fee: u64) -> Self {
        Self {
            base_gas,
            per_byte_margin_fee,
        }
    }

    pub fn from_config(config: &RegistrarConfig) -> Self {
        Self::new(config.base_gas, config.per_byte_margin_fee)
    }

    /// Gas limit for a payload of `payload_len` bytes
    ///
    /// Must be called with the length of the final encoded payload.
    pub fn estimate(&self, network: &NetworkConfig, payload_len: usize) -> u64 {
        let per_byte = network.gas_per_data_byte.saturating_add(self.per_byte_margin_fee);
        let data_gas = per_byte.saturating_mul(payload_len as u64);
        let gas_limit = self.base_gas.saturating_add(data_gas);

        debug!(
            "Gas limit for {} payload bytes at {} gas/byte: {}",
            payload_len, per_byte, gas_limit
        );
        gas_limit
    }
}

impl Default for GasEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_GAS, DEFAULT_PER_BYTE_MARGIN_FEE)
    }
}
