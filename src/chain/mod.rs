//! Chain module - network collaborators consumed by the registration pipeline
//!
//! This module provides:
//! - Bech32 account addresses
//! - Gateway (proxy) access for account state, network config and broadcast
//! - Index API access for token definitions and holder lists
//!
//! Each collaborator sits behind a trait so the pipeline can run against fakes.

pub mod address;
pub mod api;
pub mod proxy;

pub use address::Address;
pub use api::IndexApiProvider;
pub use proxy::ProxyProvider;

use crate::error::RegistrarResult;
use crate::snapshot::{HolderRecord, TokenDefinition};
use crate::tx::{Account, Transaction};

use async_trait::async_trait;

/// Hash identifying a broadcast transaction
pub type TxHash = String;

/// Network parameters read once per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub chain_id: String,
    pub gas_per_data_byte: u64,
    pub min_gas_price: u64,
}

/// Token metadata and holder listing
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HolderSource: Send + Sync {
    async fn fetch_token_definition(&self, token_id: &str) -> RegistrarResult<TokenDefinition>;

    /// Holders in index order; the order is kept as-is downstream
    async fn fetch_holders(&self, token_id: &str) -> RegistrarResult<Vec<HolderRecord>>;
}

/// Account state lookup
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountSource: Send + Sync {
    async fn fetch_account(&self, address: &Address) -> RegistrarResult<Account>;
}

/// Network configuration lookup
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NetworkConfigSource: Send + Sync {
    async fn fetch_network_config(&self) -> RegistrarResult<NetworkConfig>;
}

/// Transaction broadcast, a single attempt per call
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn broadcast(&self, tx: &Transaction) -> RegistrarResult<TxHash>;
}
