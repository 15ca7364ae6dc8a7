//! Gateway provider for account state, network config and broadcast

use super::{AccountSource, Address, Broadcaster, NetworkConfig, NetworkConfigSource, TxHash};
use crate::error::{PipelineStage, RegistrarError, RegistrarResult};
use crate::tx::{Account, Transaction};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Envelope used by every gateway response
#[derive(Debug, Deserialize)]
struct GatewayResponse<T> {
    data: Option<T>,
    #[serde(default)]
    error: String,
    #[serde(default)]
    code: String,
}

impl<T> GatewayResponse<T> {
    fn into_data(self, stage: PipelineStage) -> RegistrarResult<T> {
        if !self.error.is_empty() {
            return Err(RegistrarError::network(
                stage,
                format!("gateway returned '{}': {}", self.code, self.error),
            ));
        }
        self.data.ok_or_else(|| {
            RegistrarError::network(stage, format!("gateway response without data (code '{}')", self.code))
        })
    }
}

#[derive(Debug, Deserialize)]
struct AccountData {
    account: AccountOnNetwork,
}

#[derive(Debug, Deserialize)]
struct AccountOnNetwork {
    address: Address,
    nonce: u64,
}

#[derive(Debug, Deserialize)]
struct NetworkConfigData {
    config: NetworkConfigOnNetwork,
}

#[derive(Debug, Deserialize)]
struct NetworkConfigOnNetwork {
    #[serde(rename = "erd_chain_id")]
    chain_id: String,
    #[serde(rename = "erd_gas_per_data_byte")]
    gas_per_data_byte: u64,
    #[serde(rename = "erd_min_gas_price")]
    min_gas_price: u64,
}

#[derive(Debug, Deserialize)]
struct SendData {
    #[serde(rename = "txHash")]
    tx_hash: String,
}

/// HTTP client for a network gateway
pub struct ProxyProvider {
    base_url: String,
    http: reqwest::Client,
}

impl ProxyProvider {
    /// Create a provider for `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> RegistrarResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RegistrarError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, stage: PipelineStage) -> RegistrarResult<T> {
        let url = self.url(path);
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| RegistrarError::network(stage, e))?;
        let envelope: GatewayResponse<T> = response
            .json()
            .await
            .map_err(|e| RegistrarError::network(stage, e))?;

        envelope.into_data(stage)
    }
}

#[async_trait]
impl AccountSource for ProxyProvider {
    async fn fetch_account(&self, address: &Address) -> RegistrarResult<Account> {
        let data: AccountData = self
            .get(&format!("address/{}", address), PipelineStage::Fetched)
            .await?;

        if data.account.address != *address {
            return Err(RegistrarError::network(
                PipelineStage::Fetched,
                format!("gateway returned account {} for {}", data.account.address, address),
            ));
        }

        debug!("Account {} has nonce {}", address, data.account.nonce);
        Ok(Account::new(data.account.address, data.account.nonce))
    }
}

#[async_trait]
impl NetworkConfigSource for ProxyProvider {
    async fn fetch_network_config(&self) -> RegistrarResult<NetworkConfig> {
        let data: NetworkConfigData = self.get("network/config", PipelineStage::Fetched).await?;

        Ok(NetworkConfig {
            chain_id: data.config.chain_id,
            gas_per_data_byte: data.config.gas_per_data_byte,
            min_gas_price: data.config.min_gas_price,
        })
    }
}

#[async_trait]
impl Broadcaster for ProxyProvider {
    async fn broadcast(&self, tx: &Transaction) -> RegistrarResult<TxHash> {
        let body = tx.to_send_json()?;
        let url = self.url("transaction/send");
        let stage = PipelineStage::Submitted;

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RegistrarError::network(stage, e))?;
        let envelope: GatewayResponse<SendData> = response
            .json()
            .await
            .map_err(|e| RegistrarError::network(stage, e))?;
        let data = envelope.into_data(stage)?;

        info!("Transaction sent: {}", data.tx_hash);
        Ok(data.tx_hash)
    }
}
