//! Index API provider for token definitions and holder lists

use super::HolderSource;
use crate::error::{PipelineStage, RegistrarError, RegistrarResult};
use crate::snapshot::{HolderRecord, TokenDefinition};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP client for the token index API
pub struct IndexApiProvider {
    base_url: String,
    /// Holders requested in one call; larger holder sets are truncated
    page_size: u32,
    http: reqwest::Client,
}

impl IndexApiProvider {
    pub fn new(base_url: impl Into<String>, page_size: u32, timeout: Duration) -> RegistrarResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RegistrarError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            page_size,
            http,
        })
    }

    fn holders_url(&self, token_id: &str) -> String {
        format!("{}/tokens/{}/accounts?size={}", self.base_url, token_id, self.page_size)
    }

    fn token_url(&self, token_id: &str) -> String {
        format!("{}/tokens/{}", self.base_url, token_id)
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> RegistrarResult<T> {
        debug!("GET {}", url);
        let stage = PipelineStage::Fetched;

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| RegistrarError::network(stage, e))?;
        if !response.status().is_success() {
            return Err(RegistrarError::network(
                stage,
                format!("index request {} failed with status {}", url, response.status()),
            ));
        }

        response.json().await.map_err(|e| RegistrarError::network(stage, e))
    }
}

#[async_trait]
impl HolderSource for IndexApiProvider {
    async fn fetch_token_definition(&self, token_id: &str) -> RegistrarResult<TokenDefinition> {
        self.get(&self.token_url(token_id)).await
    }

    async fn fetch_holders(&self, token_id: &str) -> RegistrarResult<Vec<HolderRecord>> {
        let holders: Vec<HolderRecord> = self.get(&self.holders_url(token_id)).await?;
        if holders.len() as u64 >= u64::from(self.page_size) {
            warn!(
                "Holder list for {} reached the page size of {}; the snapshot may be truncated",
                token_id,
                self.page_size
            );
        }
        Ok(holders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let api = IndexApiProvider::new("https://api.example", 10_000, Duration::from_secs(30)).unwrap();
        assert_eq!(api.token_url("SNAP-abcdef"), "https://api.example/tokens/SNAP-abcdef");
        assert_eq!(
            api.holders_url("SNAP-abcdef"),
            "https://api.example/tokens/SNAP-abcdef/accounts?size=10000"
        );
    }

    #[test]
    fn test_parses_holders() {
        let body = r#"[{"address":"erd1a","balance":"1000"},{"address":"erd1b","balance":"0"}]"#;
        let holders: Vec<HolderRecord> = serde_json::from_str(body).unwrap();
        assert_eq!(holders.len(), 2);
        assert_eq!(holders[1].balance, "0");
    }

    #[test]
    fn test_parses_token_definition() {
        let body = r#"{"identifier":"SNAP-abcdef","name":"Snap","ticker":"SNAP","decimals":18,"supply":"1000"}"#;
        let token: TokenDefinition = serde_json::from_str(body).unwrap();
        assert_eq!(token.identifier, "SNAP-abcdef");
        assert_eq!(token.decimals, 18);
    }
}
