//! REST clients for the CollectAPI economy endpoints and the bridge
//! proxy.

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::transport::{send_resilient, TransportError, FETCH_TIMEOUT};
use crate::types::{BridgePayload, PriceResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.collectapi.com";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("upstream returned an unsuccessful response")]
    Unsuccessful,

    #[error("failed to decode response body: {0}")]
    Decode(String),

    #[error("bridge error: HTTP {0}")]
    Bridge(reqwest::StatusCode),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Client for the CollectAPI economy endpoints.
pub struct CollectClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl CollectClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: Client::new(),
        }
    }

    /// Fetches gold and precious-metal prices.
    pub async fn get_gold_prices(&self) -> Result<PriceResponse> {
        self.get_price_list("/economy/goldPrice").await
    }

    /// Fetches currency rates (USD, EUR, BTC among others).
    pub async fn get_currency_rates(&self) -> Result<PriceResponse> {
        self.get_price_list("/economy/allCurrency").await
    }

    async fn get_price_list(&self, path: &str) -> Result<PriceResponse> {
        let url = format!("{}{}", self.base_url, path);
        debug!("fetching price list from {}", url);

        let request = self
            .client
            .get(&url)
            .header(AUTHORIZATION, &self.api_key)
            .header(CONTENT_TYPE, "application/json");

        let response = send_resilient(request).await?;
        let body: PriceResponse = response
            .json()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))?;

        if !body.success {
            return Err(ApiError::Unsuccessful);
        }

        debug!("fetched {} price rows from {}", body.result.len(), path);
        Ok(body)
    }
}

/// Client for the aggregating bridge endpoint.
///
/// One bounded attempt, no retry loop: the bridge sits close by and
/// keeps its own short-lived cache, so a failure here falls straight
/// back to the direct API.
pub struct BridgeClient {
    url: String,
    client: Client,
}

impl BridgeClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: Client::new(),
        }
    }

    /// Fetches the aggregated market-data payload.
    pub async fn fetch_market_data(&self) -> Result<BridgePayload> {
        debug!("fetching aggregated market data from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    ApiError::Transport(TransportError::Timeout(FETCH_TIMEOUT))
                } else {
                    ApiError::Transport(TransportError::Network(err.to_string()))
                }
            })?;

        if !response.status().is_success() {
            return Err(ApiError::Bridge(response.status()));
        }

        response
            .json()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }
}
