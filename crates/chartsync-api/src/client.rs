//! HTTP client for the symbol catalog and trade endpoints.

use crate::error::{ApiError, ApiResult};
use crate::types::{BuyPayload, TradeResponse};
use chartsync_core::PLACEHOLDER_SYMBOL;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the backend REST endpoints.
#[derive(Debug, Clone)]
pub struct TradeClient {
    client: Client,
    base_url: String,
}

impl TradeClient {
    /// Create a new trade client.
    ///
    /// # Arguments
    /// * `base_url` - Backend base URL (e.g., "http://127.0.0.1:8000").
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| ApiError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the symbol catalog.
    ///
    /// The first element is the default active symbol. An empty or invalid
    /// response falls back to a single placeholder symbol so the caller
    /// always has something to select.
    pub async fn fetch_symbols(&self) -> Vec<String> {
        match self.try_fetch_symbols().await {
            Ok(symbols) if !symbols.is_empty() => {
                info!(count = symbols.len(), default = %symbols[0], "Fetched symbol catalog");
                symbols
            }
            Ok(_) => {
                warn!("Symbol catalog is empty, falling back to placeholder");
                vec![PLACEHOLDER_SYMBOL.to_string()]
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch symbol catalog, falling back to placeholder");
                vec![PLACEHOLDER_SYMBOL.to_string()]
            }
        }
    }

    /// Fetch the symbol catalog without the placeholder fallback.
    pub async fn try_fetch_symbols(&self) -> ApiResult<Vec<String>> {
        let url = format!("{}/api/symbols", self.base_url);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }

        let symbols: Vec<String> = response.json().await?;
        Ok(symbols)
    }

    /// Submit a buy order.
    ///
    /// A transport failure, a non-success HTTP status, or a response whose
    /// `status` field is not `"success"` all fail the call.
    pub async fn buy(&self, payload: &BuyPayload) -> ApiResult<()> {
        let url = format!("{}/api/trade/buy", self.base_url);
        info!(symbol = %payload.symbol, order_type = ?payload.order_type, "Submitting buy order");

        let response = self.client.post(&url).json(payload).send().await?;
        Self::check_trade_response(response).await
    }

    /// Liquidate/reset the current position.
    pub async fn sell_all(&self) -> ApiResult<()> {
        let url = format!("{}/api/trade/sell", self.base_url);
        info!("Submitting sell/reset request");

        let response = self.client.get(&url).send().await?;
        Self::check_trade_response(response).await
    }

    async fn check_trade_response(response: reqwest::Response) -> ApiResult<()> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }

        let body: TradeResponse = response.json().await?;
        if body.is_success() {
            Ok(())
        } else {
            Err(ApiError::TradeRejected(body.status))
        }
    }
}
