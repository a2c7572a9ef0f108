//! Wire types for the trade endpoints.

use serde::{Deserialize, Serialize};

/// Order type accepted by the buy endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuyOrderType {
    /// Stop-loss entry with a trigger price.
    #[serde(rename = "SL")]
    StopLoss,
    /// Limit entry.
    #[serde(rename = "LIMIT")]
    Limit,
}

/// Body of `POST /api/trade/buy`.
///
/// Fields are optional because the different trade intents populate
/// different subsets; absent fields are omitted from the JSON body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuyPayload {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_type: Option<BuyOrderType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
}

impl BuyPayload {
    /// Payload skeleton with every optional field absent.
    pub fn for_symbol(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            price: None,
            trigger_price: None,
            order_type: None,
            exit_price: None,
            cost_price: None,
            high: None,
            low: None,
        }
    }
}

/// Response of both trade endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl TradeResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}
