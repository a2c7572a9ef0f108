//! REST client for the chartsync backend.
//!
//! Covers the three request/response endpoints the dashboard uses:
//! `GET /api/symbols`, `POST /api/trade/buy`, and `GET /api/trade/sell`.

pub mod client;
pub mod error;
pub mod types;

pub use client::TradeClient;
pub use error::{ApiError, ApiResult};
pub use types::{BuyOrderType, BuyPayload, TradeResponse};
