//! Core domain types for the chartsync live chart client.
//!
//! This crate provides the fundamental types shared across the system:
//! - `Candle`, `CandleSeries`: OHLC bars with append-or-replace-last semantics
//! - `Order`, `RawOrder`, `SkipReason`: order feed payloads and boundary validation
//! - `SessionId`: generation counter that fences stale async callbacks

pub mod candle;
pub mod error;
pub mod order;
pub mod session;

pub use candle::{Candle, CandleSeries, TickOutcome};
pub use error::{CoreError, Result};
pub use order::{Order, OrderId, OrderSide, OrderStatus, RawOrder, SkipReason};
pub use session::SessionId;

/// Sentinel symbol used when the backend's symbol catalog is empty or invalid.
pub const PLACEHOLDER_SYMBOL: &str = "DUMMY";
