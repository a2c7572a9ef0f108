//! Order feed payloads and boundary validation.
//!
//! The order stream pushes the full current order set on every update, with
//! loosely typed records (optional fields, prices as strings or numbers,
//! legacy single-letter sides). `RawOrder` captures the wire shape as-is;
//! `Order::validate` runs the filtering pipeline and converts each record
//! into a typed order or a `SkipReason`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side: buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Parse a side from its wire form. Accepts the legacy single-letter
    /// codes (`B`/`S`) alongside the full words, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" | "B" => Some(Self::Buy),
            "SELL" | "S" => Some(Self::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Order status as reported by the order feed.
///
/// Unknown statuses are preserved as `Other` and treated as non-terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Open,
    Partial,
    Canceled,
    Complete,
    Rejected,
    Other(String),
}

impl OrderStatus {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "OPEN" => Self::Open,
            "PARTIAL" => Self::Partial,
            "CANCELED" | "CANCELLED" => Self::Canceled,
            "COMPLETE" => Self::Complete,
            "REJECTED" => Self::Rejected,
            other => Self::Other(other.to_string()),
        }
    }

    /// Terminal statuses never change again and are excluded from rendering.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Canceled | Self::Complete | Self::Rejected)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Partial => write!(f, "PARTIAL"),
            Self::Canceled => write!(f, "CANCELED"),
            Self::Complete => write!(f, "COMPLETE"),
            Self::Rejected => write!(f, "REJECTED"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// Unique order identifier assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Raw order record as delivered by the order feed.
///
/// Every field is optional; the feed mixes records from different broker
/// paths and prices arrive as either JSON strings or numbers.
#[derive(Debug, Clone, Deserialize)]
pub struct RawOrder {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default)]
    pub price: Option<serde_json::Value>,
    #[serde(default)]
    pub exchange_timestamp: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl RawOrder {
    /// Extract the price as a float, whether the feed sent a string or a number.
    fn price_f64(&self) -> Option<f64> {
        match self.price.as_ref()? {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

/// Why a raw order was skipped by the filtering pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Order belongs to a different symbol than the active one.
    WrongSymbol,
    /// Order id already has a rendered overlay.
    DuplicateId,
    /// A required field was absent.
    MissingField(&'static str),
    /// Timestamp present but not parseable as ISO-8601.
    BadTimestamp,
    /// Side present but not a recognized buy/sell code.
    BadSide,
    /// Order is in a terminal status.
    Terminal,
    /// Price present but not a finite number.
    BadPrice,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongSymbol => write!(f, "wrong symbol"),
            Self::DuplicateId => write!(f, "already rendered"),
            Self::MissingField(field) => write!(f, "missing field `{field}`"),
            Self::BadTimestamp => write!(f, "unparseable timestamp"),
            Self::BadSide => write!(f, "unrecognized side"),
            Self::Terminal => write!(f, "terminal status"),
            Self::BadPrice => write!(f, "non-finite price"),
        }
    }
}

/// A validated order eligible for overlay rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub symbol: String,
    pub side: OrderSide,
    pub price: f64,
    pub exchange_timestamp: DateTime<Utc>,
    pub status: OrderStatus,
}

impl Order {
    /// Run the filtering pipeline over a raw record, short-circuiting on the
    /// first failure:
    ///
    /// 1. symbol must equal the active symbol
    /// 2. order id must be present and not already rendered
    /// 3. exchange timestamp, price, and side must all be present
    /// 4. status must not be terminal
    /// 5. price must parse to a finite number
    pub fn validate<F>(
        raw: &RawOrder,
        active_symbol: &str,
        is_rendered: F,
    ) -> Result<Self, SkipReason>
    where
        F: Fn(&OrderId) -> bool,
    {
        let symbol = raw.symbol.as_deref().unwrap_or_default();
        if symbol != active_symbol {
            return Err(SkipReason::WrongSymbol);
        }

        let id = match raw.order_id.as_deref() {
            Some(id) if !id.is_empty() => OrderId::new(id),
            _ => return Err(SkipReason::MissingField("order_id")),
        };
        if is_rendered(&id) {
            return Err(SkipReason::DuplicateId);
        }

        let Some(ts_raw) = raw.exchange_timestamp.as_deref() else {
            return Err(SkipReason::MissingField("exchange_timestamp"));
        };
        if raw.price.is_none() {
            return Err(SkipReason::MissingField("price"));
        }
        let Some(side_raw) = raw.side.as_deref() else {
            return Err(SkipReason::MissingField("side"));
        };

        let status = raw
            .status
            .as_deref()
            .map(OrderStatus::parse)
            .unwrap_or(OrderStatus::Open);
        if status.is_terminal() {
            return Err(SkipReason::Terminal);
        }

        let price = match raw.price_f64() {
            Some(p) if p.is_finite() => p,
            _ => return Err(SkipReason::BadPrice),
        };

        let exchange_timestamp = DateTime::parse_from_rfc3339(ts_raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|_| SkipReason::BadTimestamp)?;

        let side = OrderSide::parse(side_raw).ok_or(SkipReason::BadSide)?;

        Ok(Self {
            id,
            symbol: symbol.to_string(),
            side,
            price,
            exchange_timestamp,
            status,
        })
    }
}
