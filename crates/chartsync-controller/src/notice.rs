//! User-visible notices.
//!
//! These replace the original dashboard's blocking alerts: terminal UI
//! outcomes surfaced to the user, never exceptions propagated internally.

use std::fmt;

/// A notice the user must see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserNotice {
    /// Fewer candles than a trade derivation needs.
    InsufficientData,
    /// A trade was requested with no active symbol.
    NoSymbolSelected,
    /// The trade request failed (transport or non-success status).
    TradeRequestFailed { detail: String },
}

impl fmt::Display for UserNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientData => write!(f, "Not enough candle data."),
            Self::NoSymbolSelected => write!(f, "No symbol selected."),
            Self::TradeRequestFailed { detail } => write!(f, "Order failed: {detail}"),
        }
    }
}

/// Sink for user-visible notices (dialog, toast, log line).
pub trait NoticeSink: Send {
    fn notify(&self, notice: UserNotice);
}
