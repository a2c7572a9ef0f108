//! Events delivered by feed tasks to the controller.

use chartsync_core::{Candle, RawOrder, SessionId};

/// Which feed an event or closure notice came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    Candles,
    Orders,
}

impl std::fmt::Display for FeedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Candles => write!(f, "candles"),
            Self::Orders => write!(f, "orders"),
        }
    }
}

/// Session-tagged feed event.
///
/// The session id is the one current when the subscription was opened; the
/// controller drops events whose id no longer matches its active session.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// Initial full candle history, pushed once per subscription.
    CandleSnapshot {
        session: SessionId,
        candles: Vec<Candle>,
    },
    /// One live bar update.
    CandleTick { session: SessionId, candle: Candle },
    /// Full current order set (not a delta).
    OrderBatch {
        session: SessionId,
        orders: Vec<RawOrder>,
    },
    /// The feed stream ended or failed. Not auto-retried.
    FeedClosed {
        session: SessionId,
        feed: FeedKind,
        reason: String,
    },
}

impl FeedEvent {
    /// Session id the event was produced under.
    pub fn session(&self) -> SessionId {
        match self {
            Self::CandleSnapshot { session, .. }
            | Self::CandleTick { session, .. }
            | Self::OrderBatch { session, .. }
            | Self::FeedClosed { session, .. } => *session,
        }
    }
}
