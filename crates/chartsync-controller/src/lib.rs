//! Live chart/order synchronization.
//!
//! `SyncController` is the synchronous state machine that keeps a chart's
//! candlestick series, order overlays, and symbol selection consistent as
//! server-pushed events and user actions interleave. `Session` is the async
//! driver that owns the feed subscriptions and trade requests around it.
//! The chart itself and user-facing notices are reached through the
//! `ChartSurface` and `NoticeSink` traits.

pub mod chart;
pub mod controller;
pub mod error;
pub mod notice;
pub mod session;
pub mod trade;

pub use chart::{side_color, ChartSurface, LinePoint, MarkerStyle, OverlayMarker, OverlayMode};
pub use controller::SyncController;
pub use error::{ControllerError, ControllerResult};
pub use notice::{NoticeSink, UserNotice};
pub use session::{Session, SessionOptions};
pub use trade::{derive_payload, TradeIntent};
