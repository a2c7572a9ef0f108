//! The seam to the chart renderer.
//!
//! Rendering internals belong to the chart library; the controller only
//! issues the operations below. Implementations must apply each call before
//! returning, matching the run-to-completion model the controller assumes.

use chartsync_core::{Candle, OrderId, OrderSide};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Candlestick up/buy color.
pub const COLOR_BUY: &str = "#4CAF50";
/// Candlestick down/sell color.
pub const COLOR_SELL: &str = "#f44336";

/// Marker color for an order side (buy = green, sell = red).
pub fn side_color(side: OrderSide) -> &'static str {
    match side {
        OrderSide::Buy => COLOR_BUY,
        OrderSide::Sell => COLOR_SELL,
    }
}

/// Visual style for a discrete order marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerStyle {
    /// Horizontal line spanning the visible time range.
    #[default]
    Span,
    /// Point anchored at the order's own exchange timestamp.
    Point,
}

/// Overlay rendering strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayMode {
    /// One discrete marker per order, rendered at most once per order id.
    Markers { style: MarkerStyle },
    /// Two continuous per-side lines rebuilt from scratch on every push.
    BuySellLines,
}

impl Default for OverlayMode {
    fn default() -> Self {
        Self::Markers {
            style: MarkerStyle::Span,
        }
    }
}

/// A rendered overlay for one order, keyed by its order id.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayMarker {
    pub side: OrderSide,
    pub price: f64,
    pub style: MarkerStyle,
    /// Anchor time for point-style markers.
    pub time: DateTime<Utc>,
}

/// One vertex of a continuous per-side order line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePoint {
    pub time: DateTime<Utc>,
    pub price: f64,
}

/// Drawing surface operations the controller needs from the chart library.
pub trait ChartSurface: Send {
    /// Replace the candlestick series wholesale.
    fn set_series(&mut self, candles: &[Candle]);
    /// Apply one bar update (replace-last or append, decided by the caller).
    fn update_bar(&mut self, candle: &Candle);
    /// Remove all candles.
    fn clear_series(&mut self);
    /// Scale the view to fit all data.
    fn fit_content(&mut self);
    /// Resize the drawing surface to match its container.
    fn resize(&mut self, width: u32, height: u32);
    /// Draw a discrete order marker.
    fn add_marker(&mut self, id: &OrderId, marker: &OverlayMarker);
    /// Destroy a discrete order marker.
    fn remove_marker(&mut self, id: &OrderId);
    /// Replace one continuous per-side order line.
    fn set_side_line(&mut self, side: OrderSide, points: &[LinePoint]);
    /// Remove both per-side order lines.
    fn clear_side_lines(&mut self);
}
