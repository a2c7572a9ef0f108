//! Headless chart surface and notice sink.
//!
//! The binary has no renderer; every drawing operation becomes a structured
//! log line so the synchronization behavior is observable end to end, and a
//! real renderer can be swapped in behind the same trait.

use chartsync_controller::{ChartSurface, LinePoint, NoticeSink, OverlayMarker, UserNotice};
use chartsync_core::{Candle, OrderId, OrderSide};
use tracing::{info, warn};

/// Chart surface that logs operations instead of drawing.
#[derive(Debug)]
pub struct TraceChart {
    label: String,
    bars: usize,
    markers: usize,
}

impl TraceChart {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            bars: 0,
            markers: 0,
        }
    }
}

impl ChartSurface for TraceChart {
    fn set_series(&mut self, candles: &[Candle]) {
        self.bars = candles.len();
        info!(chart = %self.label, bars = self.bars, "Series replaced");
    }

    fn update_bar(&mut self, candle: &Candle) {
        info!(
            chart = %self.label,
            time = candle.time,
            close = candle.close,
            "Bar updated"
        );
    }

    fn clear_series(&mut self) {
        self.bars = 0;
        info!(chart = %self.label, "Series cleared");
    }

    fn fit_content(&mut self) {
        info!(chart = %self.label, bars = self.bars, "View fitted to content");
    }

    fn resize(&mut self, width: u32, height: u32) {
        info!(chart = %self.label, width, height, "Surface resized");
    }

    fn add_marker(&mut self, id: &OrderId, marker: &OverlayMarker) {
        self.markers += 1;
        info!(
            chart = %self.label,
            order_id = %id,
            side = %marker.side,
            price = marker.price,
            style = ?marker.style,
            "Order marker added"
        );
    }

    fn remove_marker(&mut self, id: &OrderId) {
        self.markers = self.markers.saturating_sub(1);
        info!(chart = %self.label, order_id = %id, "Order marker removed");
    }

    fn set_side_line(&mut self, side: OrderSide, points: &[LinePoint]) {
        info!(chart = %self.label, %side, points = points.len(), "Side line replaced");
    }

    fn clear_side_lines(&mut self) {
        info!(chart = %self.label, "Side lines cleared");
    }
}

/// Notice sink that logs user-visible notices.
#[derive(Debug, Clone)]
pub struct LogNotices {
    label: String,
}

impl LogNotices {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl NoticeSink for LogNotices {
    fn notify(&self, notice: UserNotice) {
        warn!(chart = %self.label, "{notice}");
    }
}
