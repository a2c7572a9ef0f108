//! The chart/order synchronization state machine.
//!
//! Owns the active symbol, the candle series, and the rendered overlay set,
//! and reconciles them whenever a feed event or user action arrives. Every
//! handler runs to completion; events from a superseded session are fenced
//! by the session id they carry.

use crate::chart::{ChartSurface, LinePoint, OverlayMarker, OverlayMode};
use chartsync_core::{
    Candle, CandleSeries, Order, OrderId, OrderSide, RawOrder, SessionId, TickOutcome,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Live chart/order synchronization controller.
///
/// Invariants maintained across all operations:
/// - rendered markers are a subset of non-terminal orders of the active
///   symbol, with no duplicate order id
/// - the rendered id set only grows within a symbol session; it is cleared
///   only by [`begin_symbol`](Self::begin_symbol) or
///   [`reset_overlays`](Self::reset_overlays)
pub struct SyncController<C: ChartSurface> {
    chart: C,
    mode: OverlayMode,
    session: SessionId,
    active_symbol: Option<String>,
    candles: CandleSeries,
    rendered: HashSet<OrderId>,
    overlays: HashMap<OrderId, OverlayMarker>,
}

impl<C: ChartSurface> SyncController<C> {
    pub fn new(chart: C, mode: OverlayMode) -> Self {
        Self {
            chart,
            mode,
            session: SessionId::ZERO,
            active_symbol: None,
            candles: CandleSeries::new(),
            rendered: HashSet::new(),
            overlays: HashMap::new(),
        }
    }

    /// Current session generation.
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Currently active symbol, if any.
    pub fn active_symbol(&self) -> Option<&str> {
        self.active_symbol.as_deref()
    }

    pub fn candles(&self) -> &CandleSeries {
        &self.candles
    }

    /// Order ids with a rendered overlay.
    pub fn rendered_ids(&self) -> &HashSet<OrderId> {
        &self.rendered
    }

    /// Rendered overlays keyed by order id.
    pub fn overlays(&self) -> &HashMap<OrderId, OverlayMarker> {
        &self.overlays
    }

    pub fn chart(&self) -> &C {
        &self.chart
    }

    pub fn chart_mut(&mut self) -> &mut C {
        &mut self.chart
    }

    /// Whether `session` is the controller's current session.
    pub fn is_current(&self, session: SessionId) -> bool {
        session == self.session
    }

    /// Switch the active symbol and start a new session.
    ///
    /// Clears the candle series, the rendered id set, and every overlay, and
    /// returns the new session id the caller must tag its subscriptions with.
    /// After this returns, nothing from the previous symbol is visible.
    pub fn begin_symbol(&mut self, symbol: impl Into<String>) -> SessionId {
        let symbol = symbol.into();
        self.session = self.session.next();

        self.candles.clear();
        self.chart.clear_series();
        self.remove_all_overlays();

        info!(session = %self.session, symbol = %symbol, "Switched active symbol");
        self.active_symbol = Some(symbol);
        self.session
    }

    /// Handle the one-time full candle history push.
    ///
    /// Replaces the series wholesale and fits the view. Empty payloads are a
    /// no-op.
    pub fn on_candle_snapshot(&mut self, session: SessionId, candles: Vec<Candle>) {
        if !self.is_current(session) {
            debug!(%session, current = %self.session, "Dropping stale candle snapshot");
            return;
        }
        if candles.is_empty() {
            debug!(%session, "Empty candle snapshot, ignoring");
            return;
        }

        let dropped = self.candles.replace_all(candles);
        if dropped > 0 {
            warn!(%session, dropped, "Snapshot contained unusable candles");
        }
        self.chart.set_series(self.candles.as_slice());
        self.chart.fit_content();
        debug!(%session, bars = self.candles.len(), "Applied candle snapshot");
    }

    /// Handle one live bar update: replace the last bar on an equal
    /// timestamp, append on a newer one, drop anything older.
    pub fn on_candle_tick(&mut self, session: SessionId, candle: Candle) {
        if !self.is_current(session) {
            debug!(%session, current = %self.session, "Dropping stale candle tick");
            return;
        }

        match self.candles.apply_tick(candle) {
            TickOutcome::Replaced | TickOutcome::Appended => self.chart.update_bar(&candle),
            TickOutcome::Stale => {
                warn!(%session, time = candle.time, "Out-of-order candle tick dropped");
            }
        }
    }

    /// Handle an order feed push carrying the full current order set.
    pub fn on_order_batch(&mut self, session: SessionId, orders: &[RawOrder]) {
        if !self.is_current(session) {
            debug!(%session, current = %self.session, "Dropping stale order batch");
            return;
        }
        let Some(symbol) = self.active_symbol.clone() else {
            debug!(%session, "Order batch received with no active symbol");
            return;
        };

        match self.mode {
            OverlayMode::Markers { style } => {
                for raw in orders {
                    let validated =
                        Order::validate(raw, &symbol, |id| self.rendered.contains(id));
                    match validated {
                        Ok(order) => {
                            let marker = OverlayMarker {
                                side: order.side,
                                price: order.price,
                                style,
                                time: order.exchange_timestamp,
                            };
                            self.chart.add_marker(&order.id, &marker);
                            self.overlays.insert(order.id.clone(), marker);
                            self.rendered.insert(order.id.clone());
                            debug!(
                                %session,
                                order_id = %order.id,
                                side = %order.side,
                                price = order.price,
                                "Rendered order marker"
                            );
                        }
                        Err(reason) => {
                            debug!(%session, reason = %reason, "Skipped order record");
                        }
                    }
                }
            }
            OverlayMode::BuySellLines => {
                // Full replace: the duplicate-id check does not apply here,
                // both lines are rebuilt from every currently valid order.
                let mut valid: Vec<Order> = orders
                    .iter()
                    .filter_map(|raw| Order::validate(raw, &symbol, |_| false).ok())
                    .collect();
                valid.sort_by_key(|o| o.exchange_timestamp);

                self.chart.clear_side_lines();
                for side in [OrderSide::Buy, OrderSide::Sell] {
                    let points: Vec<LinePoint> = valid
                        .iter()
                        .filter(|o| o.side == side)
                        .map(|o| LinePoint {
                            time: o.exchange_timestamp,
                            price: o.price,
                        })
                        .collect();
                    if !points.is_empty() {
                        self.chart.set_side_line(side, &points);
                    }
                }
            }
        }
    }

    /// Remove every rendered overlay and forget their ids.
    pub fn reset_overlays(&mut self) {
        info!(session = %self.session, count = self.overlays.len(), "Resetting overlays");
        self.remove_all_overlays();
    }

    /// Re-fit the chart view to all data (recovery nudge after a failure).
    pub fn refit(&mut self) {
        self.chart.fit_content();
    }

    /// Resize the chart surface to its container.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.chart.resize(width, height);
    }

    fn remove_all_overlays(&mut self) {
        for id in self.overlays.keys() {
            self.chart.remove_marker(id);
        }
        self.overlays.clear();
        self.rendered.clear();
        self.chart.clear_side_lines();
    }
}

impl<C: ChartSurface> SyncController<C> {
    /// Consume the controller and return the chart surface.
    pub fn into_chart(self) -> C {
        self.chart
    }
}
