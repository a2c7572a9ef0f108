//! Async driver around the synchronization controller.
//!
//! A `Session` owns the feed subscriptions and the trade client for one
//! chart. The caller pumps events from the returned receiver into
//! [`Session::handle_event`]; all controller mutations happen on the
//! caller's task, so the state machine itself never needs a lock.

use crate::chart::{ChartSurface, OverlayMode};
use crate::controller::SyncController;
use crate::error::{ControllerError, ControllerResult};
use crate::notice::{NoticeSink, UserNotice};
use crate::trade::{derive_payload, TradeIntent};
use chartsync_api::TradeClient;
use chartsync_feed::{spawn_candle_feed, spawn_order_feed, FeedError, FeedEvent, FeedHandle};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// How long to wait for a stream connection to establish. The streams
/// themselves are open-ended, so no total request timeout is set.
const STREAM_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Buffered feed events before the producers back off.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Session tuning knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Re-open the candle subscription after a successful trade so the
    /// chart resynchronizes against post-trade backend state.
    pub refresh_after_trade: bool,
}

/// One chart's live session: controller, feeds, and trade requests.
pub struct Session<C: ChartSurface, N: NoticeSink> {
    controller: SyncController<C>,
    notices: N,
    api: TradeClient,
    stream_client: reqwest::Client,
    base_url: String,
    tx: mpsc::Sender<FeedEvent>,
    candle_feed: Option<FeedHandle>,
    order_feed: Option<FeedHandle>,
    options: SessionOptions,
}

impl<C: ChartSurface, N: NoticeSink> Session<C, N> {
    /// Create a session and the receiver the caller pumps feed events from.
    pub fn new(
        chart: C,
        mode: OverlayMode,
        notices: N,
        base_url: impl Into<String>,
        options: SessionOptions,
    ) -> ControllerResult<(Self, mpsc::Receiver<FeedEvent>)> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let api = TradeClient::new(&base_url)?;
        let stream_client = reqwest::Client::builder()
            .connect_timeout(STREAM_CONNECT_TIMEOUT)
            .build()
            .map_err(FeedError::Connection)?;

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let session = Self {
            controller: SyncController::new(chart, mode),
            notices,
            api,
            stream_client,
            base_url,
            tx,
            candle_feed: None,
            order_feed: None,
            options,
        };
        Ok((session, rx))
    }

    pub fn controller(&self) -> &SyncController<C> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SyncController<C> {
        &mut self.controller
    }

    /// Switch the active symbol: tear down the old subscriptions, reset the
    /// controller, and open fresh feeds tagged with the new session id.
    pub fn select_symbol(&mut self, symbol: &str) {
        self.close_feeds();
        let session = self.controller.begin_symbol(symbol);

        self.candle_feed = Some(spawn_candle_feed(
            self.stream_client.clone(),
            &self.base_url,
            symbol,
            session,
            self.tx.clone(),
        ));
        self.order_feed = Some(spawn_order_feed(
            self.stream_client.clone(),
            &self.base_url,
            session,
            self.tx.clone(),
        ));
    }

    /// Apply one feed event to the controller.
    pub fn handle_event(&mut self, event: FeedEvent) {
        match event {
            FeedEvent::CandleSnapshot { session, candles } => {
                self.controller.on_candle_snapshot(session, candles);
            }
            FeedEvent::CandleTick { session, candle } => {
                self.controller.on_candle_tick(session, candle);
            }
            FeedEvent::OrderBatch { session, orders } => {
                self.controller.on_order_batch(session, &orders);
            }
            FeedEvent::FeedClosed {
                session,
                feed,
                reason,
            } => {
                if self.controller.is_current(session) {
                    warn!(%session, %feed, reason, "Live subscription closed");
                } else {
                    debug!(%session, %feed, "Superseded subscription closed");
                }
            }
        }
    }

    /// Execute a user trade action.
    ///
    /// Overlays are cleared before the request goes out so the next order
    /// push re-renders the set the backend reports. If the active symbol
    /// changed while the request was in flight, its outcome is discarded.
    pub async fn submit(&mut self, intent: TradeIntent) {
        let Some(symbol) = self.controller.active_symbol().map(str::to_string) else {
            warn!(?intent, "Trade requested with no active symbol");
            self.notices.notify(UserNotice::NoSymbolSelected);
            return;
        };

        let payload = match derive_payload(intent, &symbol, self.controller.candles()) {
            Ok(payload) => payload,
            Err(ControllerError::InsufficientData) => {
                warn!(?intent, symbol = %symbol, "Not enough candle history for trade");
                self.notices.notify(UserNotice::InsufficientData);
                return;
            }
            Err(e) => {
                self.notices
                    .notify(UserNotice::TradeRequestFailed {
                        detail: e.to_string(),
                    });
                return;
            }
        };

        self.controller.reset_overlays();
        let session = self.controller.session();

        let result = match &payload {
            Some(body) => self.api.buy(body).await,
            None => self.api.sell_all().await,
        };

        if !self.controller.is_current(session) {
            debug!(%session, ?intent, "Discarding trade outcome from a superseded session");
            return;
        }

        match result {
            Ok(()) => {
                info!(?intent, symbol = %symbol, "Trade accepted");
                if self.options.refresh_after_trade {
                    self.reopen_candle_feed(&symbol, session);
                }
            }
            Err(e) => {
                warn!(?intent, symbol = %symbol, error = %e, "Trade failed");
                self.notices.notify(UserNotice::TradeRequestFailed {
                    detail: e.to_string(),
                });
                self.controller.refit();
            }
        }
    }

    /// Resize the chart surface.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.controller.resize(width, height);
    }

    /// Tear down the session: close both subscriptions and drop the chart
    /// contents. The event receiver drains naturally afterwards.
    pub fn dispose(&mut self) {
        info!(session = %self.controller.session(), "Disposing session");
        self.close_feeds();
        self.controller.reset_overlays();
        self.controller.chart_mut().clear_series();
    }

    /// Re-subscribe the candle stream under the current session so the next
    /// snapshot replaces the series with post-trade backend state.
    fn reopen_candle_feed(&mut self, symbol: &str, session: chartsync_core::SessionId) {
        debug!(%session, symbol, "Re-opening candle subscription after trade");
        if let Some(feed) = self.candle_feed.take() {
            feed.close();
        }
        self.candle_feed = Some(spawn_candle_feed(
            self.stream_client.clone(),
            &self.base_url,
            symbol,
            session,
            self.tx.clone(),
        ));
    }

    fn close_feeds(&mut self) {
        if let Some(feed) = self.candle_feed.take() {
            feed.close();
        }
        if let Some(feed) = self.order_feed.take() {
            feed.close();
        }
    }
}

impl<C: ChartSurface, N: NoticeSink> Drop for Session<C, N> {
    fn drop(&mut self) {
        self.close_feeds();
    }
}
