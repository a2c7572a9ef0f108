//! Candlestick feed subscription.
//!
//! One subscription per active symbol. The backend pushes an `initial_data`
//! snapshot once, then `live_update` bars. Malformed records are skipped and
//! the rest of the payload is processed.

use crate::error::{FeedError, FeedResult};
use crate::event::{FeedEvent, FeedKind};
use crate::sse::{SseDecoder, SseEvent};
use crate::FeedHandle;
use chartsync_core::{Candle, SessionId};
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Open the candlestick stream for `symbol` as a background task.
///
/// Every delivered event carries `session`; the caller closes the
/// subscription through the returned handle.
pub fn spawn_candle_feed(
    client: reqwest::Client,
    base_url: &str,
    symbol: &str,
    session: SessionId,
    tx: mpsc::Sender<FeedEvent>,
) -> FeedHandle {
    let cancel = CancellationToken::new();
    let url = format!(
        "{}/sse/candlesticks/{}",
        base_url.trim_end_matches('/'),
        symbol
    );
    let token = cancel.clone();
    let symbol = symbol.to_string();

    let task = tokio::spawn(async move {
        if let Err(e) = run(client, url, &symbol, session, tx.clone(), token).await {
            error!(%session, symbol = %symbol, error = %e, "Candle feed terminated");
            let _ = tx
                .send(FeedEvent::FeedClosed {
                    session,
                    feed: FeedKind::Candles,
                    reason: e.to_string(),
                })
                .await;
        }
    });

    FeedHandle::new(cancel, task)
}

async fn run(
    client: reqwest::Client,
    url: String,
    symbol: &str,
    session: SessionId,
    tx: mpsc::Sender<FeedEvent>,
    cancel: CancellationToken,
) -> FeedResult<()> {
    info!(%session, symbol, url = %url, "Opening candlestick subscription");

    let response = client
        .get(&url)
        .header(reqwest::header::ACCEPT, "text/event-stream")
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FeedError::HttpStatus(status));
    }

    let mut stream = response.bytes_stream();
    let mut decoder = SseDecoder::new();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!(%session, symbol, "Candle subscription closed");
                return Ok(());
            }
            chunk = stream.next() => match chunk {
                Some(Ok(bytes)) => {
                    for frame in decoder.feed(&bytes) {
                        if !dispatch(&frame, session, &tx).await {
                            // Receiver dropped, nothing left to deliver to.
                            return Ok(());
                        }
                    }
                }
                Some(Err(e)) => return Err(FeedError::Connection(e)),
                None => {
                    info!(%session, symbol, "Candle stream ended by server");
                    let _ = tx.send(FeedEvent::FeedClosed {
                        session,
                        feed: FeedKind::Candles,
                        reason: "stream ended".to_string(),
                    }).await;
                    return Ok(());
                }
            }
        }
    }
}

/// Parse one SSE frame and forward it. Returns false when the receiver is gone.
async fn dispatch(frame: &SseEvent, session: SessionId, tx: &mpsc::Sender<FeedEvent>) -> bool {
    let event = match frame.event.as_str() {
        "initial_data" => match serde_json::from_str::<Vec<Candle>>(&frame.data) {
            Ok(candles) => {
                let total = candles.len();
                let candles: Vec<Candle> =
                    candles.into_iter().filter(Candle::is_well_formed).collect();
                if candles.len() < total {
                    warn!(
                        %session,
                        dropped = total - candles.len(),
                        "Dropped malformed candles from snapshot"
                    );
                }
                FeedEvent::CandleSnapshot { session, candles }
            }
            Err(e) => {
                warn!(%session, error = %e, "Unparseable initial_data payload, skipping");
                return true;
            }
        },
        "live_update" => match serde_json::from_str::<Candle>(&frame.data) {
            Ok(candle) if candle.is_well_formed() => FeedEvent::CandleTick { session, candle },
            Ok(candle) => {
                warn!(%session, time = candle.time, "Dropped non-finite live_update bar");
                return true;
            }
            Err(e) => {
                warn!(%session, error = %e, "Unparseable live_update payload, skipping");
                return true;
            }
        },
        other => {
            debug!(%session, event = other, "Ignoring unknown candle feed event");
            return true;
        }
    };

    tx.send(event).await.is_ok()
}
