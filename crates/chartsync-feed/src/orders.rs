//! Order feed subscription.
//!
//! A single `/sse/orders` stream pushes the full current order set on every
//! `order_update` event. Records that fail to deserialize are skipped
//! individually; the rest of the batch is still delivered.

use crate::error::{FeedError, FeedResult};
use crate::event::{FeedEvent, FeedKind};
use crate::sse::{SseDecoder, SseEvent};
use crate::FeedHandle;
use chartsync_core::{RawOrder, SessionId};
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Open the order stream as a background task.
pub fn spawn_order_feed(
    client: reqwest::Client,
    base_url: &str,
    session: SessionId,
    tx: mpsc::Sender<FeedEvent>,
) -> FeedHandle {
    let cancel = CancellationToken::new();
    let url = format!("{}/sse/orders", base_url.trim_end_matches('/'));
    let token = cancel.clone();

    let task = tokio::spawn(async move {
        if let Err(e) = run(client, url, session, tx.clone(), token).await {
            error!(%session, error = %e, "Order feed terminated");
            let _ = tx
                .send(FeedEvent::FeedClosed {
                    session,
                    feed: FeedKind::Orders,
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
    session: SessionId,
    tx: mpsc::Sender<FeedEvent>,
    cancel: CancellationToken,
) -> FeedResult<()> {
    info!(%session, url = %url, "Opening order subscription");

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
                debug!(%session, "Order subscription closed");
                return Ok(());
            }
            chunk = stream.next() => match chunk {
                Some(Ok(bytes)) => {
                    for frame in decoder.feed(&bytes) {
                        if !dispatch(&frame, session, &tx).await {
                            return Ok(());
                        }
                    }
                }
                Some(Err(e)) => return Err(FeedError::Connection(e)),
                None => {
                    info!(%session, "Order stream ended by server");
                    let _ = tx.send(FeedEvent::FeedClosed {
                        session,
                        feed: FeedKind::Orders,
                        reason: "stream ended".to_string(),
                    }).await;
                    return Ok(());
                }
            }
        }
    }
}

async fn dispatch(frame: &SseEvent, session: SessionId, tx: &mpsc::Sender<FeedEvent>) -> bool {
    if frame.event != "order_update" {
        debug!(%session, event = %frame.event, "Ignoring unknown order feed event");
        return true;
    }

    let records = match serde_json::from_str::<Vec<serde_json::Value>>(&frame.data) {
        Ok(records) => records,
        Err(e) => {
            warn!(%session, error = %e, "Unparseable order_update payload, skipping");
            return true;
        }
    };

    let mut orders = Vec::with_capacity(records.len());
    for record in records {
        match serde_json::from_value::<RawOrder>(record) {
            Ok(order) => orders.push(order),
            Err(e) => warn!(%session, error = %e, "Dropped malformed order record"),
        }
    }

    tx.send(FeedEvent::OrderBatch { session, orders })
        .await
        .is_ok()
}
