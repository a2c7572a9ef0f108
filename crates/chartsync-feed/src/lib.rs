//! Live push subscriptions for the chartsync client.
//!
//! Implements the two server-sent-event streams the backend exposes:
//! `/sse/candlesticks/{symbol}` (one `initial_data` snapshot, then repeated
//! `live_update` bars) and `/sse/orders` (`order_update` carrying the full
//! current order set). Each subscription runs as a tokio task, delivers
//! session-tagged events over an mpsc channel, and is closed through a
//! `CancellationToken`.

pub mod candles;
pub mod error;
pub mod event;
pub mod orders;
pub mod sse;

pub use candles::spawn_candle_feed;
pub use error::{FeedError, FeedResult};
pub use event::{FeedEvent, FeedKind};
pub use orders::spawn_order_feed;
pub use sse::{SseDecoder, SseEvent};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Handle to a running feed task.
///
/// Dropping the handle does not stop the task; call [`FeedHandle::close`].
#[derive(Debug)]
pub struct FeedHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl FeedHandle {
    pub(crate) fn new(cancel: CancellationToken, task: JoinHandle<()>) -> Self {
        Self { cancel, task }
    }

    /// Close the subscription. Synchronous: after this returns no further
    /// event from this feed will be accepted (the task is cancelled and any
    /// event already in flight carries a session id the controller fences).
    pub fn close(&self) {
        self.cancel.cancel();
        self.task.abort();
    }

    /// Whether the feed task has finished.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
