//! Controller error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("not enough candle data")]
    InsufficientData,

    #[error("no symbol selected")]
    NoSymbolSelected,

    #[error("trade request failed: {0}")]
    TradeRequest(#[from] chartsync_api::ApiError),

    #[error("feed error: {0}")]
    Feed(#[from] chartsync_feed::FeedError),
}

pub type ControllerResult<T> = Result<T, ControllerError>;
