//! Feed error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Connection error: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("HTTP {0} from stream endpoint")]
    HttpStatus(reqwest::StatusCode),
}

pub type FeedResult<T> = Result<T, FeedError>;
