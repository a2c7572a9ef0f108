//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Controller error: {0}")]
    Controller(#[from] chartsync_controller::ControllerError),
}

pub type AppResult<T> = Result<T, AppError>;
