//! chartsync binary crate: configuration, logging, and orchestration.

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod surface;

pub use app::{parse_command, Application, Command, SlotCommand};
pub use config::{AppConfig, ChartSlotConfig, OverlayConfig, OverlayModeKind};
pub use error::{AppError, AppResult};
pub use logging::init_logging;
pub use surface::{LogNotices, TraceChart};
