//! Application configuration.

use crate::error::{AppError, AppResult};
use chartsync_controller::{MarkerStyle, OverlayMode, SessionOptions};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Overlay rendering strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayModeKind {
    /// One discrete marker per order.
    #[default]
    Markers,
    /// Two continuous per-side lines rebuilt on every order push.
    BuySellLines,
}

/// Overlay configuration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct OverlayConfig {
    #[serde(default)]
    pub mode: OverlayModeKind,
    /// Marker style, only meaningful in `markers` mode.
    #[serde(default)]
    pub marker_style: MarkerStyle,
}

impl OverlayConfig {
    pub fn overlay_mode(&self) -> OverlayMode {
        match self.mode {
            OverlayModeKind::Markers => OverlayMode::Markers {
                style: self.marker_style,
            },
            OverlayModeKind::BuySellLines => OverlayMode::BuySellLines,
        }
    }
}

/// One chart slot. Each slot gets its own session, feeds, and overlays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSlotConfig {
    /// Symbol to select on startup. When absent, the slot takes its
    /// position from the symbol catalog (slot 0 gets the first symbol).
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default = "default_chart_width")]
    pub width: u32,
    #[serde(default = "default_chart_height")]
    pub height: u32,
}

fn default_chart_width() -> u32 {
    800
}

fn default_chart_height() -> u32 {
    500
}

impl Default for ChartSlotConfig {
    fn default() -> Self {
        Self {
            symbol: None,
            width: default_chart_width(),
            height: default_chart_height(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Re-open the candle subscription after a successful trade.
    #[serde(default)]
    pub refresh_after_trade: bool,
    /// Overlay rendering configuration.
    #[serde(default)]
    pub overlay: OverlayConfig,
    /// Chart slots. Defaults to a single slot following the catalog.
    #[serde(default = "default_charts")]
    pub charts: Vec<ChartSlotConfig>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_charts() -> Vec<ChartSlotConfig> {
    vec![ChartSlotConfig::default()]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            refresh_after_trade: false,
            overlay: OverlayConfig::default(),
            charts: default_charts(),
        }
    }
}

impl AppConfig {
    /// Load configuration: explicit path, else `CHARTSYNC_CONFIG`, else
    /// `config/default.toml`, else built-in defaults.
    pub fn load(path: Option<&str>) -> AppResult<Self> {
        let config_path = path
            .map(str::to_string)
            .or_else(|| std::env::var("CHARTSYNC_CONFIG").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        if Path::new(&config_path).exists() {
            Self::from_file(&config_path)
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;

        if config.charts.is_empty() {
            return Err(AppError::Config(
                "At least one [[charts]] slot is required".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            refresh_after_trade: self.refresh_after_trade,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.charts.len(), 1);
        assert!(config.charts[0].symbol.is_none());
        assert_eq!(
            config.overlay.overlay_mode(),
            OverlayMode::Markers {
                style: MarkerStyle::Span
            }
        );
    }

    #[test]
    fn test_parse_full_config() {
        let config: AppConfig = toml::from_str(
            r#"
            base_url = "http://localhost:9000"
            refresh_after_trade = true

            [overlay]
            mode = "buy_sell_lines"

            [[charts]]
            symbol = "NIFTY"

            [[charts]]
            width = 640
            height = 400
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:9000");
        assert!(config.refresh_after_trade);
        assert_eq!(config.overlay.overlay_mode(), OverlayMode::BuySellLines);
        assert_eq!(config.charts.len(), 2);
        assert_eq!(config.charts[0].symbol.as_deref(), Some("NIFTY"));
        assert_eq!(config.charts[1].width, 640);
    }

    #[test]
    fn test_marker_style_from_config() {
        let config: AppConfig = toml::from_str(
            r#"
            [overlay]
            mode = "markers"
            marker_style = "point"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.overlay.overlay_mode(),
            OverlayMode::Markers {
                style: MarkerStyle::Point
            }
        );
    }

    #[test]
    fn test_config_serialization_round() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("base_url"));
        assert!(toml_str.contains("refresh_after_trade"));
    }
}
