//! Chart configuration, loadable from a JSON file.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Figure sizes in pixels and font sizes in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub chart_width: u32,
    pub chart_height: u32,
    pub dashboard_width: u32,
    pub dashboard_height: u32,
    pub title_font_size: u32,
    pub dashboard_title_font_size: u32,
    pub label_font_size: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        // 10x5 in and 14x10 in figures at 100 dpi
        Self {
            chart_width: 1000,
            chart_height: 500,
            dashboard_width: 1400,
            dashboard_height: 1000,
            title_font_size: 20,
            dashboard_title_font_size: 28,
            label_font_size: 13,
        }
    }
}

impl ChartConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Read `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.is_file() {
            tracing::info!(path = %path.display(), "loading chart config");
            Self::from_json_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn chart_size(&self) -> (u32, u32) {
        (self.chart_width, self.chart_height)
    }

    pub fn dashboard_size(&self) -> (u32, u32) {
        (self.dashboard_width, self.dashboard_height)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.chart_width < 200 || self.chart_height < 150 {
            return Err(ConfigError::Invalid(format!(
                "chart size {}x{} is below 200x150",
                self.chart_width, self.chart_height
            )));
        }
        if self.dashboard_width < 400 || self.dashboard_height < 300 {
            return Err(ConfigError::Invalid(format!(
                "dashboard size {}x{} is below 400x300",
                self.dashboard_width, self.dashboard_height
            )));
        }
        Ok(())
    }
}
