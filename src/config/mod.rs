//! Configuration module for the chaos dashboard
//!
//! Handles application configuration: where event data comes from, UI
//! preferences, and the timeline chart's tunable constants. Configuration is
//! persisted as JSON in the platform-appropriate data directory:
//!
//! - **Linux**: `~/.local/share/chaosdash-rs/`
//! - **macOS**: `~/Library/Application Support/chaosdash-rs/`
//! - **Windows**: `%APPDATA%\chaosdash-rs\`

use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application identifier for data directories
pub const APP_ID: &str = "chaosdash-rs";

/// Config filename inside the app data directory
pub const CONFIG_FILE: &str = "config.json";

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        DashboardError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            DashboardError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Chart layout and interaction constants
///
/// Defaults match the dashboard's timeline chart: a one-hour initial window,
/// 750ms zoom transitions, 250ms resize debounce and a 0.1–5x zoom extent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Margins around the drawing area, in pixels
    pub margin_top: f32,
    pub margin_right: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,

    /// Target number of time-axis ticks
    pub tick_count: usize,

    /// Maximum tick label width before wrapping, in pixels
    pub tick_label_max_width: f32,

    /// Minimum zoom scale
    pub min_scale: f32,

    /// Maximum zoom scale
    pub max_scale: f32,

    /// Scale applied when zooming to a clicked event
    pub click_zoom_scale: f32,

    /// Duration of the zoom-to-event transition, in milliseconds
    pub zoom_duration_ms: u64,

    /// Quiescence window before a resize triggers a relayout, in milliseconds
    pub resize_debounce_ms: u64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            margin_top: 15.0,
            margin_right: 15.0,
            margin_bottom: 30.0,
            margin_left: 15.0,
            tick_count: 6,
            tick_label_max_width: 30.0,
            min_scale: 0.1,
            max_scale: 5.0,
            click_zoom_scale: 2.0,
            zoom_duration_ms: 750,
            resize_debounce_ms: 250,
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the backend API (external collaborator)
    pub api_base_url: String,

    /// Optional path to a JSON file of events, used instead of the API
    #[serde(default)]
    pub events_file: Option<PathBuf>,

    /// Whether to use the dark theme
    pub dark_mode: bool,

    /// Timeline chart constants
    #[serde(default)]
    pub chart: ChartConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:2333/api".to_string(),
            events_file: None,
            dark_mode: true,
            chart: ChartConfig::default(),
        }
    }
}

impl AppConfig {
    /// Path to the persisted config file
    pub fn path() -> Option<PathBuf> {
        app_data_dir().map(|p| p.join(CONFIG_FILE))
    }

    /// Load the config from disk, falling back to defaults
    pub fn load_or_default() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to parse config at {:?}: {}", path, e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Save the config to disk
    pub fn save(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(dir.join(CONFIG_FILE), contents)?;
        Ok(())
    }
}
