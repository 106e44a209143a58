//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cards::DisplayZone;
use crate::controller::{BoardSettings, CloseInteraction, DoneDisplay};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub board: BoardConfig,

    #[serde(default)]
    pub local: LocalConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Card API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Board presentation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub done_display: DoneDisplay,

    #[serde(default)]
    pub close_interaction: CloseInteraction,

    /// `local`, `utc`, or a fixed offset like `+02:00`
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "local".to_string()
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            done_display: DoneDisplay::default(),
            close_interaction: CloseInteraction::default(),
            timezone: default_timezone(),
        }
    }
}

impl BoardConfig {
    /// Zone for dates and week grouping; unparseable values fall back to local
    pub fn display_zone(&self) -> DisplayZone {
        DisplayZone::parse(&self.timezone).unwrap_or_else(|| {
            tracing::warn!(timezone = %self.timezone, "Unknown timezone, using local time");
            DisplayZone::Local
        })
    }

    pub fn settings(&self) -> BoardSettings {
        BoardSettings {
            done_display: self.done_display,
            close_interaction: self.close_interaction,
            zone: self.display_zone(),
        }
    }
}

/// Per-profile client state configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LocalConfig {
    #[serde(default = "default_state_file")]
    pub state_file: String,
}

fn default_state_file() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("anonboard").join("state.json").to_string_lossy().to_string())
        .unwrap_or_else(|| "./anonboard_state.json".to_string())
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    ///
    /// The first existing file wins. If it cannot be read or parsed, that is
    /// an error rather than a silent fallback to defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("anonboard").join("config.toml")),
            Some(PathBuf::from("./anonboard.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// Load the first existing file in `paths`, or fall back to the environment
    fn load_first(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => Self::load_with_env(path),
            None => Ok(Self::from_env()),
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("ANONBOARD_API_URL") {
            self.api.base_url = url;
        }

        if let Some(display) = var("ANONBOARD_DONE_DISPLAY") {
            match display.to_lowercase().as_str() {
                "grouped" => self.board.done_display = DoneDisplay::Grouped,
                "flat" => self.board.done_display = DoneDisplay::Flat,
                other => tracing::warn!("Ignoring unknown ANONBOARD_DONE_DISPLAY: {}", other),
            }
        }
        if let Some(interaction) = var("ANONBOARD_CLOSE_INTERACTION") {
            match interaction.to_lowercase().as_str() {
                "inline" => self.board.close_interaction = CloseInteraction::Inline,
                "modal" => self.board.close_interaction = CloseInteraction::Modal,
                other => tracing::warn!("Ignoring unknown ANONBOARD_CLOSE_INTERACTION: {}", other),
            }
        }
        if let Some(timezone) = var("ANONBOARD_TIMEZONE") {
            self.board.timezone = timezone;
        }

        if let Some(state_file) = var("ANONBOARD_STATE_FILE") {
            self.local.state_file = state_file;
        }

        if let Some(level) = var("ANONBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("ANONBOARD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Anonboard Configuration
#
# Environment variables override these settings:
# - ANONBOARD_API_URL
# - ANONBOARD_DONE_DISPLAY
# - ANONBOARD_CLOSE_INTERACTION
# - ANONBOARD_TIMEZONE
# - ANONBOARD_STATE_FILE
# - ANONBOARD_LOG_LEVEL
# - ANONBOARD_LOG_FORMAT

[api]
# Card API base URL
base_url = "http://localhost:3000"

[board]
# Done column layout: grouped (by week) or flat
done_display = "grouped"

# How closer names are captured: inline (per card) or modal (shared)
close_interaction = "inline"

# Time zone for dates and week grouping: local, utc, or an offset like +02:00
timezone = "local"

[local]
# Client token and onboarding flag live here
# state_file = "~/.local/share/anonboard/state.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
