//! Configuration settings for Cadence.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub parser: ParserConfig,
    pub conflict: ConflictConfig,
    pub planner: PlannerConfig,
    pub store: StoreConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            parser: ParserConfig::default(),
            conflict: ConflictConfig::default(),
            planner: PlannerConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        // Try standard config locations
        let config_paths = [
            // Current directory
            PathBuf::from("config.toml"),
            PathBuf::from("cadence.toml"),
            // User config directory
            dirs::config_dir()
                .map(|p| p.join("cadence/config.toml"))
                .unwrap_or_default(),
            // Home directory
            dirs::home_dir()
                .map(|p| p.join(".cadence/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.parser.default_duration_minutes == 0 {
            return Err(
                ConfigError::Invalid("parser.default_duration_minutes must be > 0".to_string())
                    .into(),
            );
        }
        if self.parser.title_min_len >= self.parser.title_max_len {
            return Err(ConfigError::Invalid(
                "parser.title_min_len must be below parser.title_max_len".to_string(),
            )
            .into());
        }
        if self.store.data_file.trim().is_empty() {
            return Err(ConfigError::MissingField("store.data_file".to_string()).into());
        }
        if self.planner.earliest_hour >= self.planner.latest_hour {
            return Err(ConfigError::Invalid(
                "planner.earliest_hour must be below planner.latest_hour".to_string(),
            )
            .into());
        }
        if self.planner.latest_hour > 23 {
            return Err(
                ConfigError::Invalid("planner.latest_hour must be at most 23".to_string()).into(),
            );
        }

        Ok(())
    }

    /// Expand the event file path.
    pub fn data_file(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.store.data_file);
        PathBuf::from(expanded.as_ref())
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// HTTP port
    pub port: u16,
    /// Allow any origin (development convenience)
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7430,
            cors_permissive: true,
        }
    }
}

/// Text parser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Duration assumed when the text carries none
    pub default_duration_minutes: u32,
    /// Summary used when no title can be extracted
    pub fallback_title: String,
    /// Cleaned titles must be strictly longer than this
    pub title_min_len: usize,
    /// Cleaned titles must be strictly shorter than this
    pub title_max_len: usize,
    /// Token cap for the fallback title path
    pub max_title_tokens: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            default_duration_minutes: 60,
            fallback_title: "New Event".to_string(),
            title_min_len: 3,
            title_max_len: 100,
            max_title_tokens: 5,
        }
    }
}

/// Conflict detector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConflictConfig {
    /// Maximum number of alternative slots returned
    pub max_suggestions: usize,
}

impl Default for ConflictConfig {
    fn default() -> Self {
        Self { max_suggestions: 3 }
    }
}

/// Plan pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Generator command line; planning is disabled when unset
    pub command: Option<String>,
    /// Model identifier forwarded to the generator
    pub model: String,
    /// Generator call timeout in seconds
    pub timeout_secs: u64,
    /// Earliest hour a plan item may occupy
    pub earliest_hour: u32,
    /// Latest hour a plan item may occupy
    pub latest_hour: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            command: None,
            model: "google/gemma-2-2b-it".to_string(),
            timeout_secs: 120,
            earliest_hour: 6,
            latest_hour: 22,
        }
    }
}

/// Event store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the single JSON file holding all events
    pub data_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_file: "~/.local/share/cadence/events.json".to_string(),
        }
    }
}
