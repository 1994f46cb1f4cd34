//! Error types for Cadence.

use thiserror::Error;

/// Main error type for Cadence operations.
#[derive(Error, Debug)]
pub enum CadenceError {
    #[error("Validation failed: {}", errors.join("; "))]
    Validation { errors: Vec<String> },

    #[error("Event not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Planner error: {0}")]
    Planner(#[from] PlannerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CadenceError {
    /// Build a validation error from the reasons collected by a failed check.
    pub fn validation(errors: Vec<String>) -> Self {
        CadenceError::Validation { errors }
    }
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Event-store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read event file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to write event file: {0}")]
    WriteFile(#[source] std::io::Error),

    #[error("Corrupt event file: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Invalid update: {0}")]
    InvalidUpdate(String),
}

/// Plan-pipeline errors.
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("No plan generator configured")]
    NoGenerator,

    #[error("Failed to spawn generator command: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Generator IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generator timed out after {0}s")]
    Timeout(u64),

    #[error("Generator exited with status {0}")]
    ExitStatus(i32),

    #[error("Generator output is not valid JSON: {0}")]
    BadOutput(String),
}

/// Result type alias for Cadence operations.
pub type Result<T> = std::result::Result<T, CadenceError>;
