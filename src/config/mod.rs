//! Configuration loading and validation.

mod settings;

pub use settings::{
    Config, ConflictConfig, ParserConfig, PlannerConfig, ServerConfig, StoreConfig,
};
