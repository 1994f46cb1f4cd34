//! Event persistence module.
//!
//! This module provides the event store abstraction:
//! - `EventStore`: async trait over event collections
//! - `FileEventStore`: single JSON file on disk, rewritten in full per mutation

mod file;
mod traits;

pub use file::FileEventStore;
pub use traits::EventStore;

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;

/// Create the event store from configuration.
pub fn create_store(config: &Config) -> Result<Arc<dyn EventStore>> {
    let store = FileEventStore::open(config.data_file())?;
    Ok(Arc::new(store))
}
