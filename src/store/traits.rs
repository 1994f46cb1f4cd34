//! Event store trait definitions.

use async_trait::async_trait;

use crate::error::Result;
use crate::schedule::types::{Event, EventPatch};

/// Trait for event persistence backends.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// All stored events, sorted by start instant.
    async fn list_events(&self) -> Result<Vec<Event>>;

    /// Fetch an event by id.
    async fn get_event(&self, id: &str) -> Result<Option<Event>>;

    /// Persist a new event, assigning a fresh id when it has none.
    async fn create_event(&self, event: Event) -> Result<Event>;

    /// Apply a patch to a stored event and return the updated record.
    ///
    /// Fails with [`crate::error::CadenceError::NotFound`] for an unknown id
    /// and rejects patches that leave the end at or before the start.
    async fn update_event(&self, id: &str, patch: EventPatch) -> Result<Event>;

    /// Remove an event by id.
    async fn delete_event(&self, id: &str) -> Result<()>;

    /// Number of stored events.
    async fn count(&self) -> Result<usize>;
}
