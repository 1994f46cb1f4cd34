//! File-backed event store.
//!
//! The whole collection lives in a single JSON file. Every mutation rewrites
//! the file in full under a write lock, so the last writer wins. That is the
//! right trade-off for a single-user assistant; it is not a multi-writer
//! database.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{CadenceError, Result, StoreError};
use crate::schedule::types::{Event, EventPatch};
use crate::store::EventStore;

/// Event store persisting to one JSON file on disk.
#[derive(Debug)]
pub struct FileEventStore {
    path: PathBuf,
    events: RwLock<Vec<Event>>,
}

impl FileEventStore {
    /// Open a store at the given path, loading any existing collection.
    ///
    /// A missing file means an empty collection. Parent directories are
    /// created eagerly so the first write cannot fail on them.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(StoreError::WriteFile)?;
        }

        let events: Vec<Event> = if path.exists() {
            let raw = std::fs::read_to_string(&path).map_err(StoreError::ReadFile)?;
            if raw.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&raw).map_err(StoreError::Corrupt)?
            }
        } else {
            Vec::new()
        };

        debug!(
            "Opened event store at {} ({} events)",
            path.display(),
            events.len()
        );
        Ok(Self {
            path,
            events: RwLock::new(events),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    async fn persist(&self, events: &[Event]) -> Result<()> {
        let json = serde_json::to_string_pretty(events).map_err(StoreError::Corrupt)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(StoreError::WriteFile)?;
        Ok(())
    }
}

#[async_trait]
impl EventStore for FileEventStore {
    async fn list_events(&self) -> Result<Vec<Event>> {
        let events = self.events.read().await;
        let mut all = events.clone();
        all.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn get_event(&self, id: &str) -> Result<Option<Event>> {
        let events = self.events.read().await;
        Ok(events.iter().find(|e| e.id == id).cloned())
    }

    async fn create_event(&self, event: Event) -> Result<Event> {
        let mut event = event;
        if event.id.is_empty() {
            event.id = uuid::Uuid::new_v4().to_string();
        }
        let now = Utc::now();
        event.created_at = now;
        event.updated_at = now;

        let mut events = self.events.write().await;
        events.push(event.clone());
        // A failed write rolls back, so memory never gets ahead of disk
        if let Err(err) = self.persist(&events).await {
            events.pop();
            return Err(err);
        }
        debug!("Created event {} '{}'", event.id, event.summary);
        Ok(event)
    }

    async fn update_event(&self, id: &str, patch: EventPatch) -> Result<Event> {
        let mut events = self.events.write().await;
        let position = events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| CadenceError::NotFound(id.to_string()))?;

        let mut updated = events[position].clone();
        patch.apply_to(&mut updated);
        if updated.end <= updated.start {
            return Err(
                StoreError::InvalidUpdate("end must be after start".to_string()).into(),
            );
        }

        let previous = std::mem::replace(&mut events[position], updated.clone());
        if let Err(err) = self.persist(&events).await {
            events[position] = previous;
            return Err(err);
        }
        debug!("Updated event {}", id);
        Ok(updated)
    }

    async fn delete_event(&self, id: &str) -> Result<()> {
        let mut events = self.events.write().await;
        let position = events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| CadenceError::NotFound(id.to_string()))?;

        let removed = events.remove(position);
        if let Err(err) = self.persist(&events).await {
            events.insert(position, removed);
            return Err(err);
        }
        debug!("Deleted event {}", id);
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        let events = self.events.read().await;
        Ok(events.len())
    }
}
