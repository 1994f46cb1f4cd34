//! Cadence: Natural Language Scheduling Service
//!
//! A Rust scheduling service that turns free-text sentences into calendar
//! events, detects interval conflicts against a file-backed store, and
//! drafts model-generated weekly plans around existing commitments.

pub mod api;
pub mod config;
pub mod error;
pub mod planner;
pub mod schedule;
pub mod scheduler;
pub mod store;

pub use api::{create_rest_router, serve, ApiState};
pub use config::Config;
pub use error::{CadenceError, Result};
pub use planner::{Chronotype, PlanPipeline, PlanResponse, UserProfile, WeeklyPlan};
pub use schedule::{
    validate_event_data, CandidateEvent, ConflictDetector, ConflictReport, Event, ParsedEvent,
    ScheduleParser, Suggestion,
};
pub use scheduler::{CheckOutcome, ScheduleOutcome, Scheduler};
pub use store::{create_store, EventStore, FileEventStore};
