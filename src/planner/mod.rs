//! Weekly plan generation module.
//!
//! Turns a free-form goal into a structured weekly plan via an external
//! generator model, then makes the result trustworthy:
//!
//! - [`SubprocessGenerator`]: model inference in a worker process, JSON on
//!   stdin, raw text on stdout
//! - [`JsonRepairer`]: extraction and mechanical repair of the JSON object
//!   buried in model output
//! - Normalization: vague times, day names, missing durations
//! - Conflict resolution: shift plan items off busy intervals by whole
//!   hours, honoring the user's chronotype
//!
//! The pipeline never trusts the model: every run carries metadata with
//! the raw output and conflict counts, and unusable output degrades to a
//! `success: false` response instead of an error.

mod conflicts;
mod generator;
mod normalize;
mod pipeline;
mod prompt;
mod repair;
mod types;

pub use conflicts::{
    next_week_start, parse_busy_intervals, plan_conflicts, resolve_by_shifting, BusyInterval,
    PlanConflict,
};
pub use generator::{PlanGenerator, SubprocessGenerator};
pub use normalize::{
    canonical_day, choose_hour_from_window, hhmm, interpret_vague_time, normalize_plan,
    weekday_index, TIME_WINDOWS, WEEK_DAYS,
};
pub use pipeline::PlanPipeline;
pub use prompt::{build_prompt, time_rules, PROMPT_SYSTEM};
pub use repair::JsonRepairer;
pub use types::{
    Chronotype, Milestone, PlanItem, PlanMetadata, PlanRequest, PlanResponse, PlanStatus,
    UserProfile, WeeklyPlan,
};

use std::sync::Arc;

use crate::config::PlannerConfig;

/// Create a plan generator from configuration, `None` when planning is
/// not configured.
pub fn create_generator(config: &PlannerConfig) -> Option<Arc<dyn PlanGenerator>> {
    SubprocessGenerator::from_config(config).map(|g| Arc::new(g) as Arc<dyn PlanGenerator>)
}
