//! Plan pipeline data types.
//!
//! The planner wire format is snake_case throughout: `weekly_plan`,
//! `task_name`, `start_time`, `duration_minutes`. Generator models are
//! prompted with exactly this schema, so the field names here are part of
//! the generation contract, not just the HTTP surface.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// User chronotype, steering vague-time interpretation and conflict
/// shifting toward earlier or later hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Chronotype {
    /// Prefers the start of a time window and earlier shifts.
    Morning,
    /// Prefers later shifts.
    Evening,
    /// No preference.
    #[default]
    Neutral,
}

/// Profile block included verbatim in the generation prompt.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UserProfile {
    /// Opaque user identifier.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Chronotype preference.
    #[serde(default)]
    pub chronotype: Chronotype,
    /// IANA timezone name.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Free-form preference map.
    #[serde(default = "default_preferences")]
    pub preferences: serde_json::Value,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_preferences() -> serde_json::Value {
    serde_json::json!({})
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            user_id: None,
            chronotype: Chronotype::Neutral,
            timezone: default_timezone(),
            preferences: default_preferences(),
        }
    }
}

/// One scheduled task in a weekly plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlanItem {
    /// Task name.
    pub task_name: String,
    /// Day of week, canonical three-letter form after normalization.
    #[serde(default)]
    pub day: String,
    /// Start time, `HH:MM` after normalization. Models sometimes emit a
    /// vague phrase here ("evening"); normalization resolves it.
    #[serde(default)]
    pub start_time: String,
    /// Duration in minutes; normalization fills in 60 when absent.
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    /// Recurrence hint, `daily`, `weekly` or `none`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<String>,
    /// Optional location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Optional free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Computed day index, 0 = Mon. Never requested from the model; filled
    /// in during normalization for downstream consumers.
    #[serde(
        rename = "weekdayIndex",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub weekday_index: Option<usize>,
}

/// A dated goal attached to the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Milestone {
    /// Target date, `YYYY-MM-DD`, when the model supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Milestone goal.
    pub goal: String,
}

/// The structured plan a generator is asked to produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeeklyPlan {
    /// Scheduled tasks across the week.
    pub weekly_plan: Vec<PlanItem>,
    /// Dated goals.
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

/// Plan request body.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PlanRequest {
    /// What the user wants to achieve.
    pub goal: String,
    /// Profile steering generation; defaults apply when absent.
    #[serde(default)]
    pub profile: Option<UserProfile>,
    /// Busy intervals as `start/end` RFC 3339 pairs. When absent the
    /// caller's stored events are used instead.
    #[serde(default)]
    pub busy_intervals: Option<Vec<String>>,
}

/// Terminal state of a plan pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// Plan generated, normalized, conflict-checked.
    Ok,
    /// The generator output contained no parsable JSON object.
    InvalidJson,
    /// The output parsed but did not match the plan structure.
    Error,
}

/// Diagnostic metadata accompanying every plan response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlanMetadata {
    /// Label of the generator that produced the raw text.
    pub model_used: String,
    /// Raw generator output before extraction and repair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
    /// Conflicts against busy intervals before shifting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflicts_before: Option<usize>,
    /// Conflicts remaining after shifting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflicts_after: Option<usize>,
    /// Terminal pipeline state.
    pub status: PlanStatus,
}

/// Full plan pipeline result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlanResponse {
    /// True when `output` carries a usable plan.
    pub success: bool,
    /// The normalized, conflict-resolved plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<WeeklyPlan>,
    /// Failure reason when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Run diagnostics.
    pub metadata: PlanMetadata,
}
