//! Prompt assembly for plan generation.
//!
//! The prompt is plain text in fixed sections joined by blank lines. The
//! schema block doubles as the deserialization contract for
//! [`super::types::WeeklyPlan`], so the two must not drift apart.

use super::normalize::TIME_WINDOWS;
use super::types::UserProfile;

/// System instruction heading every prompt.
pub const PROMPT_SYSTEM: &str = "You are an AI planner. Return ONLY a single valid JSON object \
that matches the schema below. No explanations, no commentary, no markdown fences, no \
surrounding text. Use 24-hour HH:MM times.";

const PROMPT_SCHEMA: &str = r#"{
  "weekly_plan": [
    {
      "task_name": "string",
      "day": "Mon|Tue|...",
      "start_time": "HH:MM",
      "duration_minutes": 0,
      "recurrence": "daily|weekly|none",
      "location": "optional string"
    }
  ],
  "milestones": [
    {
      "date": "YYYY-MM-DD (optional)",
      "goal": "string"
    }
  ]
}"#;

/// One `- "window" -> HH:00-HH:00` line per named time window.
pub fn time_rules() -> String {
    TIME_WINDOWS
        .iter()
        .map(|(name, (start, end))| format!("- \"{}\" -> {:02}:00-{:02}:00", name, start, end))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Assemble the full generation prompt.
pub fn build_prompt(profile: &UserProfile, busy_intervals: &[String], goal: &str) -> String {
    let profile_block =
        serde_json::to_string_pretty(profile).unwrap_or_else(|_| "{}".to_string());
    let busy_block = if busy_intervals.is_empty() {
        "none".to_string()
    } else {
        busy_intervals.join("\n")
    };
    let rules = time_rules();

    let parts = [
        PROMPT_SYSTEM,
        "SCHEMA:",
        PROMPT_SCHEMA,
        "TIME_RULES:",
        &rules,
        "USER_PROFILE:",
        &profile_block,
        "BUSY_INTERVALS:",
        &busy_block,
        "GOAL:",
        goal,
        "OUTPUT: Return a single raw JSON object exactly matching the schema above.",
    ];
    parts.join("\n\n")
}
