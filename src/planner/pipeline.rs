//! Plan pipeline: prompt, generate, repair, normalize, resolve conflicts.
//!
//! Generator failures (spawn, timeout, nonzero exit) surface as errors.
//! Unusable generator *output* does not: the pipeline still answers, with
//! `success: false` and the raw text preserved in metadata so callers can
//! see what the model actually said.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use tracing::{debug, info};

use crate::config::PlannerConfig;
use crate::error::{PlannerError, Result};

use super::conflicts::{next_week_start, parse_busy_intervals, plan_conflicts, resolve_by_shifting};
use super::create_generator;
use super::generator::PlanGenerator;
use super::normalize::{normalize_plan, weekday_index};
use super::prompt::build_prompt;
use super::repair::JsonRepairer;
use super::types::{PlanMetadata, PlanResponse, PlanStatus, UserProfile, WeeklyPlan};

/// Orchestrates a full plan generation run.
pub struct PlanPipeline {
    generator: Option<Arc<dyn PlanGenerator>>,
    repairer: JsonRepairer,
    config: PlannerConfig,
}

impl PlanPipeline {
    /// Create a pipeline with an explicit generator.
    pub fn new(generator: Option<Arc<dyn PlanGenerator>>, config: PlannerConfig) -> Self {
        Self {
            generator,
            repairer: JsonRepairer::new(),
            config,
        }
    }

    /// Create a pipeline from configuration, wiring up the subprocess
    /// generator when a worker command is configured.
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(create_generator(config), config.clone())
    }

    /// Whether a generator is wired up at all.
    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// Generate a plan anchored to the week after today.
    pub async fn generate_plan(
        &self,
        goal: &str,
        profile: &UserProfile,
        busy_intervals: &[String],
    ) -> Result<PlanResponse> {
        self.generate_plan_at(goal, profile, busy_intervals, Utc::now().date_naive())
            .await
    }

    /// Generate a plan anchored to the week after the given date.
    pub async fn generate_plan_at(
        &self,
        goal: &str,
        profile: &UserProfile,
        busy_intervals: &[String],
        today: NaiveDate,
    ) -> Result<PlanResponse> {
        let generator = self
            .generator
            .as_ref()
            .ok_or(PlannerError::NoGenerator)?;

        let prompt = build_prompt(profile, busy_intervals, goal);
        debug!("Generating plan for goal '{}'", goal);
        let raw_text = generator.generate(&prompt).await?;

        let parsed = match self.repairer.repair_and_validate(&raw_text) {
            Some(value) => value,
            None => {
                info!("Plan generator output contained no parsable JSON");
                return Ok(PlanResponse {
                    success: false,
                    output: None,
                    error: Some("Failed to parse JSON from model output".to_string()),
                    metadata: PlanMetadata {
                        model_used: generator.label().to_string(),
                        raw_text: Some(raw_text),
                        conflicts_before: None,
                        conflicts_after: None,
                        status: PlanStatus::InvalidJson,
                    },
                });
            }
        };

        let mut plan: WeeklyPlan = match serde_json::from_value(parsed) {
            Ok(plan) => plan,
            Err(e) => {
                info!("Plan generator output did not match the plan schema: {}", e);
                return Ok(PlanResponse {
                    success: false,
                    output: None,
                    error: Some(format!("Plan structure invalid: {}", e)),
                    metadata: PlanMetadata {
                        model_used: generator.label().to_string(),
                        raw_text: Some(raw_text),
                        conflicts_before: None,
                        conflicts_after: None,
                        status: PlanStatus::Error,
                    },
                });
            }
        };

        normalize_plan(&mut plan.weekly_plan, profile.chronotype);

        let busy = parse_busy_intervals(busy_intervals);
        let ref_week_start = next_week_start(today);
        let hour_bounds = (self.config.earliest_hour, self.config.latest_hour);

        let conflicts_before = plan_conflicts(&plan.weekly_plan, &busy, ref_week_start);
        for conflict in &conflicts_before {
            let item = &mut plan.weekly_plan[conflict.item_index];
            let day_offset = match weekday_index(&item.day) {
                Some(idx) => idx as i64,
                None => continue,
            };
            let target_date = ref_week_start + Duration::days(day_offset);
            resolve_by_shifting(item, &busy, target_date, profile.chronotype, hour_bounds);
        }
        let conflicts_after = plan_conflicts(&plan.weekly_plan, &busy, ref_week_start);

        info!(
            "Plan generated: {} items, {} conflicts before shifting, {} after",
            plan.weekly_plan.len(),
            conflicts_before.len(),
            conflicts_after.len()
        );
        Ok(PlanResponse {
            success: true,
            output: Some(plan),
            error: None,
            metadata: PlanMetadata {
                model_used: generator.label().to_string(),
                raw_text: Some(raw_text),
                conflicts_before: Some(conflicts_before.len()),
                conflicts_after: Some(conflicts_after.len()),
                status: PlanStatus::Ok,
            },
        })
    }
}
