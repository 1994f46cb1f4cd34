//! Scheduling coordinator that wires the parser, conflict detector, event
//! store and plan pipeline into the operations the CLI and HTTP API expose.
//!
//! The coordinator owns policy: what gets persisted, when conflicts block
//! a request, and which instant counts as "now" for suggestion filtering.
//! The modules underneath stay pure and take that instant as a parameter.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{CadenceError, Result};
use crate::planner::{PlanPipeline, PlanResponse, UserProfile};
use crate::schedule::types::{
    CandidateEvent, ConflictReport, Event, EventPatch, ParsedEvent, Suggestion,
};
use crate::schedule::{validate_event_data, ConflictDetector, ScheduleParser};
use crate::store::{EventStore, FileEventStore};

/// Outcome of a schedule request.
#[derive(Debug, Clone)]
pub enum ScheduleOutcome {
    /// The event cleared conflict checking and was persisted.
    Scheduled(Event),
    /// Overlapping events blocked persistence.
    Conflicted {
        /// What the text parsed to.
        parsed: ParsedEvent,
        /// The overlaps that blocked it.
        report: ConflictReport,
        /// Alternative windows near the conflicts.
        suggestions: Vec<Suggestion>,
    },
}

/// Dry-run result of a conflict check; nothing is persisted.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    /// What the text parsed to.
    pub parsed: ParsedEvent,
    /// Overlaps against the stored collection.
    pub report: ConflictReport,
    /// Alternative windows, empty when there is no conflict.
    pub suggestions: Vec<Suggestion>,
}

/// The main scheduling coordinator.
pub struct Scheduler {
    config: Config,
    parser: ScheduleParser,
    detector: ConflictDetector,
    store: Arc<dyn EventStore>,
    planner: PlanPipeline,
}

impl Scheduler {
    /// Create a scheduler from configuration, opening the configured store.
    pub fn new(config: Config) -> Result<Self> {
        let store: Arc<dyn EventStore> = Arc::new(FileEventStore::open(config.data_file())?);
        Ok(Self::with_store(config, store))
    }

    /// Create a scheduler over an existing store.
    pub fn with_store(config: Config, store: Arc<dyn EventStore>) -> Self {
        let parser = ScheduleParser::new(config.parser.clone());
        let detector = ConflictDetector::new(config.conflict.clone());
        let planner = PlanPipeline::from_config(&config.planner);
        Self {
            config,
            parser,
            detector,
            store,
            planner,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether plan generation is configured.
    pub fn can_plan(&self) -> bool {
        self.planner.has_generator()
    }

    // ===== Parsing =====

    /// Parse scheduling text against the current instant.
    pub fn parse(&self, text: &str) -> ParsedEvent {
        self.parser.parse(text)
    }

    /// Parse scheduling text against an explicit reference instant.
    pub fn parse_at(&self, text: &str, reference: DateTime<Utc>) -> ParsedEvent {
        self.parser.parse_at(text, reference)
    }

    // ===== Scheduling =====

    /// Parse, validate, conflict-check and persist in one step.
    pub async fn schedule_text(&self, text: &str) -> Result<ScheduleOutcome> {
        self.schedule_text_at(text, Utc::now()).await
    }

    /// Like [`Self::schedule_text`] with an explicit reference instant,
    /// which also serves as "now" for suggestion filtering.
    pub async fn schedule_text_at(
        &self,
        text: &str,
        reference: DateTime<Utc>,
    ) -> Result<ScheduleOutcome> {
        let (parsed, candidate) = self.parse_candidate(text, reference)?;

        let existing = self.store.list_events().await?;
        let report = self.detector.check_conflicts(&candidate, &existing);
        if report.has_conflict {
            let suggestions = self.detector.suggest_from_conflicts(
                &report.conflicts,
                candidate.duration(),
                self.config.conflict.max_suggestions,
                reference,
            );
            info!(
                "Conflicts blocked '{}': {} overlapping events",
                candidate.summary,
                report.conflicts.len()
            );
            return Ok(ScheduleOutcome::Conflicted {
                parsed,
                report,
                suggestions,
            });
        }

        let event = Event::new(parsed.summary.clone(), candidate.start, candidate.end)
            .with_description(parsed.description.clone());
        let event = self.store.create_event(event).await?;
        info!("Scheduled '{}' starting {}", event.summary, event.start);
        Ok(ScheduleOutcome::Scheduled(event))
    }

    /// Conflict-check scheduling text without persisting anything.
    pub async fn check_text(&self, text: &str) -> Result<CheckOutcome> {
        self.check_text_at(text, Utc::now()).await
    }

    /// Like [`Self::check_text`] with an explicit reference instant.
    pub async fn check_text_at(
        &self,
        text: &str,
        reference: DateTime<Utc>,
    ) -> Result<CheckOutcome> {
        let (parsed, candidate) = self.parse_candidate(text, reference)?;

        let existing = self.store.list_events().await?;
        let report = self.detector.check_conflicts(&candidate, &existing);
        let suggestions = if report.has_conflict {
            self.detector.suggest_from_conflicts(
                &report.conflicts,
                candidate.duration(),
                self.config.conflict.max_suggestions,
                reference,
            )
        } else {
            Vec::new()
        };

        Ok(CheckOutcome {
            parsed,
            report,
            suggestions,
        })
    }

    fn parse_candidate(
        &self,
        text: &str,
        reference: DateTime<Utc>,
    ) -> Result<(ParsedEvent, CandidateEvent)> {
        let parsed = self.parser.parse_at(text, reference);
        debug!("Parsed '{}' -> '{}'", text, parsed.summary);

        let validation = validate_event_data(&parsed);
        if !validation.valid {
            return Err(CadenceError::validation(validation.errors));
        }
        let candidate = CandidateEvent::from_parsed(&parsed)
            .ok_or_else(|| CadenceError::validation(vec!["Start time is required".to_string()]))?;
        Ok((parsed, candidate))
    }

    // ===== Event CRUD =====

    /// All stored events, sorted by start.
    pub async fn list_events(&self) -> Result<Vec<Event>> {
        self.store.list_events().await
    }

    /// Fetch one event.
    pub async fn get_event(&self, id: &str) -> Result<Option<Event>> {
        self.store.get_event(id).await
    }

    /// Validate and persist an explicitly constructed event.
    pub async fn add_event(&self, event: Event) -> Result<Event> {
        let mut errors = Vec::new();
        if event.summary.trim().is_empty() {
            errors.push("Summary is required".to_string());
        }
        if event.end <= event.start {
            errors.push("End time must be after start time".to_string());
        }
        if !errors.is_empty() {
            return Err(CadenceError::validation(errors));
        }
        self.store.create_event(event).await
    }

    /// Patch a stored event.
    pub async fn update_event(&self, id: &str, patch: EventPatch) -> Result<Event> {
        self.store.update_event(id, patch).await
    }

    /// Delete a stored event.
    pub async fn delete_event(&self, id: &str) -> Result<()> {
        self.store.delete_event(id).await
    }

    // ===== Planning =====

    /// Generate a weekly plan for a goal. Busy intervals default to the
    /// stored events when the caller does not supply an override.
    pub async fn plan(
        &self,
        goal: &str,
        profile: &UserProfile,
        busy_override: Option<Vec<String>>,
    ) -> Result<PlanResponse> {
        let busy = match busy_override {
            Some(busy) => busy,
            None => self.busy_intervals().await?,
        };
        self.planner.generate_plan(goal, profile, &busy).await
    }

    /// Stored events rendered as `start/end` interval strings.
    pub async fn busy_intervals(&self) -> Result<Vec<String>> {
        let events = self.store.list_events().await?;
        Ok(events
            .iter()
            .map(|e| {
                format!(
                    "{}/{}",
                    e.start.to_rfc3339_opts(SecondsFormat::Secs, true),
                    e.end.to_rfc3339_opts(SecondsFormat::Secs, true)
                )
            })
            .collect())
    }
}
