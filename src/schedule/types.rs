//! Scheduling types for event parsing and conflict detection.
//!
//! This module defines the core types shared by the text parser and the
//! conflict detector: persisted events, transient parse candidates, and the
//! report structures the HTTP layer serializes. Field names on the wire
//! (`hasConflict`, `overlapType`, `duration`, ...) are a contract other
//! layers depend on and must not change.

use chrono::{DateTime, Duration, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Persisted Events
// ============================================================================

/// A stored calendar event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique identifier for the event.
    pub id: String,
    /// Event summary (non-empty, trimmed).
    pub summary: String,
    /// Start instant, UTC.
    pub start: DateTime<Utc>,
    /// End instant, UTC. Always strictly after `start` once persisted.
    pub end: DateTime<Utc>,
    /// Free-text description; defaults to the sentence the event came from.
    #[serde(default)]
    pub description: String,
    /// Location of the event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// When the event was created.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// When the event was last updated.
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Create a new event with a fresh id.
    pub fn new(summary: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            summary: summary.into(),
            start,
            end,
            description: String::new(),
            location: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create an event with a specific id.
    pub fn with_id(
        id: impl Into<String>,
        summary: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        let mut event = Self::new(summary, start, end);
        event.id = id.into();
        event
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Event length.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Event length in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// Half-open interval overlap with another event.
    pub fn overlaps_with(&self, other: &Event) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Partial update applied to a stored event.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    /// New summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// New start instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    /// New end instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl EventPatch {
    /// Apply the patch to an event, refreshing its update timestamp.
    pub fn apply_to(&self, event: &mut Event) {
        if let Some(summary) = &self.summary {
            event.summary = summary.clone();
        }
        if let Some(start) = self.start {
            event.start = start;
        }
        if let Some(end) = self.end {
            event.end = end;
        }
        if let Some(description) = &self.description {
            event.description = description.clone();
        }
        if let Some(location) = &self.location {
            event.location = Some(location.clone());
        }
        event.updated_at = Utc::now();
    }

    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.description.is_none()
            && self.location.is_none()
    }
}

// ============================================================================
// Parse Candidates
// ============================================================================

/// Transient candidate produced by the text parser, not yet persisted.
///
/// Same shape as [`Event`] minus id and timestamps, plus the computed
/// duration. The parser always fills `start`/`end`; they stay optional so
/// externally supplied drafts can flow through validation too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ParsedEvent {
    /// Extracted summary.
    pub summary: String,
    /// Resolved start instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    /// Resolved end instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    /// Resolved duration in minutes.
    #[serde(rename = "duration")]
    pub duration_minutes: i64,
    /// Original input sentence.
    #[serde(default)]
    pub description: String,
    /// Location, when the caller supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Outcome of validating a [`ParsedEvent`] before persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationReport {
    /// True when no problems were found.
    pub valid: bool,
    /// Human-readable reasons, all of them, not just the first.
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// A passing report.
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    /// A failing report from collected reasons.
    pub fn failed(errors: Vec<String>) -> Self {
        Self {
            valid: false,
            errors,
        }
    }
}

/// The conflict detector's view of a not-yet-persisted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CandidateEvent {
    /// Id of the stored event this candidate replaces, in update scenarios.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Candidate summary.
    pub summary: String,
    /// Candidate start instant.
    pub start: DateTime<Utc>,
    /// Candidate end instant.
    pub end: DateTime<Utc>,
}

impl CandidateEvent {
    /// Build a candidate from raw parts.
    pub fn new(summary: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            id: None,
            summary: summary.into(),
            start,
            end,
        }
    }

    /// Tag the candidate with the id of the event it would replace.
    pub fn with_existing_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// View a stored event as a candidate (update scenario).
    pub fn from_event(event: &Event) -> Self {
        Self {
            id: Some(event.id.clone()),
            summary: event.summary.clone(),
            start: event.start,
            end: event.end,
        }
    }

    /// View a parse result as a candidate. `None` when the parse is missing
    /// either instant; validation reports that case separately.
    pub fn from_parsed(parsed: &ParsedEvent) -> Option<Self> {
        match (parsed.start, parsed.end) {
            (Some(start), Some(end)) => Some(Self {
                id: None,
                summary: parsed.summary.clone(),
                start,
                end,
            }),
            _ => None,
        }
    }

    /// Candidate length.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Half-open interval overlap with a stored event.
    pub fn overlaps(&self, other: &Event) -> bool {
        self.start < other.end && other.start < self.end
    }
}

// ============================================================================
// Conflict Reports
// ============================================================================

/// How a candidate interval intersects an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapKind {
    /// Candidate fully contains the existing event.
    Contains,
    /// Existing event fully contains the candidate (equal intervals too).
    Full,
    /// Candidate starts before and ends inside the existing event.
    PartialStart,
    /// Candidate starts inside and ends after the existing event.
    PartialEnd,
    /// Residual boundary cases.
    Partial,
}

impl OverlapKind {
    /// Wire form of the classification.
    pub fn as_str(&self) -> &'static str {
        match self {
            OverlapKind::Contains => "contains",
            OverlapKind::Full => "full",
            OverlapKind::PartialStart => "partial-start",
            OverlapKind::PartialEnd => "partial-end",
            OverlapKind::Partial => "partial",
        }
    }
}

impl std::fmt::Display for OverlapKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One existing event the candidate overlaps, with its classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    /// The existing event.
    pub event: Event,
    /// How the candidate intersects it.
    pub overlap_type: OverlapKind,
}

/// Result of checking a candidate against the stored collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    /// True when any overlap was found.
    pub has_conflict: bool,
    /// One entry per overlapping existing event.
    pub conflicts: Vec<Conflict>,
}

impl ConflictReport {
    /// Report with no overlaps.
    pub fn clear() -> Self {
        Self {
            has_conflict: false,
            conflicts: Vec::new(),
        }
    }

    /// Report from a collected conflict list.
    pub fn from_conflicts(conflicts: Vec<Conflict>) -> Self {
        Self {
            has_conflict: !conflicts.is_empty(),
            conflicts,
        }
    }
}

/// A proposed alternative window of the candidate's duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Suggestion {
    /// Proposed start instant.
    pub start: DateTime<Utc>,
    /// Proposed end instant.
    pub end: DateTime<Utc>,
    /// Which event the window was derived from, e.g. `After "Standup"`.
    pub reason: String,
}

impl Suggestion {
    /// Build a suggestion window.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, reason: impl Into<String>) -> Self {
        Self {
            start,
            end,
            reason: reason.into(),
        }
    }
}
