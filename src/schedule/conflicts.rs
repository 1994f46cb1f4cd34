//! Interval-overlap conflict detection and alternative-slot suggestion.
//!
//! Overlap is computed on half-open intervals: `[s1,e1)` and `[s2,e2)`
//! overlap iff `s1 < e2 AND s2 < e1`, so touching intervals never conflict.
//! Classification and suggestion generation are pure functions; the only
//! wall-clock dependence is the past-slot guard, which the `_at` variants
//! take as a parameter.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::config::ConflictConfig;
use crate::schedule::types::{
    CandidateEvent, Conflict, ConflictReport, Event, OverlapKind, Suggestion,
};

/// Conflict detector over a snapshot of existing events.
///
/// Stateless beyond configuration; safe to share across request handlers.
pub struct ConflictDetector {
    config: ConflictConfig,
}

impl Default for ConflictDetector {
    fn default() -> Self {
        Self::new(ConflictConfig::default())
    }
}

impl ConflictDetector {
    /// Create a detector with the given configuration.
    pub fn new(config: ConflictConfig) -> Self {
        Self { config }
    }

    /// Configured cap on returned suggestions.
    pub fn max_suggestions(&self) -> usize {
        self.config.max_suggestions
    }

    /// Check a candidate against existing events, classifying every overlap.
    ///
    /// An existing event sharing the candidate's own id (update scenario) is
    /// excluded from comparison.
    pub fn check_conflicts(&self, candidate: &CandidateEvent, existing: &[Event]) -> ConflictReport {
        let conflicts: Vec<Conflict> = existing
            .iter()
            .filter(|event| candidate.id.as_deref() != Some(event.id.as_str()))
            .filter(|event| candidate.overlaps(event))
            .map(|event| Conflict {
                event: event.clone(),
                overlap_type: classify_overlap(candidate.start, candidate.end, event.start, event.end),
            })
            .collect();

        debug!(
            "Conflict check for '{}': {} of {} events overlap",
            candidate.summary,
            conflicts.len(),
            existing.len()
        );
        ConflictReport::from_conflicts(conflicts)
    }

    /// Propose alternative windows against the current instant, capped by
    /// the configured maximum.
    pub fn suggest_alternatives(
        &self,
        candidate: &CandidateEvent,
        existing: &[Event],
    ) -> Vec<Suggestion> {
        self.suggest_alternatives_at(candidate, existing, self.config.max_suggestions, Utc::now())
    }

    /// Propose alternative windows with a caller-supplied cap and "now".
    pub fn suggest_alternatives_at(
        &self,
        candidate: &CandidateEvent,
        existing: &[Event],
        max_suggestions: usize,
        now: DateTime<Utc>,
    ) -> Vec<Suggestion> {
        let report = self.check_conflicts(candidate, existing);
        self.suggest_from_conflicts(&report.conflicts, candidate.duration(), max_suggestions, now)
    }

    /// Propose alternative windows from an already-computed conflict list.
    ///
    /// Windows of the requested duration are taken from the gaps between
    /// adjacent conflicting events, from before the first one (future slots
    /// only), and from after the last one. The after-last window is not
    /// re-checked against events outside the conflict list, so it can
    /// collide with an unrelated event.
    pub fn suggest_from_conflicts(
        &self,
        conflicts: &[Conflict],
        duration: Duration,
        max_suggestions: usize,
        now: DateTime<Utc>,
    ) -> Vec<Suggestion> {
        if conflicts.is_empty() {
            return Vec::new();
        }

        let mut events: Vec<&Event> = conflicts.iter().map(|c| &c.event).collect();
        events.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then(a.end.cmp(&b.end))
                .then(a.id.cmp(&b.id))
        });

        let mut suggestions = Vec::new();

        // Gaps between adjacent conflicting events
        for pair in events.windows(2) {
            let earlier = pair[0];
            let later = pair[1];
            let gap = later.start - earlier.end;
            if gap >= duration {
                suggestions.push(Suggestion::new(
                    earlier.end,
                    earlier.end + duration,
                    format!("After \"{}\"", earlier.summary),
                ));
            }
        }

        // Before the first conflicting event
        let first = events[0];
        let before_start = first.start - duration;
        if before_start > now {
            suggestions.push(Suggestion::new(
                before_start,
                first.start,
                format!("Before \"{}\"", first.summary),
            ));
        }

        // After the last conflicting event
        let last = events[events.len() - 1];
        suggestions.push(Suggestion::new(
            last.end,
            last.end + duration,
            format!("After \"{}\"", last.summary),
        ));

        // Past slots are never suggested; output is sorted by start, not by
        // discovery order
        suggestions.retain(|s| s.start > now);
        suggestions.sort_by_key(|s| s.start);
        suggestions.truncate(max_suggestions);
        suggestions
    }
}

/// Classify how the candidate interval `[s1,e1)` intersects an existing
/// `[s2,e2)`.
///
/// Containment is tested before the partial cases so a fully-containing
/// relationship is never miscategorized; `full` is tested first so exact
/// interval equality classifies as `full`.
fn classify_overlap(
    s1: DateTime<Utc>,
    e1: DateTime<Utc>,
    s2: DateTime<Utc>,
    e2: DateTime<Utc>,
) -> OverlapKind {
    if s2 <= s1 && e2 >= e1 {
        OverlapKind::Full
    } else if s1 <= s2 && e1 >= e2 {
        OverlapKind::Contains
    } else if s1 < s2 && e1 > s2 && e1 < e2 {
        OverlapKind::PartialStart
    } else if s1 > s2 && s1 < e2 && e1 > e2 {
        OverlapKind::PartialEnd
    } else {
        OverlapKind::Partial
    }
}
