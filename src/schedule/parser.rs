//! Rule-based parsing of scheduling sentences into candidate events.
//!
//! The parser runs three independent first-match-wins chains over the input
//! text (date, time, duration), assembles a start/end pair against a
//! reference instant, and extracts a human-readable title. Unmatched
//! patterns never fail; they fall back to defaults, on the principle that a
//! best-effort structured guess beats a hard error for free text. Pattern
//! order within each chain is load-bearing: later patterns are less specific
//! fallbacks.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use regex::Regex;
use tracing::debug;

use crate::config::ParserConfig;
use crate::schedule::types::{ParsedEvent, ValidationReport};

// ============================================================================
// Vocabulary
// ============================================================================

/// Leading verbs that introduce a scheduling request ("set up" spans two
/// tokens and is handled where verbs are matched).
const ACTION_VERBS: &[&str] = &["schedule", "add", "create", "book", "plan", "set"];

/// Articles skipped right after an action verb.
const ARTICLES: &[&str] = &["a", "an", "the"];

/// Words the fallback title path skips without terminating.
const STOPWORDS: &[&str] = &[
    "a", "an", "the", "my", "me", "our", "your", "at", "on", "in", "for", "with", "to", "of",
    "and",
];

/// Duration unit words; hitting one terminates fallback token collection.
const UNIT_WORDS: &[&str] = &[
    "hour", "hours", "hr", "hrs", "h", "minute", "minutes", "min", "mins", "m",
];

/// Date and time keywords; hitting one terminates fallback token collection.
const DATE_KEYWORDS: &[&str] = &[
    "today",
    "tomorrow",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
    "am",
    "pm",
];

// ============================================================================
// Parser
// ============================================================================

/// Rule-based scheduling-sentence parser.
///
/// Stateless beyond configuration; safe to share across request handlers.
pub struct ScheduleParser {
    config: ParserConfig,
    weekday: Regex,
    time_clock: Regex,
    time_meridiem: Regex,
    time_at: Regex,
    duration_combined: Regex,
    duration_minutes: Regex,
    duration_hours: Regex,
    leading_verb: Regex,
    strip_at_time: Regex,
    strip_relative: Regex,
    strip_for_duration: Regex,
    trailing_connector: Regex,
    whitespace: Regex,
}

impl Default for ScheduleParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

impl ScheduleParser {
    /// Create a parser with the given configuration.
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            weekday: Regex::new(r"(?i)\b(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b")
                .expect("Invalid regex"),
            time_clock: Regex::new(r"(?i)\b(\d{1,2}):(\d{2})\s*(am|pm)?\b").expect("Invalid regex"),
            time_meridiem: Regex::new(r"(?i)\b(\d{1,2})\s*(am|pm)\b").expect("Invalid regex"),
            time_at: Regex::new(r"(?i)\bat\s+(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\b")
                .expect("Invalid regex"),
            duration_combined: Regex::new(
                r"(?i)\b(\d+)\s*(?:hours?|hrs?|h)\s*(?:and\s+)?(\d+)\s*(?:minutes?|mins?|m)\b",
            )
            .expect("Invalid regex"),
            duration_minutes: Regex::new(r"(?i)\b(\d+)\s*(?:minutes?|mins?|m)\b")
                .expect("Invalid regex"),
            duration_hours: Regex::new(r"(?i)\b(\d+)\s*(?:hours?|hrs?|h)\b").expect("Invalid regex"),
            leading_verb: Regex::new(
                r"(?i)^\s*(?:schedule|add|create|book|set\s+up|plan|set)\s+(?:(?:a|an|the)\s+)?",
            )
            .expect("Invalid regex"),
            strip_at_time: Regex::new(r"(?i)\bat\s+\d{1,2}(?::\d{2})?\s*(?:am|pm)?\b")
                .expect("Invalid regex"),
            strip_relative: Regex::new(
                r"(?i)\b(?:today|tomorrow|monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b",
            )
            .expect("Invalid regex"),
            strip_for_duration: Regex::new(
                r"(?i)\bfor\s+\d+\s*(?:hours?|hrs?|h|minutes?|mins?|m)\b",
            )
            .expect("Invalid regex"),
            trailing_connector: Regex::new(r"(?i)(?:\s+(?:on|at|for))+[\s,]*$")
                .expect("Invalid regex"),
            whitespace: Regex::new(r"\s+").expect("Invalid regex"),
        }
    }

    /// Parse a scheduling sentence against the current instant.
    pub fn parse(&self, text: &str) -> ParsedEvent {
        self.parse_at(text, Utc::now())
    }

    /// Parse a scheduling sentence against a fixed reference instant.
    pub fn parse_at(&self, text: &str, reference: DateTime<Utc>) -> ParsedEvent {
        let date = self.resolve_date(text, reference);
        let time = self.resolve_time(text);
        let duration_minutes = self.resolve_duration(text);

        let start = match (date, time) {
            (Some(date), Some(time)) => {
                DateTime::from_naive_utc_and_offset(date.and_time(time), Utc)
            }
            (None, Some(time)) => {
                DateTime::from_naive_utc_and_offset(reference.date_naive().and_time(time), Utc)
            }
            // A date without a time keeps the reference instant as the
            // start, discarding the resolved date.
            _ => reference,
        };
        let end = start + Duration::minutes(duration_minutes);

        let summary = self.extract_title(text);
        debug!("Parsed \"{}\" into '{}' starting {}", text, summary, start);

        ParsedEvent {
            summary,
            start: Some(start),
            end: Some(end),
            duration_minutes,
            description: text.to_string(),
            location: None,
        }
    }

    /// Resolve an explicit date mention, if any.
    ///
    /// Checked in order: "today", "tomorrow", then a weekday name mapped to
    /// its next occurrence strictly after the reference date (a reference
    /// already on that weekday rolls a full week).
    fn resolve_date(&self, text: &str, reference: DateTime<Utc>) -> Option<NaiveDate> {
        let lower = text.to_lowercase();
        let reference_date = reference.date_naive();

        if lower.contains("today") {
            return Some(reference_date);
        }
        if lower.contains("tomorrow") {
            return Some(reference_date + Duration::days(1));
        }
        if let Some(cap) = self.weekday.captures(&lower) {
            let target = match &cap[1] {
                "monday" => Weekday::Mon,
                "tuesday" => Weekday::Tue,
                "wednesday" => Weekday::Wed,
                "thursday" => Weekday::Thu,
                "friday" => Weekday::Fri,
                "saturday" => Weekday::Sat,
                "sunday" => Weekday::Sun,
                _ => return None,
            };
            return Some(next_weekday_after(reference_date, target));
        }

        None
    }

    /// Resolve an explicit time mention, if any.
    ///
    /// Checked in order: `H:MM` with optional meridiem, bare `H` with a
    /// required meridiem, then `at H[:MM]` with optional meridiem.
    fn resolve_time(&self, text: &str) -> Option<NaiveTime> {
        if let Some(cap) = self.time_clock.captures(text) {
            if let Some(time) = build_time(
                &cap[1],
                cap.get(2).map(|m| m.as_str()),
                cap.get(3).map(|m| m.as_str()),
            ) {
                return Some(time);
            }
        }
        if let Some(cap) = self.time_meridiem.captures(text) {
            if let Some(time) = build_time(&cap[1], None, Some(&cap[2])) {
                return Some(time);
            }
        }
        if let Some(cap) = self.time_at.captures(text) {
            if let Some(time) = build_time(
                &cap[1],
                cap.get(2).map(|m| m.as_str()),
                cap.get(3).map(|m| m.as_str()),
            ) {
                return Some(time);
            }
        }

        None
    }

    /// Resolve a duration mention in minutes.
    ///
    /// Checked in order: combined "N hours M minutes", minutes only, hours
    /// only. Unmatched input gets the configured default.
    fn resolve_duration(&self, text: &str) -> i64 {
        if let Some(cap) = self.duration_combined.captures(text) {
            if let (Ok(hours), Ok(minutes)) = (cap[1].parse::<i64>(), cap[2].parse::<i64>()) {
                return hours * 60 + minutes;
            }
        }
        if let Some(cap) = self.duration_minutes.captures(text) {
            if let Ok(minutes) = cap[1].parse::<i64>() {
                return minutes;
            }
        }
        if let Some(cap) = self.duration_hours.captures(text) {
            if let Ok(hours) = cap[1].parse::<i64>() {
                return hours * 60;
            }
        }

        i64::from(self.config.default_duration_minutes)
    }

    /// Extract a human-readable summary from the sentence.
    ///
    /// Primary path strips the scheduling scaffolding (verb, time, relative
    /// dates, duration, dangling connectors) and keeps the remainder when
    /// its length is acceptable. Otherwise the tokenization fallback picks
    /// the first few content words after the action verb.
    fn extract_title(&self, text: &str) -> String {
        let stripped = self.leading_verb.replace(text, "");
        let stripped = self.strip_at_time.replace_all(&stripped, " ");
        let stripped = self.strip_relative.replace_all(&stripped, " ");
        let stripped = self.strip_for_duration.replace_all(&stripped, " ");
        let stripped = self.trailing_connector.replace(&stripped, "");
        let collapsed = self.whitespace.replace_all(stripped.trim(), " ");
        let cleaned = collapsed.trim_matches(|c: char| !c.is_alphanumeric());

        if cleaned.len() > self.config.title_min_len && cleaned.len() < self.config.title_max_len {
            return capitalize(cleaned);
        }

        self.tokenize_title(text)
            .unwrap_or_else(|| self.config.fallback_title.clone())
    }

    /// Fallback title path: collect content tokens after the action verb.
    fn tokenize_title(&self, text: &str) -> Option<String> {
        let lower = text.to_lowercase();
        let tokens: Vec<&str> = lower.split_whitespace().collect();

        // Position after the first action verb, start of text when absent
        let mut start = 0;
        for (i, raw) in tokens.iter().enumerate() {
            let token = clean_token(raw);
            if ACTION_VERBS.contains(&token) {
                start = i + 1;
                if token == "set" && tokens.get(start).map(|t| clean_token(t)) == Some("up") {
                    start += 1;
                }
                break;
            }
        }
        if let Some(raw) = tokens.get(start) {
            if ARTICLES.contains(&clean_token(raw)) {
                start += 1;
            }
        }

        let mut collected: Vec<&str> = Vec::new();
        for raw in tokens.iter().skip(start) {
            if collected.len() >= self.config.max_title_tokens {
                break;
            }
            let token = clean_token(raw);
            if token.is_empty() {
                continue;
            }
            if token.starts_with(|c: char| c.is_ascii_digit()) {
                break;
            }
            if UNIT_WORDS.contains(&token) || DATE_KEYWORDS.contains(&token) {
                break;
            }
            if STOPWORDS.contains(&token) {
                continue;
            }
            if token.len() > 2 {
                collected.push(token);
            }
        }

        if collected.is_empty() {
            return None;
        }
        Some(capitalize(&collected.join(" ")))
    }
}

/// Validate a parse result before persistence, collecting every problem.
pub fn validate_event_data(parsed: &ParsedEvent) -> ValidationReport {
    let mut errors = Vec::new();

    if parsed.summary.trim().is_empty() {
        errors.push("Summary is required".to_string());
    }
    if parsed.start.is_none() {
        errors.push("Start time is required".to_string());
    }
    if parsed.end.is_none() {
        errors.push("End time is required".to_string());
    }
    if let (Some(start), Some(end)) = (parsed.start, parsed.end) {
        if end <= start {
            errors.push("End time must be after start time".to_string());
        }
    }

    if errors.is_empty() {
        ValidationReport::ok()
    } else {
        ValidationReport::failed(errors)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Next occurrence of `target` strictly after `reference`; a reference
/// already on the target weekday rolls a full week.
fn next_weekday_after(reference: NaiveDate, target: Weekday) -> NaiveDate {
    let current_num = reference.weekday().num_days_from_monday();
    let target_num = target.num_days_from_monday();

    let days_ahead = if target_num > current_num {
        i64::from(target_num - current_num)
    } else if target_num < current_num {
        i64::from(7 - current_num + target_num)
    } else {
        7
    };

    reference + Duration::days(days_ahead)
}

/// Build a time of day from captured pieces, converting 12-hour values.
fn build_time(hour: &str, minute: Option<&str>, meridiem: Option<&str>) -> Option<NaiveTime> {
    let mut hour: u32 = hour.parse().ok()?;
    let minute: u32 = match minute {
        Some(m) => m.parse().ok()?,
        None => 0,
    };

    if let Some(period) = meridiem {
        let period = period.to_lowercase();
        if period.starts_with('p') && hour != 12 {
            hour += 12;
        } else if period.starts_with('a') && hour == 12 {
            hour = 0;
        }
    }

    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Strip punctuation from token edges.
fn clean_token(raw: &str) -> &str {
    raw.trim_matches(|c: char| !c.is_alphanumeric())
}

/// Upper-case the first letter, leaving the rest untouched.
fn capitalize(text: &str) -> String {
    match text.chars().next() {
        Some(first) => first.to_uppercase().to_string() + &text[first.len_utf8()..],
        None => String::new(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn parser() -> ScheduleParser {
        ScheduleParser::default()
    }

    fn instant(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn date(y: i32, mo: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, mo, d).unwrap()
    }

    #[test]
    fn test_meeting_tomorrow_at_two() {
        let reference = instant(2024, 1, 14, 10, 0);
        let parsed = parser().parse_at("Schedule a meeting tomorrow at 2pm for 1 hour", reference);

        assert_eq!(parsed.summary, "Meeting");
        assert_eq!(parsed.start, Some(instant(2024, 1, 15, 14, 0)));
        assert_eq!(parsed.end, Some(instant(2024, 1, 15, 15, 0)));
        assert_eq!(parsed.duration_minutes, 60);
        assert_eq!(parsed.description, "Schedule a meeting tomorrow at 2pm for 1 hour");
    }

    #[test]
    fn test_today_resolves_reference_date() {
        let reference = instant(2024, 1, 14, 10, 0);
        let resolved = parser().resolve_date("standup today", reference);
        assert_eq!(resolved, Some(date(2024, 1, 14)));
    }

    #[test]
    fn test_tomorrow_rolls_over_month_and_year() {
        let p = parser();
        assert_eq!(
            p.resolve_date("call tomorrow", instant(2024, 1, 31, 8, 0)),
            Some(date(2024, 2, 1))
        );
        assert_eq!(
            p.resolve_date("call tomorrow", instant(2024, 12, 31, 8, 0)),
            Some(date(2025, 1, 1))
        );
        // End-to-end: the assembled start lands on the rolled-over date
        let parsed = p.parse_at("call tomorrow at 9am", instant(2024, 1, 31, 8, 0));
        assert_eq!(parsed.start, Some(instant(2024, 2, 1, 9, 0)));
    }

    #[test]
    fn test_weekday_matches_name_and_never_same_day() {
        let p = parser();
        // 2024-01-15 is a Monday
        let reference = instant(2024, 1, 15, 9, 0);
        let names = [
            ("monday", Weekday::Mon),
            ("tuesday", Weekday::Tue),
            ("wednesday", Weekday::Wed),
            ("thursday", Weekday::Thu),
            ("friday", Weekday::Fri),
            ("saturday", Weekday::Sat),
            ("sunday", Weekday::Sun),
        ];
        for (name, weekday) in names {
            let text = format!("review on {}", name);
            let resolved = p.resolve_date(&text, reference).unwrap();
            assert_eq!(resolved.weekday(), weekday, "wrong weekday for {}", name);
            assert!(resolved > reference.date_naive(), "{} resolved same-day", name);
        }
        // A reference already on the named weekday rolls a full week
        assert_eq!(
            p.resolve_date("sync on monday", reference),
            Some(date(2024, 1, 22))
        );
    }

    #[test]
    fn test_weekday_is_case_insensitive() {
        let reference = instant(2024, 1, 15, 9, 0);
        let resolved = parser().resolve_date("Lunch FRIDAY", reference);
        assert_eq!(resolved, Some(date(2024, 1, 19)));
    }

    #[test]
    fn test_time_patterns_in_priority_order() {
        let p = parser();
        assert_eq!(p.resolve_time("at 9:30"), NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(p.resolve_time("9:30pm call"), NaiveTime::from_hms_opt(21, 30, 0));
        assert_eq!(p.resolve_time("dinner 7pm"), NaiveTime::from_hms_opt(19, 0, 0));
        assert_eq!(p.resolve_time("meet at 5"), NaiveTime::from_hms_opt(5, 0, 0));
        assert_eq!(p.resolve_time("meet at 5:45pm"), NaiveTime::from_hms_opt(17, 45, 0));
        assert_eq!(p.resolve_time("no time here"), None);
    }

    #[test]
    fn test_noon_and_midnight_conversion() {
        let p = parser();
        assert_eq!(p.resolve_time("lunch 12pm"), NaiveTime::from_hms_opt(12, 0, 0));
        assert_eq!(p.resolve_time("flight 12am"), NaiveTime::from_hms_opt(0, 0, 0));
        assert_eq!(p.resolve_time("call 12:30am"), NaiveTime::from_hms_opt(0, 30, 0));
    }

    #[test]
    fn test_duration_patterns_in_priority_order() {
        let p = parser();
        assert_eq!(p.resolve_duration("for 1 hour and 30 minutes"), 90);
        assert_eq!(p.resolve_duration("block 2h 15m"), 135);
        assert_eq!(p.resolve_duration("for 90 minutes"), 90);
        assert_eq!(p.resolve_duration("for 45 min"), 45);
        assert_eq!(p.resolve_duration("for 2 hours"), 120);
        assert_eq!(p.resolve_duration("for 1 hour"), 60);
        assert_eq!(p.resolve_duration("no duration"), 60);
    }

    #[test]
    fn test_date_without_time_collapses_to_reference() {
        // Pins the fallback: the date resolves, yet the assembled start is
        // the reference instant itself.
        let reference = instant(2024, 1, 14, 10, 30);
        let p = parser();

        assert_eq!(
            p.resolve_date("dentist appointment tomorrow", reference),
            Some(date(2024, 1, 15))
        );
        let parsed = p.parse_at("dentist appointment tomorrow", reference);
        assert_eq!(parsed.start, Some(reference));
        assert_eq!(parsed.end, Some(reference + Duration::minutes(60)));
    }

    #[test]
    fn test_time_without_date_uses_reference_date() {
        let reference = instant(2024, 1, 14, 10, 0);
        let parsed = parser().parse_at("standup at 9am", reference);
        // Resolves on the reference date even though 9am already passed
        assert_eq!(parsed.start, Some(instant(2024, 1, 14, 9, 0)));
    }

    #[test]
    fn test_no_date_no_time_falls_back_to_reference() {
        let reference = instant(2024, 1, 14, 10, 0);
        let parsed = parser().parse_at("quick catch-up", reference);
        assert_eq!(parsed.start, Some(reference));
        assert_eq!(parsed.duration_minutes, 60);
    }

    #[test]
    fn test_title_strips_scheduling_scaffolding() {
        let p = parser();
        let reference = instant(2024, 1, 14, 10, 0);
        let cases = [
            ("Schedule a meeting tomorrow at 2pm for 1 hour", "Meeting"),
            ("Book the conference room for 2 hours on friday", "Conference room"),
            ("Set up a sync with design for 30 minutes", "Sync with design"),
            ("plan sprint review on thursday at 11am", "Sprint review"),
        ];
        for (text, expected) in cases {
            assert_eq!(p.parse_at(text, reference).summary, expected, "for {:?}", text);
        }
    }

    #[test]
    fn test_title_tokenization_fallback() {
        let reference = instant(2024, 1, 14, 10, 0);
        // Remainder "gym" is too short for the primary path
        let parsed = parser().parse_at("Add gym at 6am", reference);
        assert_eq!(parsed.summary, "Gym");
    }

    #[test]
    fn test_title_placeholder_when_nothing_qualifies() {
        let reference = instant(2024, 1, 14, 10, 0);
        let parsed = parser().parse_at("at 5", reference);
        assert_eq!(parsed.summary, "New Event");
    }

    #[test]
    fn test_parse_is_idempotent() {
        let reference = instant(2024, 1, 14, 10, 0);
        let p = parser();
        let text = "Schedule a design review friday at 3pm for 45 minutes";
        assert_eq!(p.parse_at(text, reference), p.parse_at(text, reference));
    }

    #[test]
    fn test_custom_config_defaults() {
        let config = ParserConfig {
            default_duration_minutes: 30,
            fallback_title: "Untitled".to_string(),
            ..ParserConfig::default()
        };
        let p = ScheduleParser::new(config);
        let parsed = p.parse_at("at 5", instant(2024, 1, 14, 10, 0));
        assert_eq!(parsed.duration_minutes, 30);
        assert_eq!(parsed.summary, "Untitled");
    }

    #[test]
    fn test_validate_collects_every_error() {
        let empty = ParsedEvent {
            summary: "  ".to_string(),
            start: None,
            end: None,
            duration_minutes: 60,
            description: String::new(),
            location: None,
        };
        let report = validate_event_data(&empty);
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 3);

        let inverted = ParsedEvent {
            summary: "Meeting".to_string(),
            start: Some(instant(2024, 1, 15, 15, 0)),
            end: Some(instant(2024, 1, 15, 14, 0)),
            duration_minutes: 60,
            description: String::new(),
            location: None,
        };
        let report = validate_event_data(&inverted);
        assert_eq!(report.errors, vec!["End time must be after start time".to_string()]);
    }

    #[test]
    fn test_validate_rejects_zero_length_event() {
        let start = instant(2024, 1, 15, 14, 0);
        let parsed = ParsedEvent {
            summary: "Meeting".to_string(),
            start: Some(start),
            end: Some(start),
            duration_minutes: 0,
            description: String::new(),
            location: None,
        };
        assert!(!validate_event_data(&parsed).valid);
    }

    #[test]
    fn test_validate_passes_parser_output() {
        let parsed = parser().parse_at(
            "Schedule a meeting tomorrow at 2pm for 1 hour",
            instant(2024, 1, 14, 10, 0),
        );
        assert!(validate_event_data(&parsed).valid);
    }
}
