//! Plan normalization: vague times, day names, missing durations.
//!
//! Generator output is treated as untrusted draft material. Normalization
//! canonicalizes what it can and leaves the rest for the conflict pass to
//! skip over.

use super::types::{Chronotype, PlanItem};

/// Named daytime windows, checked in declaration order. Substring matching
/// stops at the first hit, so `"early morning"` must precede `"morning"`.
pub const TIME_WINDOWS: &[(&str, (u32, u32))] = &[
    ("early morning", (5, 7)),
    ("morning", (7, 9)),
    ("late morning", (9, 11)),
    ("midday", (11, 13)),
    ("afternoon", (13, 17)),
    ("evening", (18, 21)),
    ("night", (21, 23)),
];

/// Canonical day-of-week order; index 0 is Monday.
pub const WEEK_DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Map a vague time phrase to an hour window.
pub fn interpret_vague_time(token: &str) -> (u32, u32) {
    let token = token.to_lowercase();
    let token = token.trim();

    for (name, window) in TIME_WINDOWS {
        if *name == token {
            return *window;
        }
    }
    if token.contains("weekend") {
        return window_named("morning");
    }
    if token.contains("after work") || token.contains("post-work") {
        return (17, 19);
    }
    for (name, window) in TIME_WINDOWS {
        if token.contains(name) {
            return *window;
        }
    }
    window_named("morning")
}

fn window_named(name: &str) -> (u32, u32) {
    TIME_WINDOWS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, w)| *w)
        .unwrap_or((7, 9))
}

/// Pick a concrete hour inside a window for the given chronotype.
pub fn choose_hour_from_window(window: (u32, u32), chronotype: Chronotype) -> u32 {
    let (start, end) = window;
    let mid = (start + end) / 2;
    match chronotype {
        Chronotype::Morning => start,
        Chronotype::Evening => mid,
        Chronotype::Neutral => mid,
    }
}

/// Format an hour as a zero-padded `HH:00` time.
pub fn hhmm(hour: u32) -> String {
    format!("{:02}:00", hour)
}

/// Canonical three-letter form of a day name, `None` when unrecognized.
pub fn canonical_day(day: &str) -> Option<&'static str> {
    let lower = day.trim().to_lowercase();
    match lower.as_str() {
        "mon" | "monday" => Some("Mon"),
        "tue" | "tuesday" => Some("Tue"),
        "wed" | "wednesday" => Some("Wed"),
        "thu" | "thursday" => Some("Thu"),
        "fri" | "friday" => Some("Fri"),
        "sat" | "saturday" => Some("Sat"),
        "sun" | "sunday" => Some("Sun"),
        _ => None,
    }
}

/// Index of a canonical day within [`WEEK_DAYS`], Monday first.
pub fn weekday_index(day: &str) -> Option<usize> {
    WEEK_DAYS.iter().position(|d| *d == day)
}

/// Normalize plan items in place.
///
/// Fills missing durations with 60 minutes, canonicalizes day names, and
/// resolves vague start times (any start containing a letter) to a concrete
/// hour for the chronotype. Unrecognized days are left untouched; the
/// conflict pass skips them. Writes the computed `weekday_index` for items
/// whose day canonicalized.
pub fn normalize_plan(items: &mut [PlanItem], chronotype: Chronotype) {
    for item in items.iter_mut() {
        if item.duration_minutes.is_none() {
            item.duration_minutes = Some(60);
        }

        if let Some(canonical) = canonical_day(&item.day) {
            item.day = canonical.to_string();
        }
        item.weekday_index = weekday_index(&item.day);

        if item.start_time.chars().any(|c| c.is_ascii_alphabetic()) {
            let window = interpret_vague_time(&item.start_time);
            let hour = choose_hour_from_window(window, chronotype);
            item.start_time = hhmm(hour);
        }
    }
}
