//! Plan-item conflict detection against busy intervals, with shift-based
//! resolution.
//!
//! Plan items live on a day-of-week grid anchored to a reference week
//! start (a Monday). Busy intervals arrive as `start/end` pairs of ISO
//! instants; offsets are dropped and wall-clock times compared, since the
//! whole pipeline runs in the user's timezone.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use super::normalize::{hhmm, weekday_index};
use super::types::{Chronotype, PlanItem};

/// A parsed busy interval.
#[derive(Debug, Clone, PartialEq)]
pub struct BusyInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// One plan item overlapping one busy interval. An item overlapping
/// several intervals appears once per interval.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanConflict {
    /// Index of the item in the plan.
    pub item_index: usize,
    /// The busy interval it collides with.
    pub busy: BusyInterval,
}

fn parse_instant(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    s.parse::<NaiveDateTime>().ok()
}

/// Parse `start/end` interval strings, silently skipping malformed ones.
pub fn parse_busy_intervals(raw: &[String]) -> Vec<BusyInterval> {
    raw.iter()
        .filter_map(|entry| {
            let (start_str, end_str) = entry.split_once('/')?;
            Some(BusyInterval {
                start: parse_instant(start_str)?,
                end: parse_instant(end_str)?,
            })
        })
        .collect()
}

/// Monday of the week after the given date. A Monday maps to the Monday
/// seven days later, never to itself.
pub fn next_week_start(today: NaiveDate) -> NaiveDate {
    let days_ahead = 7 - i64::from(today.weekday().num_days_from_monday());
    today + Duration::days(days_ahead)
}

/// Find every (item, busy interval) collision on the reference week.
///
/// Items with an unrecognized day or an unparsable start time are skipped,
/// not failed; they simply cannot collide.
pub fn plan_conflicts(
    items: &[PlanItem],
    busy: &[BusyInterval],
    ref_week_start: NaiveDate,
) -> Vec<PlanConflict> {
    let mut conflicts = Vec::new();

    for (item_index, item) in items.iter().enumerate() {
        let day_offset = match weekday_index(&item.day) {
            Some(idx) => idx as i64,
            None => continue,
        };
        let start_time = match NaiveTime::parse_from_str(&item.start_time, "%H:%M") {
            Ok(t) => t,
            Err(_) => continue,
        };

        let plan_start = (ref_week_start + Duration::days(day_offset)).and_time(start_time);
        let duration = item.duration_minutes.unwrap_or(60);
        let plan_end = plan_start + Duration::minutes(duration);

        for interval in busy {
            if !(plan_end <= interval.start || plan_start >= interval.end) {
                conflicts.push(PlanConflict {
                    item_index,
                    busy: interval.clone(),
                });
            }
        }
    }

    conflicts
}

const DELTAS_NEUTRAL: [i32; 10] = [1, -1, 2, -2, 3, -3, 4, -4, 5, -5];
const DELTAS_MORNING: [i32; 10] = [-1, -2, -3, 1, 2, 3, 4, -4, 5, -5];
const DELTAS_EVENING: [i32; 10] = [1, 2, 3, -1, -2, -3, 4, -4, 5, -5];

/// Try to move a conflicting item to a clear whole-hour slot on its day.
///
/// Candidate hours are probed outward from the current hour in a
/// chronotype-dependent order, staying within the configured waking-hour
/// bounds. On success the item's start time is rewritten and `true`
/// returned; otherwise the item is left as it was.
pub fn resolve_by_shifting(
    item: &mut PlanItem,
    busy: &[BusyInterval],
    target_date: NaiveDate,
    chronotype: Chronotype,
    hour_bounds: (u32, u32),
) -> bool {
    let duration = item.duration_minutes.unwrap_or(60);
    let current_hour = item
        .start_time
        .split(':')
        .next()
        .and_then(|h| h.parse::<i32>().ok())
        .unwrap_or(8);

    let deltas = match chronotype {
        Chronotype::Morning => &DELTAS_MORNING,
        Chronotype::Evening => &DELTAS_EVENING,
        Chronotype::Neutral => &DELTAS_NEUTRAL,
    };
    let (earliest, latest) = (hour_bounds.0 as i32, hour_bounds.1 as i32);

    for delta in deltas {
        let candidate_hour = current_hour + delta;
        if !(earliest..=latest).contains(&candidate_hour) {
            continue;
        }
        let time = match NaiveTime::from_hms_opt(candidate_hour as u32, 0, 0) {
            Some(t) => t,
            None => continue,
        };
        let candidate_start = target_date.and_time(time);
        let candidate_end = candidate_start + Duration::minutes(duration);

        let clashes = busy
            .iter()
            .any(|b| !(candidate_end <= b.start || candidate_start >= b.end));
        if !clashes {
            item.start_time = hhmm(candidate_hour as u32);
            return true;
        }
    }

    false
}
