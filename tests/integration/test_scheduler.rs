//! Tests for the scheduling coordinator.

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use cadence::config::Config;
use cadence::error::CadenceError;
use cadence::schedule::{Event, EventPatch};
use cadence::scheduler::{ScheduleOutcome, Scheduler};

/// Create a test configuration over a temporary event file.
fn create_test_config(data_dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.store.data_file = data_dir.join("events.json").to_string_lossy().to_string();
    config
}

/// Sunday morning, so "tomorrow" resolves to Monday 2024-01-15.
fn reference() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 14, 10, 0, 0).unwrap()
}

fn monday(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, h, m, 0).unwrap()
}

#[tokio::test]
async fn test_scheduler_initialization() {
    let data_dir = TempDir::new().unwrap();
    let config = create_test_config(data_dir.path());

    let scheduler = Scheduler::new(config).unwrap();
    assert!(scheduler.list_events().await.unwrap().is_empty());
    assert!(!scheduler.can_plan(), "No generator is configured");
}

#[tokio::test]
async fn test_schedule_texts_and_list_sorted() {
    let data_dir = TempDir::new().unwrap();
    let scheduler = Scheduler::new(create_test_config(data_dir.path())).unwrap();

    // Scheduled out of order on purpose
    let late = scheduler
        .schedule_text_at("Dentist appointment tomorrow at 4pm", reference())
        .await
        .unwrap();
    let early = scheduler
        .schedule_text_at("Standup tomorrow at 9am", reference())
        .await
        .unwrap();
    assert!(matches!(late, ScheduleOutcome::Scheduled(_)));
    assert!(matches!(early, ScheduleOutcome::Scheduled(_)));

    let events = scheduler.list_events().await.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].start, monday(9, 0));
    assert_eq!(events[1].start, monday(16, 0));
}

#[tokio::test]
async fn test_conflict_suggests_adjacent_free_windows() {
    let data_dir = TempDir::new().unwrap();
    let scheduler = Scheduler::new(create_test_config(data_dir.path())).unwrap();

    scheduler
        .schedule_text_at("Team sync tomorrow at 2pm", reference())
        .await
        .unwrap();

    let outcome = scheduler
        .schedule_text_at("Planning session tomorrow at 2pm", reference())
        .await
        .unwrap();
    let (parsed, report, suggestions) = match outcome {
        ScheduleOutcome::Conflicted {
            parsed,
            report,
            suggestions,
        } => (parsed, report, suggestions),
        other => panic!("expected conflicted outcome, got {:?}", other),
    };

    assert_eq!(parsed.start, Some(monday(14, 0)));
    assert!(report.has_conflict);
    assert_eq!(report.conflicts.len(), 1);

    // One hour before and one hour after the occupied slot
    let starts: Vec<_> = suggestions.iter().map(|s| s.start).collect();
    assert_eq!(starts, vec![monday(13, 0), monday(15, 0)]);
    for suggestion in &suggestions {
        assert!(
            suggestion.end <= monday(14, 0) || suggestion.start >= monday(15, 0),
            "suggested window {} overlaps the busy slot",
            suggestion.start
        );
        assert!(suggestion.start > reference());
    }
}

#[tokio::test]
async fn test_events_survive_scheduler_restart() {
    let data_dir = TempDir::new().unwrap();
    let config = create_test_config(data_dir.path());

    let scheduled = {
        let scheduler = Scheduler::new(config.clone()).unwrap();
        let outcome = scheduler
            .schedule_text_at("Schedule a meeting tomorrow at 2pm for 1 hour", reference())
            .await
            .unwrap();
        match outcome {
            ScheduleOutcome::Scheduled(event) => event,
            other => panic!("expected scheduled outcome, got {:?}", other),
        }
    };

    let reopened = Scheduler::new(config).unwrap();
    let events = reopened.list_events().await.unwrap();
    assert_eq!(events.len(), 1);

    let fetched = reopened.get_event(&scheduled.id).await.unwrap().unwrap();
    assert_eq!(fetched.summary, "Meeting");
    assert_eq!(
        fetched.description,
        "Schedule a meeting tomorrow at 2pm for 1 hour"
    );
}

#[tokio::test]
async fn test_patch_flow_through_scheduler() {
    let data_dir = TempDir::new().unwrap();
    let scheduler = Scheduler::new(create_test_config(data_dir.path())).unwrap();

    let event = Event::new("Standup", monday(9, 0), monday(10, 0));
    let created = scheduler.add_event(event).await.unwrap();

    let patch = EventPatch {
        summary: Some("Daily standup".to_string()),
        end: Some(monday(10, 30)),
        ..EventPatch::default()
    };
    let updated = scheduler.update_event(&created.id, patch).await.unwrap();
    assert_eq!(updated.summary, "Daily standup");
    assert_eq!(updated.end, monday(10, 30));

    let inverted = EventPatch {
        end: Some(monday(8, 0)),
        ..EventPatch::default()
    };
    let err = scheduler
        .update_event(&created.id, inverted)
        .await
        .unwrap_err();
    assert!(matches!(err, CadenceError::Store(_)));

    let err = scheduler
        .update_event("missing", EventPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CadenceError::NotFound(_)));
}

#[tokio::test]
async fn test_scheduling_into_a_suggested_window_succeeds() {
    let data_dir = TempDir::new().unwrap();
    let scheduler = Scheduler::new(create_test_config(data_dir.path())).unwrap();

    scheduler
        .schedule_text_at("Team sync tomorrow at 2pm", reference())
        .await
        .unwrap();
    let outcome = scheduler
        .schedule_text_at("Planning session tomorrow at 2pm", reference())
        .await
        .unwrap();
    let suggestions = match outcome {
        ScheduleOutcome::Conflicted { suggestions, .. } => suggestions,
        other => panic!("expected conflicted outcome, got {:?}", other),
    };

    // Taking the first proposed window clears the conflict check
    let slot = &suggestions[0];
    let event = Event::new("Planning session", slot.start, slot.end);
    scheduler.add_event(event).await.unwrap();

    let check = scheduler
        .check_text_at("Planning session tomorrow at 2pm", reference())
        .await
        .unwrap();
    assert!(check.report.has_conflict, "the 2pm slot is still busy");
    assert_eq!(scheduler.list_events().await.unwrap().len(), 2);
}
