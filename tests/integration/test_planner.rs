//! End-to-end plan generation tests.
//!
//! A stand-in worker script plays the model: it reads the JSON request on
//! stdin and prints plan text, which exercises the full subprocess, repair,
//! normalization and busy-shifting path without a real model.

use std::fs::File;
use std::io::Write;

use chrono::{NaiveDate, TimeZone, Utc};
use tempfile::TempDir;

use cadence::config::{Config, PlannerConfig};
use cadence::error::{CadenceError, PlannerError};
use cadence::planner::{PlanPipeline, PlanStatus, UserProfile};
use cadence::schedule::Event;
use cadence::scheduler::Scheduler;

/// Write a stand-in worker script and return the command line that runs it.
fn write_worker(dir: &TempDir, body: &str) -> String {
    let path = dir.path().join("worker.sh");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "#!/bin/sh").unwrap();
    writeln!(f, "{}", body).unwrap();
    format!("sh {}", path.display())
}

/// Planner configuration running the given worker command.
fn planner_config(command: String) -> PlannerConfig {
    let mut config = PlannerConfig::default();
    config.command = Some(command);
    config.timeout_secs = 10;
    config
}

/// Full configuration with a temporary event file and the worker wired up.
fn create_test_config(dir: &TempDir, command: String) -> Config {
    let mut config = Config::default();
    config.store.data_file = dir.path().join("events.json").to_string_lossy().to_string();
    config.planner = planner_config(command);
    config
}

// 2024-01-10 is a Wednesday; the reference week starts Mon 2024-01-15
fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
}

#[tokio::test]
async fn test_plan_through_scheduler() {
    let dir = TempDir::new().unwrap();
    let command = write_worker(
        &dir,
        r#"cat > /dev/null
echo '{"weekly_plan": [{"task_name": "Long run", "day": "saturday", "start_time": "morning"}], "milestones": [{"date": "2024-03-01", "goal": "Race day"}]}'"#,
    );
    let scheduler = Scheduler::new(create_test_config(&dir, command)).unwrap();
    assert!(scheduler.can_plan());

    let response = scheduler
        .plan("train for a 10k", &UserProfile::default(), None)
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.metadata.status, PlanStatus::Ok);
    assert_eq!(response.metadata.model_used, "google/gemma-2-2b-it");
    assert_eq!(response.metadata.conflicts_before, Some(0));

    let plan = response.output.unwrap();
    let item = &plan.weekly_plan[0];
    assert_eq!(item.day, "Sat");
    assert_eq!(item.start_time, "08:00");
    assert_eq!(item.duration_minutes, Some(60));
    assert_eq!(item.weekday_index, Some(5));
    assert_eq!(plan.milestones.len(), 1);
    assert_eq!(plan.milestones[0].goal, "Race day");
}

#[tokio::test]
async fn test_stored_events_reach_the_prompt_as_busy_intervals() {
    let dir = TempDir::new().unwrap();
    // The worker rejects any request whose prompt lacks the stored busy slot
    let command = write_worker(
        &dir,
        r#"input=$(cat)
echo "$input" | grep -q '2024-01-15T14:00:00Z/2024-01-15T15:00:00Z' || exit 4
echo '{"weekly_plan": []}'"#,
    );
    let scheduler = Scheduler::new(create_test_config(&dir, command)).unwrap();

    let start = Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 0).unwrap();
    let event = Event::new("Team sync", start, start + chrono::Duration::hours(1));
    scheduler.add_event(event).await.unwrap();

    let response = scheduler
        .plan("read more books", &UserProfile::default(), None)
        .await
        .unwrap();
    assert!(response.success);
    assert!(response.output.unwrap().weekly_plan.is_empty());
}

#[tokio::test]
async fn test_worker_exit_status_surfaces_as_error() {
    let dir = TempDir::new().unwrap();
    let command = write_worker(
        &dir,
        r#"cat > /dev/null
exit 7"#,
    );
    let pipeline = PlanPipeline::from_config(&planner_config(command));

    let err = pipeline
        .generate_plan("run more", &UserProfile::default(), &[])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CadenceError::Planner(PlannerError::ExitStatus(7))
    ));
}

#[tokio::test]
async fn test_prose_output_degrades_to_unsuccessful_response() {
    let dir = TempDir::new().unwrap();
    let command = write_worker(
        &dir,
        r#"cat > /dev/null
echo 'No plan today, sorry.'"#,
    );
    let pipeline = PlanPipeline::from_config(&planner_config(command));

    let response = pipeline
        .generate_plan("run more", &UserProfile::default(), &[])
        .await
        .unwrap();
    assert!(!response.success);
    assert_eq!(response.metadata.status, PlanStatus::InvalidJson);
    assert_eq!(
        response.error.as_deref(),
        Some("Failed to parse JSON from model output")
    );
    assert!(response
        .metadata
        .raw_text
        .as_deref()
        .unwrap()
        .contains("sorry"));
}

#[tokio::test]
async fn test_busy_collision_shifted_through_worker() {
    let dir = TempDir::new().unwrap();
    let command = write_worker(
        &dir,
        r#"cat > /dev/null
echo '{"weekly_plan": [{"task_name": "Deep work", "day": "Mon", "start_time": "09:00", "duration_minutes": 60}]}'"#,
    );
    let pipeline = PlanPipeline::from_config(&planner_config(command));

    let busy = vec!["2024-01-15T09:00:00Z/2024-01-15T10:00:00Z".to_string()];
    let response = pipeline
        .generate_plan_at("focus time", &UserProfile::default(), &busy, today())
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.metadata.conflicts_before, Some(1));
    assert_eq!(response.metadata.conflicts_after, Some(0));
    assert_eq!(response.output.unwrap().weekly_plan[0].start_time, "10:00");
}

#[tokio::test]
async fn test_slow_worker_times_out() {
    let dir = TempDir::new().unwrap();
    let command = write_worker(
        &dir,
        r#"cat > /dev/null
sleep 30
echo '{"weekly_plan": []}'"#,
    );
    let mut config = planner_config(command);
    config.timeout_secs = 1;
    let pipeline = PlanPipeline::from_config(&config);

    let err = pipeline
        .generate_plan("run more", &UserProfile::default(), &[])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CadenceError::Planner(PlannerError::Timeout(1))
    ));
}

#[tokio::test]
async fn test_worker_ignoring_stdin_still_times_out() {
    let dir = TempDir::new().unwrap();
    // This worker never reads stdin, so a request larger than the pipe
    // buffer cannot finish writing
    let command = write_worker(&dir, "sleep 30");
    let mut config = planner_config(command);
    config.timeout_secs = 1;
    let pipeline = PlanPipeline::from_config(&config);

    let goal = "x".repeat(256 * 1024);
    let started = std::time::Instant::now();
    let err = pipeline
        .generate_plan(&goal, &UserProfile::default(), &[])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CadenceError::Planner(PlannerError::Timeout(1))
    ));
    assert!(
        started.elapsed() < std::time::Duration::from_secs(5),
        "timed-out run took {:?}",
        started.elapsed()
    );
}
