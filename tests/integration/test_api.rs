//! Tests for the REST API handlers and router.

use std::sync::Arc;

use axum::body::to_bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use cadence::api::{
    check_schedule_handler, create_event_handler, create_rest_router, get_event_handler,
    health_handler, plan_handler, schedule_handler, update_event_handler, ApiState, EventDraft,
    ScheduleRequest,
};
use cadence::config::Config;
use cadence::planner::PlanRequest;
use cadence::schedule::EventPatch;
use cadence::scheduler::Scheduler;

/// Create API state over a temporary event file.
fn create_test_state(data_dir: &std::path::Path) -> Arc<ApiState> {
    let mut config = Config::default();
    config.store.data_file = data_dir.join("events.json").to_string_lossy().to_string();
    let scheduler = Arc::new(Scheduler::new(config).unwrap());
    Arc::new(ApiState::new(scheduler))
}

/// Sunday morning, so "tomorrow" resolves to Monday 2024-01-15.
fn reference() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 14, 10, 0, 0).unwrap()
}

/// Decode a handler response into its status and JSON payload.
async fn read_json(response: axum::response::Response) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

#[tokio::test]
async fn test_router_creation() {
    let data_dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.store.data_file = data_dir
        .path()
        .join("events.json")
        .to_string_lossy()
        .to_string();
    let scheduler = Arc::new(Scheduler::new(config.clone()).unwrap());

    let router = create_rest_router(scheduler.clone(), &config.server);
    drop(router);

    config.server.cors_permissive = false;
    let router = create_rest_router(scheduler, &config.server);
    drop(router);
}

#[tokio::test]
async fn test_health_reports_identity() {
    let data_dir = TempDir::new().unwrap();
    let state = create_test_state(data_dir.path());

    let response = health_handler(State(state)).await.into_response();
    let (status, body) = read_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "cadence");
    assert!(body["version"].as_str().is_some_and(|v| !v.is_empty()));
    assert_eq!(body["planner_available"], serde_json::json!(false));
}

#[tokio::test]
async fn test_schedule_endpoint_wire_contract() {
    let data_dir = TempDir::new().unwrap();
    let state = create_test_state(data_dir.path());

    let request = ScheduleRequest {
        text: "Schedule a meeting tomorrow at 2pm for 1 hour".to_string(),
        reference: Some(reference()),
    };
    let response = schedule_handler(State(state.clone()), Json(request.clone()))
        .await
        .into_response();
    let (status, body) = read_json(response).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], serde_json::json!(true));
    assert_eq!(body["event"]["summary"], "Meeting");
    assert_eq!(body["event"]["start"], "2024-01-15T14:00:00Z");

    // The same slot again conflicts
    let response = schedule_handler(State(state), Json(request))
        .await
        .into_response();
    let (status, body) = read_json(response).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["hasConflict"], serde_json::json!(true));
    assert_eq!(body["conflicts"][0]["overlapType"], "full");
    assert_eq!(body["suggestions"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_check_endpoint_reports_the_parse() {
    let data_dir = TempDir::new().unwrap();
    let state = create_test_state(data_dir.path());

    let request = ScheduleRequest {
        text: "Review tomorrow at 2pm for 90 minutes".to_string(),
        reference: Some(reference()),
    };
    let response = check_schedule_handler(State(state), Json(request))
        .await
        .into_response();
    let (status, body) = read_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["parsed"]["duration"], 90);
    assert_eq!(body["parsed"]["start"], "2024-01-15T14:00:00Z");
    assert_eq!(body["hasConflict"], serde_json::json!(false));
    assert!(body["suggestions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_draft_maps_to_validation_error() {
    let data_dir = TempDir::new().unwrap();
    let state = create_test_state(data_dir.path());

    let draft = EventDraft {
        summary: "Backwards".to_string(),
        start: reference(),
        end: reference() - chrono::Duration::hours(1),
        description: None,
        location: None,
    };
    let response = create_event_handler(State(state), Json(draft))
        .await
        .into_response();
    let (status, body) = read_json(response).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_failed");
    let details = body["details"].as_array().unwrap();
    assert!(details.contains(&serde_json::json!("End time must be after start time")));
}

#[tokio::test]
async fn test_missing_event_maps_to_not_found() {
    let data_dir = TempDir::new().unwrap();
    let state = create_test_state(data_dir.path());

    let response = get_event_handler(State(state), Path("missing".to_string()))
        .await
        .into_response();
    let (status, body) = read_json(response).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn test_inverting_patch_maps_to_invalid_update() {
    let data_dir = TempDir::new().unwrap();
    let state = create_test_state(data_dir.path());

    let start = reference();
    let draft = EventDraft {
        summary: "Standup".to_string(),
        start,
        end: start + chrono::Duration::hours(1),
        description: None,
        location: None,
    };
    let response = create_event_handler(State(state.clone()), Json(draft))
        .await
        .into_response();
    let (status, created) = read_json(response).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let patch = EventPatch {
        end: Some(start - chrono::Duration::hours(1)),
        ..EventPatch::default()
    };
    let response = update_event_handler(State(state), Path(id), Json(patch))
        .await
        .into_response();
    let (status, body) = read_json(response).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_update");
}

#[tokio::test]
async fn test_plan_without_generator_maps_to_unavailable() {
    let data_dir = TempDir::new().unwrap();
    let state = create_test_state(data_dir.path());

    let request = PlanRequest {
        goal: "train for a 10k".to_string(),
        profile: None,
        busy_intervals: None,
    };
    let response = plan_handler(State(state), Json(request)).await.into_response();
    let (status, body) = read_json(response).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "planner_unavailable");
}
