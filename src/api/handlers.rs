//! REST API request handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{CadenceError, PlannerError, StoreError};
use crate::planner::PlanRequest;
use crate::schedule::types::{Conflict, Event, EventPatch, ParsedEvent, Suggestion};
use crate::scheduler::{ScheduleOutcome, Scheduler};

/// Application state shared across handlers.
pub struct ApiState {
    /// Scheduler for all operations.
    pub scheduler: Arc<Scheduler>,
}

impl ApiState {
    /// Create new API state.
    pub fn new(scheduler: Arc<Scheduler>) -> Self {
        Self { scheduler }
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Health response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub name: String,
    pub version: String,
    /// Whether the plan endpoint is usable.
    pub planner_available: bool,
}

/// Raw event draft accepted by the create endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct EventDraft {
    /// Event summary.
    pub summary: String,
    /// Start instant.
    pub start: DateTime<Utc>,
    /// End instant.
    pub end: DateTime<Utc>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Event location.
    #[serde(default)]
    pub location: Option<String>,
}

/// Schedule request body, shared by the schedule and check endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleRequest {
    /// The scheduling sentence.
    pub text: String,
    /// Reference instant for relative dates; defaults to now.
    #[serde(default)]
    pub reference: Option<DateTime<Utc>>,
}

/// Successful schedule response.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduledResponse {
    pub success: bool,
    /// The persisted event.
    pub event: Event,
}

/// Conflict response returned with a 409 status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictResponse {
    pub has_conflict: bool,
    pub conflicts: Vec<Conflict>,
    pub suggestions: Vec<Suggestion>,
}

/// Dry-run check response, always 200.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    /// What the text parsed to.
    pub parsed: ParsedEvent,
    pub has_conflict: bool,
    pub conflicts: Vec<Conflict>,
    pub suggestions: Vec<Suggestion>,
}

/// Events list response.
#[derive(Debug, Clone, Serialize)]
pub struct EventsListResponse {
    pub events: Vec<Event>,
    pub total: usize,
}

/// Delete response.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteEventResponse {
    pub success: bool,
    pub message: String,
}

/// Error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    /// Individual validation reasons, when the error carries them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

/// Map a scheduler error to its HTTP representation.
fn error_response(err: CadenceError) -> Response {
    let (status, code, details) = match &err {
        CadenceError::Validation { errors } => (
            StatusCode::BAD_REQUEST,
            "validation_failed",
            Some(errors.clone()),
        ),
        CadenceError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", None),
        CadenceError::Store(StoreError::InvalidUpdate(reason)) => (
            StatusCode::BAD_REQUEST,
            "invalid_update",
            Some(vec![reason.clone()]),
        ),
        CadenceError::Planner(PlannerError::NoGenerator) => {
            (StatusCode::SERVICE_UNAVAILABLE, "planner_unavailable", None)
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None),
    };

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            code: code.to_string(),
            details,
        }),
    )
        .into_response()
}

// ============================================================================
// Handler Functions
// ============================================================================

/// GET /api/v1/health - Service identity.
pub async fn health_handler(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    Json(HealthResponse {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        planner_available: state.scheduler.can_plan(),
    })
}

/// GET /api/v1/events - List stored events.
pub async fn list_events_handler(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    match state.scheduler.list_events().await {
        Ok(events) => {
            let total = events.len();
            (StatusCode::OK, Json(EventsListResponse { events, total })).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// POST /api/v1/events - Create an event from a raw draft.
pub async fn create_event_handler(
    State(state): State<Arc<ApiState>>,
    Json(draft): Json<EventDraft>,
) -> impl IntoResponse {
    let mut event = Event::new(draft.summary, draft.start, draft.end);
    if let Some(description) = draft.description {
        event.description = description;
    }
    event.location = draft.location;

    match state.scheduler.add_event(event).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/v1/events/:id - Fetch one event.
pub async fn get_event_handler(
    State(state): State<Arc<ApiState>>,
    Path(event_id): Path<String>,
) -> impl IntoResponse {
    match state.scheduler.get_event(&event_id).await {
        Ok(Some(event)) => (StatusCode::OK, Json(event)).into_response(),
        Ok(None) => error_response(CadenceError::NotFound(event_id)),
        Err(e) => error_response(e),
    }
}

/// PATCH /api/v1/events/:id - Partially update an event.
pub async fn update_event_handler(
    State(state): State<Arc<ApiState>>,
    Path(event_id): Path<String>,
    Json(patch): Json<EventPatch>,
) -> impl IntoResponse {
    match state.scheduler.update_event(&event_id, patch).await {
        Ok(event) => (StatusCode::OK, Json(event)).into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE /api/v1/events/:id - Delete an event.
pub async fn delete_event_handler(
    State(state): State<Arc<ApiState>>,
    Path(event_id): Path<String>,
) -> impl IntoResponse {
    match state.scheduler.delete_event(&event_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(DeleteEventResponse {
                success: true,
                message: format!("Event {} deleted", event_id),
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/v1/schedule - Parse, conflict-check and persist.
pub async fn schedule_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<ScheduleRequest>,
) -> impl IntoResponse {
    let outcome = match request.reference {
        Some(reference) => {
            state
                .scheduler
                .schedule_text_at(&request.text, reference)
                .await
        }
        None => state.scheduler.schedule_text(&request.text).await,
    };

    match outcome {
        Ok(ScheduleOutcome::Scheduled(event)) => (
            StatusCode::CREATED,
            Json(ScheduledResponse {
                success: true,
                event,
            }),
        )
            .into_response(),
        Ok(ScheduleOutcome::Conflicted {
            report,
            suggestions,
            ..
        }) => (
            StatusCode::CONFLICT,
            Json(ConflictResponse {
                has_conflict: report.has_conflict,
                conflicts: report.conflicts,
                suggestions,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/v1/schedule/check - Dry-run conflict check.
pub async fn check_schedule_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<ScheduleRequest>,
) -> impl IntoResponse {
    let outcome = match request.reference {
        Some(reference) => state.scheduler.check_text_at(&request.text, reference).await,
        None => state.scheduler.check_text(&request.text).await,
    };

    match outcome {
        Ok(check) => (
            StatusCode::OK,
            Json(CheckResponse {
                parsed: check.parsed,
                has_conflict: check.report.has_conflict,
                conflicts: check.report.conflicts,
                suggestions: check.suggestions,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/v1/plan - Generate a weekly plan.
pub async fn plan_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<PlanRequest>,
) -> impl IntoResponse {
    let profile = request.profile.unwrap_or_default();

    match state
        .scheduler
        .plan(&request.goal, &profile, request.busy_intervals)
        .await
    {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response(e),
    }
}
