//! REST API router and server entry point.

use std::sync::Arc;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::api::handlers::{
    check_schedule_handler, create_event_handler, delete_event_handler, get_event_handler,
    health_handler, list_events_handler, plan_handler, schedule_handler, update_event_handler,
    ApiState,
};
use crate::config::ServerConfig;
use crate::error::Result;
use crate::scheduler::Scheduler;

/// Create the REST API router.
///
/// Endpoints:
/// - GET    /api/v1/health          - Service identity
/// - GET    /api/v1/events          - List events
/// - POST   /api/v1/events          - Create an event from a raw draft
/// - GET    /api/v1/events/:id      - Fetch an event
/// - PATCH  /api/v1/events/:id      - Partially update an event
/// - DELETE /api/v1/events/:id      - Delete an event
/// - POST   /api/v1/schedule        - Parse, conflict-check and persist
/// - POST   /api/v1/schedule/check  - Dry-run conflict check
/// - POST   /api/v1/plan            - Generate a weekly plan
pub fn create_rest_router(scheduler: Arc<Scheduler>, config: &ServerConfig) -> Router {
    let state = Arc::new(ApiState::new(scheduler));

    let api_routes = Router::new()
        .route("/health", get(health_handler))
        .route("/events", get(list_events_handler).post(create_event_handler))
        .route(
            "/events/:id",
            get(get_event_handler)
                .patch(update_event_handler)
                .delete(delete_event_handler),
        )
        .route("/schedule", post(schedule_handler))
        .route("/schedule/check", post(check_schedule_handler))
        .route("/plan", post(plan_handler))
        .with_state(state);

    let router = Router::new().nest("/api/v1", api_routes);

    if config.cors_permissive {
        let cors = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE])
            .allow_origin(Any);

        router.layer(cors)
    } else {
        router
    }
}

/// Bind the configured address and serve the REST API until shutdown.
pub async fn serve(scheduler: Arc<Scheduler>) -> Result<()> {
    let server_config = scheduler.config().server.clone();
    let app = create_rest_router(scheduler, &server_config);

    let listener =
        tokio::net::TcpListener::bind((server_config.host.as_str(), server_config.port)).await?;
    info!(
        "Cadence API listening on http://{}:{}",
        server_config.host, server_config.port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
