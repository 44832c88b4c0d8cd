//! Route guide service library.
//!
//! HTTP handlers, router and OpenAPI document for the route guide.
//! This library is used by both the routeguide-service binary and integration tests.

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use routeguide::RouteGuideService;
use utoipa::OpenApi;

/// Application state shared across handlers.
pub struct AppState {
    /// Route guide answering every call.
    pub route_guide: RouteGuideService,
}

/// OpenAPI documentation for the route guide service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Route Guide Service",
        description = "Feature lookup, route recording and location notes over HTTP and WebSocket."
    ),
    paths(
        handlers::get_feature,
        handlers::list_features,
        handlers::record_route,
        handlers::health_check,
        handlers::get_stats,
    ),
    components(
        schemas(
            routeguide::Point,
            routeguide::Feature,
            routeguide::RouteNote,
            routeguide::RouteSummary,
            handlers::ErrorResponse,
            handlers::HealthResponse,
            handlers::StatsResponse,
        )
    ),
    tags(
        (name = "features", description = "Feature lookup endpoints"),
        (name = "routes", description = "Route recording endpoints"),
        (name = "system", description = "System and health endpoints")
    )
)]
pub struct ApiDoc;

/// Build the application router without documentation or middleware layers.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/feature", get(handlers::get_feature))
        .route("/features", get(handlers::list_features))
        .route("/route", post(handlers::record_route))
        .route("/chat", get(handlers::route_chat))
        .route("/health", get(handlers::health_check))
        .route("/stats", get(handlers::get_stats))
        .with_state(state)
}

// Re-export commonly used types for convenience
pub use error::ApiError;
pub use handlers::{ErrorResponse, HealthResponse, StatsResponse};
