//! Route guide service - HTTP and WebSocket server for the route guide.
//!
//! ## Usage
//!
//! ```text
//! routeguide-service [path/to/route_guide_db.json]
//! ```
//!
//! The database path argument takes precedence over `ROUTEGUIDE_DB_PATH`.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `ROUTEGUIDE_DB_PATH` | JSON feature database | Required unless given as argument |
//! | `ROUTEGUIDE_PORT` | HTTP server port | 50051 |
//! | `RUST_LOG` | Log level (e.g., "info", "debug") | "info" |
//!
//! ## Endpoints
//!
//! - `GET /feature?latitude=X&longitude=Y` - Feature at a point
//! - `GET /features?lo_latitude=..&lo_longitude=..&hi_latitude=..&hi_longitude=..` - Features in a rectangle (NDJSON)
//! - `POST /route` - Record a route from NDJSON points
//! - `GET /chat` - Exchange route notes over a WebSocket
//! - `GET /health` - Health check
//! - `GET /stats` - Catalog and note statistics
//! - `GET /docs` - OpenAPI documentation (Swagger UI)

use std::net::SocketAddr;
use std::sync::Arc;

use routeguide::{RouteGuideServiceBuilder, DB_PATH_ENV};
use routeguide_service::{router, ApiDoc, AppState};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Port the service listens on when `ROUTEGUIDE_PORT` is not set.
const DEFAULT_PORT: u16 = 50051;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "routeguide_service=info,routeguide=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port: u16 = std::env::var("ROUTEGUIDE_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let builder = match std::env::args_os().nth(1) {
        Some(path) => RouteGuideServiceBuilder::new(path),
        None => match RouteGuideServiceBuilder::from_env() {
            Ok(builder) => builder,
            Err(e) => {
                tracing::error!(
                    var = DB_PATH_ENV,
                    "No feature database given; pass a path or set the variable"
                );
                return Err(e.into());
            }
        },
    };

    let route_guide = builder.build()?;

    tracing::info!(
        features = route_guide.catalog().len(),
        named_features = route_guide.catalog().named_count(),
        port = port,
        "Starting route guide service"
    );

    let state = Arc::new(AppState { route_guide });

    let app = router(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Route guide service stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
