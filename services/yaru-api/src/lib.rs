//! Yarumotors API service.
//!
//! HTTP façade that turns Formula 1 results into JSON tables and rendered
//! images, uploads the images to object storage and notifies the bot worker.

pub mod auth;
pub mod config;
pub mod error;
pub mod generate;
pub mod handlers;
pub mod notify;
pub mod state;

use std::sync::Arc;

use axum::{
    extract::Extension,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

pub use config::ApiConfig;
pub use state::AppState;

/// Build the service router.
pub fn create_router(state: Arc<AppState>) -> Router {
    // Generation routes require the bearer token
    let protected = Router::new()
        .route("/session/generate", post(handlers::session_generate_handler))
        .route("/session/:kind/generate", post(handlers::session_kind_generate_handler))
        .route("/generate/session/:kind", post(handlers::session_kind_generate_handler))
        .route("/generate/session/:kind/", post(handlers::session_kind_generate_handler))
        .route(
            "/generate/driverstanding/current",
            post(handlers::driver_standings_handler),
        )
        .route(
            "/generate/constructorstanding/current",
            post(handlers::constructor_standings_handler),
        )
        .route("/cron/run", post(handlers::cron_run_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .route("/manifest", get(handlers::manifest_handler))
        .route("/worker-update", get(handlers::worker_update_handler))
        .route("/schedule/:year", get(handlers::schedule_handler))
        .route("/download/*filename", get(handlers::download_handler))
        .merge(protected)
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
