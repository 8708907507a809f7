//! Scheduled-run trigger. Nothing is scheduled yet; the route only records the call.

use axum::{response::IntoResponse, Json};
use serde_json::json;
use tracing::info;

use super::now_rfc3339;

pub async fn cron_run_handler() -> impl IntoResponse {
    let started = now_rfc3339();
    info!(started = %started, "Cron run requested");
    Json(json!({ "status": "ok", "started": started }))
}
