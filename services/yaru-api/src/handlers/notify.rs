use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, Json};
use serde_json::json;
use tracing::warn;

use crate::notify::notify_bot;
use crate::state::AppState;

use super::now_rfc3339;

/// Tell the bot worker that new assets are available.
pub async fn worker_update_handler(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    match notify_bot(&state.http, &state.config.bot_domain).await {
        Ok(()) => Json(json!({ "status": "ok", "time": now_rfc3339() })),
        Err(e) => {
            warn!(error_kind = e.kind(), error = %e, "Worker update failed");
            Json(json!({ "status": "error", "details": e.to_string() }))
        }
    }
}
