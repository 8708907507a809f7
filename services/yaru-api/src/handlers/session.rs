//! Session results and qualifying chart generation.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;

use motorsport_common::{EventRef, SessionKind};

use crate::error::ApiError;
use crate::generate::{event_label, qualifying_chart, session_results};
use crate::state::AppState;

use super::generation_response;

/// Body of the session generation routes.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionRequest {
    pub year: i32,
    /// Round number or event name
    pub event: EventRef,
    /// Defaults to the race
    #[serde(default)]
    pub session: Option<SessionKind>,
}

/// Results of the session named in the body.
pub async fn session_generate_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<SessionRequest>,
) -> impl IntoResponse {
    let kind = request.session.unwrap_or_default();
    info!(year = request.year, event = %request.event, session = %kind, "Generating session results");

    let outcome = session_results(&state, request.year, &request.event, kind).await;
    generation_response("session", Some(event_label(&request.event, kind)), outcome)
}

/// Results of the session named in the path. Qualifying also renders the
/// gap-to-pole chart.
pub async fn session_kind_generate_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(kind): Path<String>,
    Json(request): Json<SessionRequest>,
) -> Result<Response, ApiError> {
    let kind: SessionKind = kind.parse()?;
    let event = Some(event_label(&request.event, kind));
    info!(year = request.year, event = %request.event, session = %kind, "Generating session");

    let response = match kind {
        SessionKind::Qualifying => {
            let outcome = qualifying_chart(&state, request.year, &request.event).await;
            generation_response("qualifying_chart", event, outcome).into_response()
        }
        SessionKind::Race | SessionKind::Sprint => {
            let outcome = session_results(&state, request.year, &request.event, kind).await;
            generation_response("session", event, outcome).into_response()
        }
    };
    Ok(response)
}
