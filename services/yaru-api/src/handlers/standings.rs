//! Current-season standings generation.

use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse};
use tracing::info;

use crate::generate::{constructor_standings, driver_standings};
use crate::state::AppState;

use super::generation_response;

const CURRENT_SEASON: &str = "current";

/// Driver standings plus the rendered standings board.
pub async fn driver_standings_handler(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    info!("Generating driver standings");
    let outcome = driver_standings(&state, CURRENT_SEASON).await;
    generation_response("driver_standings", None, outcome)
}

pub async fn constructor_standings_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> impl IntoResponse {
    info!("Generating constructor standings");
    let outcome = constructor_standings(&state, CURRENT_SEASON).await;
    generation_response("constructor_standings", None, outcome)
}
