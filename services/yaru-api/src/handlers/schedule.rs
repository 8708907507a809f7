use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::error::ApiError;
use crate::generate::season_countries;
use crate::state::AppState;

/// Event countries of a season in schedule order.
pub async fn schedule_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(year): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let countries = season_countries(&state, year).await?;
    Ok(Json(json!({ "year": year, "countries": countries })))
}
