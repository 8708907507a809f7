use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Extension, Path},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

/// Stream an object from storage as an attachment.
pub async fn download_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    if filename.split('/').any(|segment| segment == ".." || segment.is_empty()) {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Invalid filename"));
    }

    let object = state.storage.get_stream(&filename).await?;
    info!(key = %filename, size = object.size, "Serving download");

    let disposition = format!(
        "attachment; filename=\"{}\"",
        filename.replace(['"', '\\'], "_")
    );
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CONTENT_LENGTH, object.size.to_string()),
        ],
        Body::from_stream(object.body),
    )
        .into_response())
}
