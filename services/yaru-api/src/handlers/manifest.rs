//! CDN manifest probe: does a rendered asset exist on the CDN?

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use motorsport_common::{MotorsportError, MotorsportResult};
use storage::AssetPath;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ManifestQuery {
    pub year: i32,
    pub event: String,
    pub session: String,
    pub asset: String,
}

/// Outcome of a HEAD probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestStatus {
    Available,
    Missing,
    /// Any other status the CDN answered with
    Other(u16),
}

/// CDN URL of an asset. The session segment is passed through unchanged.
pub fn manifest_url(cdn_url: &str, query: &ManifestQuery) -> String {
    format!(
        "{}/{}",
        cdn_url.trim_end_matches('/'),
        AssetPath::session_asset(query.year, &query.event, &query.session, &query.asset)
    )
}

/// Send one HEAD request, following redirects.
#[instrument(skip(http))]
pub async fn probe_manifest(http: &Client, url: &str) -> MotorsportResult<ManifestStatus> {
    let response = http
        .head(url)
        .send()
        .await
        .map_err(|e| MotorsportError::UpstreamError(format!("CDN probe {}: {}", url, e)))?;

    let status = response.status().as_u16();
    debug!(status = status, "CDN answered");
    Ok(match status {
        200 => ManifestStatus::Available,
        404 => ManifestStatus::Missing,
        other => ManifestStatus::Other(other),
    })
}

pub async fn manifest_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<ManifestQuery>,
) -> Result<Response, ApiError> {
    let url = manifest_url(&state.config.cdn_url, &query);

    let response = match probe_manifest(&state.http, &url).await? {
        ManifestStatus::Available => Json(json!({ "available": true, "url": url })).into_response(),
        ManifestStatus::Missing => Json(json!({ "available": false, "url": url })).into_response(),
        ManifestStatus::Other(code) => {
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_GATEWAY);
            ApiError::new(status, format!("CDN returned HTTP {} for {}", code, url)).into_response()
        }
    };
    Ok(response)
}
