//! Static bearer token authentication.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Reasons a request is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    MissingHeader,
    Unauthorized,
}

impl AuthFailure {
    pub fn detail(&self) -> &'static str {
        match self {
            AuthFailure::MissingHeader => "Missing Authorization header",
            AuthFailure::Unauthorized => "Unauthorized",
        }
    }
}

/// Validate an `Authorization` header value against the expected token.
///
/// The scheme must be `Bearer` (any case) and the token must match exactly.
pub fn check_bearer(header: Option<&str>, expected: &str) -> Result<(), AuthFailure> {
    let header = match header {
        Some(h) if !h.is_empty() => h,
        _ => return Err(AuthFailure::MissingHeader),
    };

    let (scheme, token) = header.split_once(' ').unwrap_or((header, ""));
    if scheme.eq_ignore_ascii_case("bearer") && token == expected {
        Ok(())
    } else {
        Err(AuthFailure::Unauthorized)
    }
}

/// Check the `Authorization` header of a request.
///
/// A header that is present but not visible ASCII is a wrong token, not a
/// missing one.
pub fn authorize(headers: &HeaderMap, expected: &str) -> Result<(), AuthFailure> {
    match headers.get(AUTHORIZATION) {
        Some(value) => {
            let value = value.to_str().map_err(|_| AuthFailure::Unauthorized)?;
            check_bearer(Some(value), expected)
        }
        None => check_bearer(None, expected),
    }
}

/// Middleware guarding the generation routes.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    match authorize(request.headers(), &state.config.api_token) {
        Ok(()) => next.run(request).await,
        Err(failure) => {
            debug!(path = %request.uri().path(), reason = failure.detail(), "Rejected request");
            ApiError::unauthorized(failure.detail()).into_response()
        }
    }
}
