//! Error types for yarumotors services.

use thiserror::Error;

/// Result type alias using MotorsportError.
pub type MotorsportResult<T> = Result<T, MotorsportError>;

/// Primary error type for motorsport data operations.
#[derive(Debug, Error)]
pub enum MotorsportError {
    // === Request Errors ===
    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Unknown session type: {0}")]
    UnknownSession(String),

    #[error("No event matching '{event}' in the {year} season")]
    EventNotFound { year: i32, event: String },

    // === Data Errors ===
    #[error("Data not available: {0}")]
    DataNotAvailable(String),

    #[error("Upstream request failed: {0}")]
    UpstreamError(String),

    #[error("Upstream returned HTTP {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    #[error("Failed to decode upstream response: {0}")]
    DecodeError(String),

    // === Storage Errors ===
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    // === Output Errors ===
    #[error("Rendering failed: {0}")]
    RenderError(String),

    #[error("Webhook notification failed: {0}")]
    NotifyError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl MotorsportError {
    /// Short, stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            MotorsportError::InvalidParameter { .. } => "invalid_parameter",
            MotorsportError::UnknownSession(_) => "unknown_session",
            MotorsportError::EventNotFound { .. } => "event_not_found",
            MotorsportError::DataNotAvailable(_) => "data_not_available",
            MotorsportError::UpstreamError(_) => "upstream",
            MotorsportError::UpstreamStatus { .. } => "upstream_status",
            MotorsportError::DecodeError(_) => "decode",
            MotorsportError::StorageError(_) => "storage",
            MotorsportError::ObjectNotFound(_) => "object_not_found",
            MotorsportError::CacheError(_) => "cache",
            MotorsportError::RenderError(_) => "render",
            MotorsportError::NotifyError(_) => "notify",
            MotorsportError::InternalError(_) => "internal",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            MotorsportError::InvalidParameter { .. } | MotorsportError::UnknownSession(_) => 400,

            MotorsportError::EventNotFound { .. }
            | MotorsportError::DataNotAvailable(_)
            | MotorsportError::ObjectNotFound(_) => 404,

            MotorsportError::UpstreamError(_)
            | MotorsportError::UpstreamStatus { .. }
            | MotorsportError::DecodeError(_)
            | MotorsportError::NotifyError(_) => 502,

            _ => 500,
        }
    }
}

impl From<std::io::Error> for MotorsportError {
    fn from(err: std::io::Error) -> Self {
        MotorsportError::InternalError(err.to_string())
    }
}

impl From<serde_json::Error> for MotorsportError {
    fn from(err: serde_json::Error) -> Self {
        MotorsportError::DecodeError(err.to_string())
    }
}
