//! HTTP request handlers.

mod cron;
mod download;
mod health;
mod manifest;
mod notify;
mod schedule;
mod session;
mod standings;

pub use cron::cron_run_handler;
pub use download::download_handler;
pub use health::{health_handler, metrics_handler};
pub use manifest::{manifest_handler, probe_manifest, ManifestQuery, ManifestStatus};
pub use notify::worker_update_handler;
pub use schedule::schedule_handler;
pub use session::{session_generate_handler, session_kind_generate_handler, SessionRequest};
pub use standings::{constructor_standings_handler, driver_standings_handler};

use axum::Json;
use chrono::Utc;
use metrics::counter;
use serde::Serialize;
use tracing::warn;

use motorsport_common::MotorsportResult;

/// Payload of the generation routes.
///
/// Failures are reported in the body with HTTP 200; the variant of the
/// underlying error only reaches the logs.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum GenerateResponse<T> {
    Ready(T),
    Unavailable {
        #[serde(skip_serializing_if = "Option::is_none")]
        event: Option<String>,
    },
    Error {
        #[serde(skip_serializing_if = "Option::is_none")]
        event: Option<String>,
        details: String,
    },
}

impl<T> GenerateResponse<T> {
    pub fn status(&self) -> &'static str {
        match self {
            GenerateResponse::Ready(_) => "ready",
            GenerateResponse::Unavailable { .. } => "unavailable",
            GenerateResponse::Error { .. } => "error",
        }
    }
}

/// Flatten a pipeline outcome into the response envelope and count it.
pub(crate) fn generation_response<T: Serialize>(
    kind: &'static str,
    event: Option<String>,
    outcome: MotorsportResult<Option<T>>,
) -> Json<GenerateResponse<T>> {
    let response = match outcome {
        Ok(Some(ready)) => GenerateResponse::Ready(ready),
        Ok(None) => GenerateResponse::Unavailable { event },
        Err(e) => {
            warn!(kind = kind, error_kind = e.kind(), error = %e, "Generation failed");
            GenerateResponse::Error {
                event,
                details: e.to_string(),
            }
        }
    };

    counter!("yaru_generate_total", "kind" => kind, "status" => response.status()).increment(1);
    Json(response)
}

/// Current UTC time as RFC 3339.
pub(crate) fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use motorsport_common::MotorsportError;
    use serde_json::json;

    #[derive(Serialize)]
    struct Payload {
        event: String,
        results: Vec<u32>,
    }

    #[test]
    fn test_ready_is_flattened() {
        let Json(response) = generation_response(
            "test",
            None,
            Ok(Some(Payload {
                event: "Monza Race".into(),
                results: vec![1, 2],
            })),
        );
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"status": "ready", "event": "Monza Race", "results": [1, 2]})
        );
    }

    #[test]
    fn test_unavailable_and_error() {
        let Json(response) =
            generation_response::<Payload>("test", Some("Monza Sprint".into()), Ok(None));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"status": "unavailable", "event": "Monza Sprint"})
        );

        let Json(response) = generation_response::<Payload>(
            "test",
            None,
            Err(MotorsportError::DataNotAvailable("standings".into())),
        );
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status"], "error");
        assert!(value["details"].as_str().unwrap().contains("standings"));
    }
}
