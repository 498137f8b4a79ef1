//! Mapping of request failures onto HTTP responses.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ocrelay_core::RelayError;
use serde_json::json;
use tracing::{error, warn};

/// Anything an API handler can fail with.
#[derive(Debug)]
pub enum ApiError {
    Relay(RelayError),
    /// The multipart stream itself was unreadable (truncated, over the size limit).
    Multipart(MultipartError),
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        ApiError::Relay(err)
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Multipart(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Relay(err) => relay_error_response(err),
            ApiError::Multipart(err) => {
                (err.status(), Json(json!({ "error": err.body_text() }))).into_response()
            }
        }
    }
}

fn relay_error_response(err: RelayError) -> Response {
    if err.is_client_error() {
        warn!(error = %err, "Rejected request");
    } else {
        error!(error = %err, "Extraction failed");
    }
    match err {
        RelayError::MissingInput => {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": err.to_string() }))).into_response()
        }
        RelayError::Misconfiguration { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
        RelayError::TransportFailure(details) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to call Gemini API", "details": details })),
        )
            .into_response(),
        RelayError::UpstreamError { status, body } => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            (status, Json(json!({ "error": "Gemini API error", "details": body }))).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn parts(err: RelayError) -> (StatusCode, Value) {
        let resp = ApiError::from(err).into_response();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_input_is_400() {
        let (status, body) = parts(RelayError::MissingInput).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Image file is required." }));
    }

    #[tokio::test]
    async fn misconfiguration_is_500() {
        let (status, body) = parts(RelayError::Misconfiguration {
            keys: vec!["GEMINI_API_KEY".into(), "GoogleAI:ApiKey".into()],
        })
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["error"],
            "Gemini API key is not configured. Set GEMINI_API_KEY or GoogleAI:ApiKey."
        );
    }

    #[tokio::test]
    async fn transport_failure_carries_details() {
        let (status, body) = parts(RelayError::TransportFailure("operation timed out".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "error": "Failed to call Gemini API", "details": "operation timed out" })
        );
    }

    #[tokio::test]
    async fn upstream_status_is_forwarded() {
        let (status, body) = parts(RelayError::UpstreamError {
            status: 403,
            body: "API key not valid".into(),
        })
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({ "error": "Gemini API error", "details": "API key not valid" }));
    }

    #[tokio::test]
    async fn invalid_upstream_status_becomes_bad_gateway() {
        let (status, _) = parts(RelayError::UpstreamError { status: 42, body: String::new() }).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }
}
