//! API error handling for consistent JSON error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::pipeline::PipelineError;
use crate::retrieval::RetrievalError;

/// API error type that converts to JSON responses.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            kind,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_request", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": true,
            "kind": self.kind,
            "message": self.message,
        }));
        (self.status, body).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err.to_string())
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        error!("Request failed: {}", err);

        let message = err.to_string();
        match err {
            PipelineError::Configuration(_) => {
                Self::new(StatusCode::BAD_REQUEST, "configuration", message)
            }
            PipelineError::Retrieval(RetrievalError::AuthenticationRequired) => Self::new(
                StatusCode::UNAUTHORIZED,
                "authentication_required",
                message,
            ),
            PipelineError::Retrieval(RetrievalError::CookieSourceUnavailable { .. }) => {
                Self::new(StatusCode::BAD_REQUEST, "cookie_source_unavailable", message)
            }
            PipelineError::Retrieval(_) => Self::new(StatusCode::BAD_GATEWAY, "retrieval", message),
            PipelineError::Workflow(_) => Self::new(StatusCode::BAD_GATEWAY, "workflow", message),
            PipelineError::Io(_) => Self::internal(message),
        }
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::WorkflowError;

    #[test]
    fn test_pipeline_errors_map_to_statuses() {
        let cases = [
            (
                PipelineError::Configuration("missing".into()),
                StatusCode::BAD_REQUEST,
                "configuration",
            ),
            (
                PipelineError::Retrieval(RetrievalError::AuthenticationRequired),
                StatusCode::UNAUTHORIZED,
                "authentication_required",
            ),
            (
                PipelineError::Retrieval(RetrievalError::CookieSourceUnavailable {
                    browser: "chrome".into(),
                    detail: "could not find".into(),
                }),
                StatusCode::BAD_REQUEST,
                "cookie_source_unavailable",
            ),
            (
                PipelineError::Retrieval(RetrievalError::ToolFailed {
                    stderr: "boom".into(),
                }),
                StatusCode::BAD_GATEWAY,
                "retrieval",
            ),
            (
                PipelineError::Workflow(WorkflowError::EmptyResponse),
                StatusCode::BAD_GATEWAY,
                "workflow",
            ),
        ];

        for (err, status, kind) in cases {
            let api_error = ApiError::from(err);
            assert_eq!(api_error.status(), status);
            assert_eq!(api_error.kind(), kind);
        }
    }
}
