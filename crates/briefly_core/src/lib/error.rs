use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing or invalid input: {0}")]
    Validation(String),
    #[error("missing user identity")]
    Unauthorized,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("backend error: {status} - {message}")]
    Backend { status: u16, message: String },
    #[error("upstream returned an empty response")]
    EmptyResponse,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Backend { .. } | Error::EmptyResponse | Error::Http(_) => {
                StatusCode::BAD_GATEWAY
            }
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }

        let body = match &self {
            Error::Internal(e) => json!({
                "error": "Internal Server Error",
                "details": e.to_string(),
            }),
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
