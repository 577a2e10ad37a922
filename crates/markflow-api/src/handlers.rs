//! API request handlers

pub mod analyze;
pub mod generate;
pub mod health;
pub mod templates;

use axum::http::StatusCode;
use axum::Json;
use markflow_common::Error;
use serde::Serialize;
use tracing::error;

/// Error response body
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
    /// Machine-readable code
    pub code: String,
}

/// Map a domain error onto an HTTP error response
pub fn error_response(err: &Error) -> (StatusCode, Json<ErrorResponse>) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(error = %err, "Request failed");
    }
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            code: err.code().to_string(),
        }),
    )
}

/// Build a 400 validation error
pub fn validation_error(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
            code: "INVALID_INPUT".to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_mapping() {
        let (status, body) = error_response(&Error::NotFound("Template x not found".into()));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, "NOT_FOUND");

        let (status, _) = error_response(&Error::Fetch {
            status: 403,
            message: "Forbidden".into(),
        });
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }
}
