use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("validation failed: {0:?}")]
    Validation(Vec<String>),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("payment signature verification failed")]
    SignatureMismatch,

    #[error("provider error: {0}")]
    Provider(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("not authorized for this action")]
    Forbidden,
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError::Database(e.to_string())
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Database(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": "validation failed", "fields": fields }),
            ),
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                serde_json::json!({ "error": format!("{what} not found") }),
            ),
            AppError::Conflict(msg) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": msg }),
            ),
            AppError::SignatureMismatch => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": "payment signature verification failed" }),
            ),
            AppError::Provider(msg) => (
                StatusCode::BAD_GATEWAY,
                serde_json::json!({
                    "error": msg,
                    "suggestion": "payment provider unavailable, cash booking is still possible",
                }),
            ),
            AppError::Database(detail) | AppError::Internal(detail) => {
                tracing::error!(%detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": "internal server error" }),
                )
            }
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({ "error": "access denied" }),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                serde_json::json!({ "error": "not authorized" }),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::Validation(vec![]), StatusCode::BAD_REQUEST),
            (AppError::NotFound("x".to_string()), StatusCode::NOT_FOUND),
            (AppError::Conflict("taken".to_string()), StatusCode::BAD_REQUEST),
            (AppError::SignatureMismatch, StatusCode::BAD_REQUEST),
            (AppError::Provider("down".to_string()), StatusCode::BAD_GATEWAY),
            (AppError::Database("boom".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::Internal("boom".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AppError::Forbidden, StatusCode::FORBIDDEN),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
