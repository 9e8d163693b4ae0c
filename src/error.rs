use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A required secret is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A password or session check failed.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// A webhook signature did not match.
    #[error("Invalid signature")]
    InvalidSignature,

    /// The request was not in the expected shape.
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Configuration(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::InvalidSignature => StatusCode::FORBIDDEN,
            AppError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {}", msg);
                msg
            }

            AppError::Authentication(msg) => {
                tracing::warn!("Authentication failed: {}", msg);
                msg
            }

            AppError::InvalidSignature => {
                tracing::warn!("Webhook signature rejected");
                "Invalid signature".to_string()
            }

            AppError::MalformedRequest(msg) => {
                tracing::debug!("Malformed request: {}", msg);
                msg
            }

            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
        };

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "error": message
        }))
        .unwrap_or_else(|_| r#"{"error":"Internal server error"}"#.to_string());

        (
            status,
            [(http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}
