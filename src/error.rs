//! Domain error types for the internship registry.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header::ContentType};

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A required form field is missing or blank
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Uploaded file is missing, has no extension, or has a disallowed extension
    #[error("Invalid file: {0}")]
    InvalidFile(String),

    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Filesystem operation failed
    #[error("Filesystem error: {0}")]
    FileSystem(String),

    /// Template rendering failed
    #[error("Render error: {0}")]
    Render(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status, message) = match self {
            AppError::Validation(_) | AppError::InvalidFile(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                )
            }
            AppError::FileSystem(err) => {
                tracing::error!("Filesystem error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal storage error occurred".to_string(),
                )
            }
            AppError::Render(err) => {
                tracing::error!("Render error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal rendering error occurred".to_string(),
                )
            }
        };

        HttpResponse::build(status)
            .content_type(ContentType::html())
            .body(error_page(status, &message))
    }
}

/// Minimal standalone error page for responses that bypass the template layer.
fn error_page(status: StatusCode, message: &str) -> String {
    format!(
        "<!doctype html>\n<html><head><title>{status}</title></head>\
         <body><h1>{status}</h1><p>{}</p></body></html>",
        escape_html(message)
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

impl From<minijinja::Error> for AppError {
    fn from(err: minijinja::Error) -> Self {
        AppError::Render(err.to_string())
    }
}
