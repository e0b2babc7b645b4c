use std::time::Duration;

use axum::{http::StatusCode, response::IntoResponse, Json};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The client-side timeout fired before the upstream answered.
    #[error("Timeout: {endpoint} did not respond within {}s", .timeout.as_secs_f64())]
    Timeout { endpoint: String, timeout: Duration },

    /// Connection-level failure (DNS, refused, TLS, reset).
    #[error("CORS/connection error: unable to reach {base_url}")]
    Network {
        base_url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx response with the upstream status preserved.
    #[error("API Error: {status} {status_text}")]
    Http { status: u16, status_text: String },

    #[error("Invalid response: {0}")]
    Parse(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Failures the sport feed hides behind mock data: timeout, connection
    /// failure, or any 5xx.
    pub fn is_soft_failure(&self) -> bool {
        match self {
            AppError::Timeout { .. } | AppError::Network { .. } => true,
            AppError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Timeout { .. }
            | AppError::Network { .. }
            | AppError::Http { .. }
            | AppError::Parse(_)
            | AppError::Request(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soft_failures_cover_timeout_and_5xx_only() {
        let timeout = AppError::Timeout {
            endpoint: "/api/predictions".to_string(),
            timeout: Duration::from_secs(10),
        };
        assert!(timeout.is_soft_failure());
        assert_eq!(
            timeout.to_string(),
            "Timeout: /api/predictions did not respond within 10s"
        );

        let server = AppError::Http { status: 503, status_text: "Service Unavailable".into() };
        assert!(server.is_soft_failure());

        let client = AppError::Http { status: 404, status_text: "Not Found".into() };
        assert!(!client.is_soft_failure());
        assert_eq!(client.to_string(), "API Error: 404 Not Found");

        assert!(!AppError::Parse("eof".into()).is_soft_failure());
    }
}
