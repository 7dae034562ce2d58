// src/errors.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// The feed document is missing keys every cycle depends on.
    #[error("Malformed feed: {0}")]
    MalformedFeed(String),

    /// An aggregator was handed a category in the wrong match status.
    #[error("Invalid state: expected '{expected}' match, found '{found}'")]
    InvalidState { expected: &'static str, found: String },

    #[error("MongoDB error: {0}")]
    MongoDB(#[from] mongodb::error::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Document not found")]
    DocumentNotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Service error: {0}")]
    ServiceError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::MalformedFeed(_) => (StatusCode::BAD_GATEWAY, "Malformed feed".to_string()),
            AppError::InvalidState { .. } => (StatusCode::CONFLICT, "Invalid match state".to_string()),
            AppError::MongoDB(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string()),
            AppError::Redis(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Cache error".to_string()),
            AppError::DocumentNotFound => (StatusCode::NOT_FOUND, "Document not found".to_string()),
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "Validation failed".to_string()),
            AppError::ExternalApi(_) => (StatusCode::BAD_GATEWAY, "External API error".to_string()),
            AppError::ConfigurationError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Configuration error".to_string()),
            AppError::ServiceError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Service error".to_string()),
        };

        let body = Json(json!({
            "error": error_message,
            "message": self.to_string(),
            "success": false,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }));

        (status, body).into_response()
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ValidationError(format!("JSON parsing error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::ExternalApi(format!("HTTP request failed: {}", err))
    }
}

// Helper conversion functions
impl AppError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        AppError::MalformedFeed(msg.into())
    }

    pub fn invalid_state(expected: &'static str, found: impl Into<String>) -> Self {
        AppError::InvalidState {
            expected,
            found: found.into(),
        }
    }

    pub fn invalid_data(msg: impl Into<String>) -> Self {
        AppError::ValidationError(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::ConfigurationError(msg.into())
    }

    pub fn service(msg: impl Into<String>) -> Self {
        AppError::ServiceError(msg.into())
    }

    /// Errors that belong to a single feed category rather than the whole cycle.
    pub fn is_category_local(&self) -> bool {
        matches!(
            self,
            AppError::MalformedFeed(_) | AppError::InvalidState { .. } | AppError::ValidationError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
