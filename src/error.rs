use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),
    #[error("Event is full")]
    EventFull,
    #[error("Phone number already registered for this event")]
    DuplicateAttendee,
    #[error("Invalid phone number")]
    InvalidPhone,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(vec![msg.into()])
    }

    /// Stable reason code clients switch on.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "StoreError",
            AppError::NotFound(_) => "NotFound",
            AppError::Validation(_) => "ValidationFailed",
            AppError::EventFull => "EventFull",
            AppError::DuplicateAttendee => "DuplicateAttendee",
            AppError::InvalidPhone => "InvalidPhone",
            AppError::InvalidCredentials => "InvalidCredentials",
            AppError::Internal | AppError::InternalWithMsg(_) => "InternalError",
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message, details) = match &self {
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    let db_code = db_err.code().unwrap_or_default();

                    // 2067 = SQLite Unique Constraint
                    // 23505 = PostgreSQL Unique Violation
                    if db_code == "2067" || db_code == "23505" {
                        return (
                            StatusCode::CONFLICT,
                            Json(json!({
                                "error": "Resource already exists (duplicate entry)",
                                "code": "Conflict",
                            }))
                        ).into_response();
                    }
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string(), None)
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                Some(fields.clone()),
            ),
            AppError::EventFull
            | AppError::DuplicateAttendee
            | AppError::InvalidPhone => (StatusCode::BAD_REQUEST, self.to_string(), None),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string(), None),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string(), None),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string(), None)
            }
        };

        let body = match details {
            Some(details) => json!({ "error": message, "code": code, "details": details }),
            None => json!({ "error": message, "code": code }),
        };

        (status, Json(body)).into_response()
    }
}

/// Failures that abort process start-up.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Bootstrap error: {0}")]
    Bootstrap(#[from] AppError),
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}
