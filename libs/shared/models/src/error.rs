use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// A single violated constraint on an input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),

    #[error("Internal Server Error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Auth(msg) => error_response(StatusCode::UNAUTHORIZED, &msg),
            AppError::NotFound(msg) => error_response(StatusCode::NOT_FOUND, &msg),
            AppError::BadRequest(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
            AppError::Validation(violations) => {
                let body = Json(json!({
                    "error": "Validation failed",
                    "details": violations,
                }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            // Store and internal failures are logged with full detail but
            // surface to callers as a generic message only.
            AppError::Internal(msg) | AppError::Database(msg) => {
                tracing::error!("Internal error: {}", msg);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    tracing::error!("Error: {}: {}", status, message);

    let body = Json(json!({
        "error": message
    }));

    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_keeps_every_violation() {
        let err = AppError::Validation(vec![
            FieldViolation::new("durationMinutes", "must be between 15 and 480"),
            FieldViolation::new("customerEmail", "must be a valid email address"),
        ]);
        let AppError::Validation(violations) = &err else {
            panic!("expected validation variant");
        };
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].field, "durationMinutes");
    }

    #[test]
    fn internal_detail_is_not_in_the_body() {
        let response = AppError::Database("connection refused on 10.0.0.3".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
