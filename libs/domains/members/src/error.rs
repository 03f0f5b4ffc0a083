use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Why an authentication attempt was rejected.
///
/// Kept distinguishable for operator diagnosis; the HTTP boundary collapses
/// all three into one generic message so callers cannot enumerate accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    UnknownIdentifier,
    InvalidCredentials,
    InactiveAccount,
}

#[derive(Debug, Error)]
pub enum MemberError {
    /// One or more field rules violated; the message is the `; `-joined list
    #[error("{0}")]
    Validation(String),

    #[error("Member not found")]
    NotFound,

    /// Duplicate username/email/phone
    #[error("{0}")]
    Conflict(String),

    #[error("Authentication failed")]
    Authentication(AuthFailure),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type MemberResult<T> = Result<T, MemberError>;

impl IntoResponse for MemberError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            MemberError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "validation_error", msg.clone())
            }
            MemberError::NotFound => (
                StatusCode::NOT_FOUND,
                "not_found",
                "Member not found".to_string(),
            ),
            MemberError::Conflict(msg) => (StatusCode::CONFLICT, "duplicate", msg.clone()),
            MemberError::Authentication(reason) => {
                tracing::warn!(?reason, "Authentication rejected");
                (
                    StatusCode::UNAUTHORIZED,
                    "authentication_failed",
                    "Invalid username/email or password".to_string(),
                )
            }
            MemberError::PasswordHash(msg) => {
                tracing::error!("Password hash error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            MemberError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        (
            status,
            Json(json!({
                "error": {
                    "type": error_type,
                    "message": message
                }
            })),
        )
            .into_response()
    }
}
