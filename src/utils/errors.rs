//! Error handling for Eventify
//!
//! This module defines the main error types used throughout the application
//! and maps them onto HTTP responses. Every registration precondition gets
//! its own variant so callers always see a distinct, user-facing kind; raw
//! storage errors only ever surface as a generic unexpected failure.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Main error type for the Eventify application
#[derive(Error, Debug)]
pub enum EventifyError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account with this email already exists")]
    EmailTaken,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("Event not found")]
    EventNotFound { event_id: i64 },

    #[error("Club not found")]
    ClubNotFound { club_id: i64 },

    #[error("Event is not active")]
    EventInactive { event_id: i64 },

    #[error("Event is full")]
    EventFull { event_id: i64 },

    #[error("Registration deadline has passed")]
    DeadlinePassed { event_id: i64 },

    #[error("You are already registered for this event")]
    AlreadyRegistered { event_id: i64 },

    #[error("You are not registered for this event")]
    NotRegistered { event_id: i64 },

    #[error("Cannot unregister from an event that has already started")]
    EventAlreadyStarted { event_id: i64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Eventify operations
pub type Result<T> = std::result::Result<T, EventifyError>;

impl EventifyError {
    /// HTTP status code this error maps to at the API boundary
    pub fn status_code(&self) -> StatusCode {
        match self {
            EventifyError::UserNotFound { .. }
            | EventifyError::EventNotFound { .. }
            | EventifyError::ClubNotFound { .. } => StatusCode::NOT_FOUND,
            EventifyError::EventInactive { .. }
            | EventifyError::EventFull { .. }
            | EventifyError::DeadlinePassed { .. }
            | EventifyError::AlreadyRegistered { .. }
            | EventifyError::NotRegistered { .. }
            | EventifyError::EventAlreadyStarted { .. }
            | EventifyError::EmailTaken
            | EventifyError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            EventifyError::AuthenticationRequired
            | EventifyError::InvalidCredentials
            | EventifyError::Token(_) => StatusCode::UNAUTHORIZED,
            EventifyError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            EventifyError::Database(_)
            | EventifyError::Migration(_)
            | EventifyError::Config(_)
            | EventifyError::Serialization(_)
            | EventifyError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to API clients. Infrastructure details stay server-side.
    pub fn client_message(&self) -> String {
        if self.status_code() == StatusCode::INTERNAL_SERVER_ERROR {
            "An unexpected error occurred".to_string()
        } else {
            self.to_string()
        }
    }

    /// Check if the error is recoverable by retrying the request
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EventifyError::Database(_) | EventifyError::Io(_))
    }
}

#[derive(Debug, serde::Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

impl IntoResponse for EventifyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed with internal error");
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        let body = ErrorBody {
            success: false,
            message: self.client_message(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_errors_are_bad_requests() {
        assert_eq!(
            EventifyError::EventFull { event_id: 1 }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            EventifyError::DeadlinePassed { event_id: 1 }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            EventifyError::AlreadyRegistered { event_id: 1 }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            EventifyError::EventAlreadyStarted { event_id: 1 }.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_not_found_and_permission_mapping() {
        assert_eq!(
            EventifyError::EventNotFound { event_id: 7 }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            EventifyError::PermissionDenied("nope".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            EventifyError::AuthenticationRequired.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_storage_errors_are_masked() {
        let err = EventifyError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), "An unexpected error occurred");
        // domain errors keep their message
        let err = EventifyError::EventFull { event_id: 1 };
        assert_eq!(err.client_message(), "Event is full");
    }
}
