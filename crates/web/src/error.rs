//! Unified error handling with Sentry integration.
//!
//! Provides an `AppError` type that captures server-side errors to Sentry
//! before responding. Expected failures (a rejected form, an API error shown
//! next to a list) are rendered inline by the handlers and never reach here.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::ApiError;

/// Application-level error type for the console.
#[derive(Debug, Error)]
pub enum AppError {
    /// Shop API operation failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Api(_) | Self::Session(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Api(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Session(_) => "Erreur interne du serveur".to_string(),
            Self::Api(err) => format!("Erreur : {}", err.user_message()),
            Self::NotFound(what) => format!("Introuvable : {what}"),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
