//! Authentication extractors and session helpers.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use secrecy::{ExposeSecret, SecretString};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};

/// Path anonymous visitors are sent to.
pub const LOGIN_PATH: &str = "/login";

/// A logged-in user together with the API token of their session.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: CurrentUser,
    pub token: SecretString,
}

/// Extractor that requires a logged-in user.
///
/// If nobody is logged in, returns a redirect to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(auth): RequireAuth) -> impl IntoResponse {
///     format!("Bonjour, {} !", auth.user.username)
/// }
/// ```
pub struct RequireAuth(pub AuthSession);

/// Error returned when authentication is required but nobody is logged in.
pub enum AuthRejection {
    /// Redirect to the login page.
    RedirectToLogin,
    /// The session layer is missing.
    NoSession,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::NoSession => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::NoSession)?;

        let user: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection::RedirectToLogin)?;

        let token: String = session
            .get(session_keys::AUTH_TOKEN)
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection::RedirectToLogin)?;

        Ok(Self(AuthSession {
            user,
            token: SecretString::from(token),
        }))
    }
}

/// Extractor that optionally gets the current user.
///
/// Used by the login and register pages to send logged-in users onward.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Store the logged-in user and their API token in the session.
///
/// The session id is cycled first so a pre-login id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
    token: &SecretString,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await?;
    session
        .insert(session_keys::AUTH_TOKEN, token.expose_secret())
        .await
}

/// Clear the whole session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
