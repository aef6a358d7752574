//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use minishop_core::{Role, UserId};

/// Session-stored user identity.
///
/// Resolved from `allUtilisateurs` at login. The API token is stored
/// separately under [`keys::AUTH_TOKEN`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's API ID.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// `None` when the API reported no usable role.
    pub role: Option<Role>,
}

impl CurrentUser {
    /// Role label for the navigation bar.
    #[must_use]
    pub fn role_label(&self) -> &'static str {
        self.role.map_or("Utilisateur", Role::label)
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the opaque API token sent as `Authorization: JWT <token>`.
    pub const AUTH_TOKEN: &str = "auth_token";
}
