//! Dashboard shell: navigation and the logout confirmation.
//!
//! Every authenticated page renders inside the shell. Logging out is a
//! two-step flow: `GET /logout?from=<path>` asks "Voulez-vous vous
//! déconnecter ?"; "Oui" posts to `/logout`, "Non" goes back to `from`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::Query,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user};
use crate::filters;
use crate::middleware::{LOGIN_PATH, RequireAuth, clear_current_user};
use crate::models::CurrentUser;

/// Where "Non" leads when `from` is missing or not a shell page.
pub const DEFAULT_SHELL_PATH: &str = "/dashboard";

/// Navigation entries in display order.
pub const NAV_ENTRIES: [(&str, &str); 6] = [
    ("/dashboard", "Tableau de Bord"),
    ("/produits", "Produits"),
    ("/commandes", "Commandes"),
    ("/clients", "Clients"),
    ("/stats", "Statistiques"),
    ("/compte", "Mon compte"),
];

/// One sidebar link.
#[derive(Debug, Clone)]
pub struct NavEntry {
    pub path: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Data shared by every page rendered inside the shell.
#[derive(Debug, Clone)]
pub struct ShellView {
    pub username: String,
    pub role_label: &'static str,
    pub nav: Vec<NavEntry>,
    /// Link to the logout confirmation, returning to the current page.
    pub logout_href: String,
}

impl ShellView {
    /// Build the shell for `user` on the page at `path`.
    #[must_use]
    pub fn new(user: &CurrentUser, path: &str) -> Self {
        let nav = NAV_ENTRIES
            .iter()
            .map(|&(entry, label)| NavEntry {
                path: entry,
                label,
                active: is_under(path, entry),
            })
            .collect();

        Self {
            username: user.username.clone(),
            role_label: user.role_label(),
            nav,
            logout_href: format!("/logout?from={}", urlencoding::encode(path)),
        }
    }
}

/// `path` is `section` itself or one of its sub-pages.
fn is_under(path: &str, section: &str) -> bool {
    path.strip_prefix(section)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'))
}

/// `from` when it points inside the shell, [`DEFAULT_SHELL_PATH`] otherwise.
#[must_use]
pub fn return_path(from: Option<&str>) -> String {
    match from {
        Some(path)
            if !path.contains('\\')
                && NAV_ENTRIES.iter().any(|(section, _)| is_under(path, section)) =>
        {
            path.to_string()
        }
        _ => DEFAULT_SHELL_PATH.to_string(),
    }
}

/// Query parameters of the logout confirmation.
#[derive(Debug, Deserialize)]
pub struct LogoutQuery {
    pub from: Option<String>,
}

/// Logout confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "logout.html")]
pub struct LogoutTemplate {
    pub shell: ShellView,
    pub cancel_href: String,
}

/// Ask for confirmation before logging out.
///
/// GET /logout
#[instrument(skip_all)]
pub async fn confirm(
    RequireAuth(auth): RequireAuth,
    Query(query): Query<LogoutQuery>,
) -> impl IntoResponse {
    let cancel_href = return_path(query.from.as_deref());
    LogoutTemplate {
        shell: ShellView::new(&auth.user, &cancel_href),
        cancel_href,
    }
}

/// Clear the session and go back to the login page.
///
/// A session store failure is an error page, never a redirect: the token
/// would still be stored.
///
/// POST /logout
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Response> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    tracing::info!("User logged out");

    Ok(Redirect::to(LOGIN_PATH).into_response())
}
