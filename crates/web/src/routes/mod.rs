//! HTTP route handlers for the console.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Health check (plain "ok")
//! GET  /static/*                - CSS and images
//!
//! # Auth
//! GET  /login                   - Login page
//! POST /login                   - Login action
//! GET  /register                - Register page
//! POST /register                - Register action
//! GET  /logout?from=<path>      - Logout confirmation
//! POST /logout                  - Logout action
//!
//! # Shell (requires auth)
//! GET  /dashboard               - Tableau de bord
//! GET  /stats                   - Statistiques
//! GET  /compte                  - Account page
//! POST /compte                  - Change password
//!
//! # Clients (requires auth)
//! GET  /clients                 - List (?q= filter, ?message= flash)
//! POST /clients                 - Create
//! GET  /clients/new             - New form
//! POST /clients/{id}            - Update
//! GET  /clients/{id}/edit       - Edit form
//! GET  /clients/{id}/delete     - Delete confirmation
//! POST /clients/{id}/delete     - Delete
//!
//! # Products (requires auth)
//! /produits/...                 - Same shape as /clients
//!
//! # Orders (requires auth)
//! GET  /commandes               - Order history
//! GET  /commandes/new           - New order form
//! POST /commandes/new           - Add/remove a line or place the order
//! ```
//!
//! Any other path redirects to `/login`.

pub mod account;
pub mod auth;
pub mod clients;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod shell;
pub mod stats;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use serde::Deserialize;

use crate::middleware::LOGIN_PATH;
use crate::state::AppState;

/// Query parameters carrying a flash message code.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub message: Option<String>,
}

/// Query parameters of the searchable list pages.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Name filter, applied as typed.
    #[serde(default)]
    pub q: String,
    pub message: Option<String>,
}

/// Look up the flash text for a message code.
///
/// Unknown codes show nothing, so a crafted URL cannot inject text.
#[must_use]
pub fn notice(table: &[(&str, &'static str)], code: Option<&str>) -> Option<&'static str> {
    let code = code?;
    table
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, text)| *text)
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", get(shell::confirm).post(shell::logout))
}

/// Create the client routes router.
pub fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(clients::index).post(clients::create))
        .route("/new", get(clients::new))
        .route("/{id}", post(clients::update))
        .route("/{id}/edit", get(clients::edit))
        .route(
            "/{id}/delete",
            get(clients::confirm_delete).post(clients::delete),
        )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/new", get(products::new))
        .route("/{id}", post(products::update))
        .route("/{id}/edit", get(products::edit))
        .route(
            "/{id}/delete",
            get(products::confirm_delete).post(products::delete),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/new", get(orders::new).post(orders::submit))
}

/// Create all routes for the console.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .route("/dashboard", get(dashboard::show))
        .route("/stats", get(stats::show))
        .route(
            "/compte",
            get(account::show).post(account::change_password),
        )
        .nest("/clients", client_routes())
        .nest("/produits", product_routes())
        .nest("/commandes", order_routes())
        .fallback(unmatched)
}

/// Unknown paths go to the login page.
async fn unmatched() -> Redirect {
    Redirect::to(LOGIN_PATH)
}
