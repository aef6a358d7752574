//! Integration tests for login, registration, logout and routing.
//!
//! Each test starts its own fake API and console on ephemeral ports.

use minishop_integration_tests::{TestApp, location};
use reqwest::StatusCode;

// ============================================================================
// Routing
// ============================================================================

#[tokio::test]
async fn test_health() {
    let app = TestApp::spawn().await;

    let resp = app.get("/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("Failed to read body"), "ok");
}

#[tokio::test]
async fn test_unknown_paths_redirect_to_login() {
    let app = TestApp::spawn().await;

    for path in ["/", "/nulle-part", "/clients/abc/xyz/zz"] {
        let resp = app.get(path).await;
        assert!(resp.status().is_redirection(), "{path}");
        assert_eq!(location(&resp).as_deref(), Some("/login"), "{path}");
    }
}

#[tokio::test]
async fn test_anonymous_visitors_are_sent_to_login() {
    let app = TestApp::spawn().await;

    for path in ["/dashboard", "/clients", "/produits", "/commandes", "/stats", "/compte"] {
        let resp = app.get(path).await;
        assert_eq!(location(&resp).as_deref(), Some("/login"), "{path}");
    }
    assert_eq!(app.api.count("AllClients"), 0);
}

#[tokio::test]
async fn test_security_headers_and_request_id() {
    let app = TestApp::spawn().await;

    let resp = app.get("/login").await;
    let headers = resp.headers();
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert!(headers.contains_key("content-security-policy"));
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_static_stylesheet_is_served() {
    let app = TestApp::spawn().await;

    let resp = app.get("/static/css/main.css").await;
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_success_stores_token() {
    let app = TestApp::spawn().await;
    app.login("soa", "secret").await;

    let body = app.page("/dashboard").await;
    assert!(body.contains("Tableau de bord"));
    assert!(body.contains("soa"));

    let op = app.api.last("AllCommandes").expect("orders were fetched");
    assert_eq!(op.authorization.as_deref(), Some("JWT token-soa"));
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_form("/login", &[("username", "soa"), ("password", "faux")])
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("Identifiants incorrects."));

    let resp = app.get("/dashboard").await;
    assert_eq!(location(&resp).as_deref(), Some("/login"));
}

#[tokio::test]
async fn test_login_with_empty_fields_sends_nothing() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_form("/login", &[("username", ""), ("password", "")])
        .await;
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("Ce champ est obligatoire."));
    assert_eq!(app.api.count("TokenAuth"), 0);
}

#[tokio::test]
async fn test_login_page_redirects_when_logged_in() {
    let app = TestApp::spawn().await;
    app.login("admin", "admin123").await;

    let resp = app.get("/login").await;
    assert_eq!(location(&resp).as_deref(), Some("/dashboard"));
}

// ============================================================================
// Logout
// ============================================================================

#[tokio::test]
async fn test_logout_asks_for_confirmation() {
    let app = TestApp::spawn().await;
    app.login("soa", "secret").await;

    let body = app.page("/logout?from=/clients").await;
    assert!(body.contains("Voulez-vous vous déconnecter ?"));
    assert!(body.contains("Oui"));
    assert!(body.contains("Non"));

    // Still logged in until "Oui" is posted
    assert_eq!(app.get("/dashboard").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_logout_clears_session() {
    let app = TestApp::spawn().await;
    app.login("soa", "secret").await;

    let resp = app.post_form("/logout", &[]).await;
    assert_eq!(location(&resp).as_deref(), Some("/login"));

    let resp = app.get("/dashboard").await;
    assert_eq!(location(&resp).as_deref(), Some("/login"));
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_form(
            "/register",
            &[
                ("username", "nirina"),
                ("password", "motdepasse"),
                ("email", "nirina@minishop.test"),
                ("role", "vendeur"),
            ],
        )
        .await;
    assert_eq!(
        location(&resp).as_deref(),
        Some("/login?message=registered")
    );

    let op = app.api.last("RegisterUser").expect("registration was sent");
    assert_eq!(op.variables["role"], "vendeur");
    assert_eq!(op.variables["email"], "nirina@minishop.test");

    let body = app.page("/login?message=registered").await;
    assert!(body.contains("Inscription réussie"));

    app.login("nirina", "motdepasse").await;
}

#[tokio::test]
async fn test_register_failure_shows_generic_error() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_form(
            "/register",
            &[("username", "soa"), ("password", "x"), ("role", "admin")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("Une erreur"));
}

#[tokio::test]
async fn test_register_rejects_unknown_role() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_form(
            "/register",
            &[("username", "x"), ("password", "x"), ("role", "client")],
        )
        .await;
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("Rôle invalide."));
    assert_eq!(app.api.count("RegisterUser"), 0);
}

// ============================================================================
// Account
// ============================================================================

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::spawn().await;
    app.login("soa", "secret").await;

    let resp = app
        .post_form(
            "/compte",
            &[
                ("old_password", "secret"),
                ("new_password", "nouveau"),
                ("confirm_password", "autre"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("Les mots de passe ne correspondent pas."));
    assert_eq!(app.api.count("ChangePassword"), 0);

    let resp = app
        .post_form(
            "/compte",
            &[
                ("old_password", "secret"),
                ("new_password", "nouveau"),
                ("confirm_password", "nouveau"),
            ],
        )
        .await;
    assert_eq!(
        location(&resp).as_deref(),
        Some("/compte?message=password_changed")
    );

    app.post_form("/logout", &[]).await;
    app.login("soa", "nouveau").await;
}
