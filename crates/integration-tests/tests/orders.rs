//! Integration tests for the order history and the order form.

use minishop_integration_tests::{TestApp, location};
use reqwest::StatusCode;

async fn logged_in() -> TestApp {
    let app = TestApp::spawn().await;
    app.login("soa", "secret").await;
    app
}

fn product_selects(body: &str) -> usize {
    body.matches("name=\"product_id\"").count()
}

#[tokio::test]
async fn test_order_history() {
    let app = logged_in().await;

    let body = app.page("/commandes").await;
    assert!(body.contains("📋 Historique des commandes"));
    assert!(body.contains("Commande #1 - 01/06/2025 10:00"));
    assert!(body.contains("Vendeur : soa"));
    assert!(body.contains("Total : 25 000 Ar"));
}

#[tokio::test]
async fn test_new_order_lists_only_sellers() {
    let app = logged_in().await;

    let body = app.page("/commandes/new").await;
    assert!(body.contains(">soa</option>"));
    assert!(body.contains(">bema</option>"));
    assert!(!body.contains(">admin</option>"));
    assert!(body.contains("Riz (Prix : 2 500 Ar)"));
    assert_eq!(product_selects(&body), 1);
}

#[tokio::test]
async fn test_add_and_remove_lines() {
    let app = logged_in().await;

    let resp = app
        .post_form(
            "/commandes/new",
            &[
                ("seller_id", "2"),
                ("product_id", "1"),
                ("quantity", "2"),
                ("action", "add_line"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    assert_eq!(product_selects(&body), 2);
    assert!(body.contains("<option value=\"2\" selected>soa</option>"));
    assert!(body.contains("value=\"remove_line:1\""));

    let resp = app
        .post_form(
            "/commandes/new",
            &[
                ("seller_id", "2"),
                ("product_id", "1"),
                ("quantity", "2"),
                ("product_id", "2"),
                ("quantity", "1"),
                ("action", "remove_line:0"),
            ],
        )
        .await;
    let body = resp.text().await.expect("Failed to read body");
    assert_eq!(product_selects(&body), 1);
    assert!(body.contains("<option value=\"2\" selected>Vanille"));
    assert!(!body.contains("remove_line"));

    assert_eq!(app.api.count("CreateCommande"), 0);
}

#[tokio::test]
async fn test_invalid_order_sends_nothing() {
    let app = logged_in().await;

    let resp = app
        .post_form(
            "/commandes/new",
            &[
                ("seller_id", ""),
                ("product_id", ""),
                ("quantity", "0"),
                ("action", "submit"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("Choisissez un vendeur."));
    assert!(body.contains("Choisissez un produit."));
    assert_eq!(app.api.count("CreateCommande"), 0);
}

#[tokio::test]
async fn test_create_order() {
    let app = logged_in().await;
    app.page("/commandes").await;

    let resp = app
        .post_form(
            "/commandes/new",
            &[
                ("action", "submit"),
                ("seller_id", "3"),
                ("product_id", "1"),
                ("quantity", "2"),
                ("product_id", "2"),
                ("quantity", "1"),
            ],
        )
        .await;
    assert_eq!(
        location(&resp).as_deref(),
        Some("/commandes?message=created")
    );
    assert_eq!(app.api.order_count(), 2);

    let op = app.api.last("CreateCommande").expect("order was created");
    assert_eq!(op.variables["vendeurId"], "3");
    assert_eq!(op.variables["lignes"][0]["produitId"], "1");
    assert_eq!(op.variables["lignes"][0]["quantite"], 2);
    assert_eq!(op.variables["lignes"][1]["produitId"], "2");

    let body = app.page("/commandes?message=created").await;
    assert!(body.contains("✅ Commande créée avec succès !"));
    assert!(body.contains("02/06/2025 09:30"));
    assert!(body.contains("Vendeur : bema"));
    assert!(body.contains("Total : 20 000 Ar"));
}

#[tokio::test]
async fn test_rejected_order_keeps_form() {
    let app = logged_in().await;
    app.api.fail("CreateCommande");

    let resp = app
        .post_form(
            "/commandes/new",
            &[
                ("seller_id", "2"),
                ("product_id", "2"),
                ("quantity", "5"),
                ("action", "submit"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("Erreur : CreateCommande a échoué"));
    assert!(body.contains("value=\"5\""));
    assert_eq!(app.api.order_count(), 1);
}
