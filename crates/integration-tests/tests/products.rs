//! Integration tests for product management.

use minishop_integration_tests::{TestApp, location};
use reqwest::StatusCode;

#[tokio::test]
async fn test_product_list_shows_price_and_seller() {
    let app = TestApp::spawn().await;
    app.login("soa", "secret").await;

    let body = app.page("/produits").await;
    assert!(body.contains("Gestion des Produits"));
    assert!(body.contains("Riz"));
    assert!(body.contains("2 500 Ar"));
    assert!(body.contains("15 000 Ar"));
    assert!(body.contains("<strong>Vendeur :</strong> soa"));
}

#[tokio::test]
async fn test_product_search() {
    let app = TestApp::spawn().await;
    app.login("soa", "secret").await;

    let body = app.page("/produits?q=vani").await;
    assert!(body.contains("Vanille"));
    assert!(!body.contains("Riz"));
}

#[tokio::test]
async fn test_create_product_belongs_to_current_user() {
    let app = TestApp::spawn().await;
    app.login("bema", "bema").await;
    app.page("/produits").await;

    let resp = app
        .post_form(
            "/produits",
            &[("name", "Sel"), ("price", "1 200,5"), ("stock", "10")],
        )
        .await;
    assert_eq!(
        location(&resp).as_deref(),
        Some("/produits?message=created")
    );

    let op = app.api.last("CreateProduit").expect("product was created");
    assert_eq!(op.variables["vendeurId"], 3);
    assert_eq!(op.variables["prix"], 1200.5);
    assert_eq!(op.variables["stock"], 10);

    let body = app.page("/produits?message=created").await;
    assert!(body.contains("Ajouté avec succès"));
    assert!(body.contains("Sel"));
    assert!(body.contains("1 200,5 Ar"));
}

#[tokio::test]
async fn test_create_product_with_bad_numbers_sends_nothing() {
    let app = TestApp::spawn().await;
    app.login("soa", "secret").await;

    let resp = app
        .post_form(
            "/produits",
            &[("name", "Sel"), ("price", "gratuit"), ("stock", "-3")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("Le prix doit être un nombre."));
    assert!(body.contains("Le stock doit être un nombre entier positif."));
    assert_eq!(app.api.count("CreateProduit"), 0);
}

#[tokio::test]
async fn test_edit_product() {
    let app = TestApp::spawn().await;
    app.login("soa", "secret").await;

    let body = app.page("/produits/1/edit").await;
    assert!(body.contains("value=\"Riz\""));

    let resp = app
        .post_form(
            "/produits/1",
            &[("name", "Riz rouge"), ("price", "3000"), ("stock", "80")],
        )
        .await;
    assert_eq!(
        location(&resp).as_deref(),
        Some("/produits?message=updated")
    );

    let body = app.page("/produits?message=updated").await;
    assert!(body.contains("Modifié avec succès"));
    assert!(body.contains("Riz rouge"));
    assert!(body.contains("3 000 Ar"));
}

#[tokio::test]
async fn test_edit_unknown_product_is_not_found() {
    let app = TestApp::spawn().await;
    app.login("soa", "secret").await;

    let resp = app.get("/produits/999/edit").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_product() {
    let app = TestApp::spawn().await;
    app.login("soa", "secret").await;

    let body = app.page("/produits/1/delete").await;
    assert!(body.contains("Voulez-vous vraiment supprimer ?"));

    let resp = app.post_form("/produits/1/delete", &[]).await;
    assert_eq!(
        location(&resp).as_deref(),
        Some("/produits?message=deleted")
    );
    assert_eq!(app.api.product_names(), ["Vanille"]);

    let body = app.page("/produits?message=deleted").await;
    assert!(body.contains("Supprimé avec succès"));
    assert!(!body.contains("Riz"));
}

#[tokio::test]
async fn test_rejected_create_keeps_form() {
    let app = TestApp::spawn().await;
    app.login("soa", "secret").await;
    app.api.fail("CreateProduit");

    let resp = app
        .post_form(
            "/produits",
            &[("name", "Sel"), ("price", "1200"), ("stock", "10")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("Erreur : CreateProduit a échoué"));
    assert!(body.contains("value=\"Sel\""));
    assert!(body.contains("value=\"1200\""));
    assert_eq!(app.api.product_names(), ["Riz", "Vanille"]);
}

#[tokio::test]
async fn test_rejected_update_keeps_form() {
    let app = TestApp::spawn().await;
    app.login("soa", "secret").await;
    app.api.fail("UpdateProduit");

    let resp = app
        .post_form(
            "/produits/2",
            &[("name", "Vanille Bourbon"), ("price", "18000"), ("stock", "5")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("Erreur : UpdateProduit a échoué"));
    assert!(body.contains("Modifier Produit"));
    assert!(body.contains("value=\"Vanille Bourbon\""));
    assert_eq!(app.api.product_names(), ["Riz", "Vanille"]);
}

#[tokio::test]
async fn test_rejected_delete_shows_message() {
    let app = TestApp::spawn().await;
    app.login("soa", "secret").await;
    app.api.fail("DeleteProduit");

    let resp = app.post_form("/produits/1/delete", &[]).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("Erreur : DeleteProduit a échoué"));
    assert!(body.contains("Voulez-vous vraiment supprimer ?"));
    assert!(body.contains("Riz (2 500 Ar)"));
    assert_eq!(app.api.product_names(), ["Riz", "Vanille"]);
}

#[tokio::test]
async fn test_rejected_delete_of_missing_product_shows_message() {
    let app = TestApp::spawn().await;
    app.login("soa", "secret").await;

    let resp = app.post_form("/produits/999/delete", &[]).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("Erreur : No Produit matches the given query."));
    assert!(!body.contains("Introuvable"));
}
