//! Product management.
//!
//! New products are attached to the logged-in user as their seller.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use minishop_core::ProductId;
use tracing::instrument;

use crate::api::Product;
use crate::error::{AppError, Result};
use crate::filters;
use crate::forms::{FieldErrors, ProductForm};
use crate::middleware::{AuthSession, RequireAuth};
use crate::routes::shell::ShellView;
use crate::routes::{ListQuery, notice};
use crate::search::filter_by_name;
use crate::state::AppState;

const LIST_PATH: &str = "/produits";

const NOTICES: &[(&str, &str)] = &[
    ("created", "Ajouté avec succès"),
    ("updated", "Modifié avec succès"),
    ("deleted", "Supprimé avec succès"),
];

/// Product list template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub shell: ShellView,
    pub products: Vec<Product>,
    pub q: String,
    pub notice: Option<&'static str>,
    pub error: Option<String>,
}

/// Product create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub shell: ShellView,
    pub title: &'static str,
    pub action: String,
    pub form: ProductForm,
    pub errors: FieldErrors,
    pub error: Option<String>,
}

/// Product delete confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "products/delete.html")]
pub struct ProductDeleteTemplate {
    pub shell: ShellView,
    pub id: ProductId,
    pub product: Option<Product>,
    pub error: Option<String>,
}

impl ProductFormTemplate {
    fn create(auth: &AuthSession, form: ProductForm) -> Self {
        Self {
            shell: ShellView::new(&auth.user, "/produits/new"),
            title: "Ajouter Produit",
            action: LIST_PATH.to_string(),
            form,
            errors: FieldErrors::new(),
            error: None,
        }
    }

    fn edit(auth: &AuthSession, id: ProductId, form: ProductForm) -> Self {
        Self {
            shell: ShellView::new(&auth.user, &format!("/produits/{id}/edit")),
            title: "Modifier Produit",
            action: format!("/produits/{id}"),
            form,
            errors: FieldErrors::new(),
            error: None,
        }
    }
}

async fn find_product(state: &AppState, auth: &AuthSession, id: ProductId) -> Result<Product> {
    state
        .api()
        .products(&auth.token)
        .await?
        .into_iter()
        .find(|p| p.id == id)
        .ok_or_else(|| AppError::NotFound(format!("produit {id}")))
}

/// List products, filtered by `?q=`.
///
/// GET /produits
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let shell = ShellView::new(&auth.user, LIST_PATH);
    let notice = notice(NOTICES, query.message.as_deref());

    match state.api().products(&auth.token).await {
        Ok(products) => ProductsIndexTemplate {
            shell,
            products: filter_by_name(products, &query.q),
            q: query.q,
            notice,
            error: None,
        },
        Err(e) => {
            tracing::warn!("Failed to load products: {}", e);
            ProductsIndexTemplate {
                shell,
                products: Vec::new(),
                q: query.q,
                notice: None,
                error: Some(e.user_message()),
            }
        }
    }
}

/// Empty product form.
///
/// GET /produits/new
pub async fn new(RequireAuth(auth): RequireAuth) -> impl IntoResponse {
    ProductFormTemplate::create(&auth, ProductForm::default())
}

/// Create a product sold by the logged-in user.
///
/// POST /produits
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Form(form): Form<ProductForm>,
) -> Response {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            let page = ProductFormTemplate {
                errors,
                ..ProductFormTemplate::create(&auth, form)
            };
            return (StatusCode::UNPROCESSABLE_ENTITY, page).into_response();
        }
    };

    match state
        .api()
        .create_product(&auth.token, auth.user.id, &input)
        .await
    {
        Ok(()) => Redirect::to("/produits?message=created").into_response(),
        Err(e) => {
            tracing::warn!("Failed to create product: {}", e);
            ProductFormTemplate {
                error: Some(e.user_message()),
                ..ProductFormTemplate::create(&auth, form)
            }
            .into_response()
        }
    }
}

/// Edit form pre-filled from the fetched product.
///
/// GET /produits/{id}/edit
#[instrument(skip_all, fields(product_id = %id))]
pub async fn edit(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let product = find_product(&state, &auth, id).await?;
    Ok(ProductFormTemplate::edit(
        &auth,
        id,
        ProductForm::from_product(&product),
    ))
}

/// Update a product.
///
/// POST /produits/{id}
#[instrument(skip_all, fields(product_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<ProductId>,
    Form(form): Form<ProductForm>,
) -> Response {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            let page = ProductFormTemplate {
                errors,
                ..ProductFormTemplate::edit(&auth, id, form)
            };
            return (StatusCode::UNPROCESSABLE_ENTITY, page).into_response();
        }
    };

    match state.api().update_product(&auth.token, id, &input).await {
        Ok(()) => Redirect::to("/produits?message=updated").into_response(),
        Err(e) => {
            tracing::warn!("Failed to update product: {}", e);
            ProductFormTemplate {
                error: Some(e.user_message()),
                ..ProductFormTemplate::edit(&auth, id, form)
            }
            .into_response()
        }
    }
}

/// Ask "Voulez-vous vraiment supprimer ?".
///
/// GET /produits/{id}/delete
#[instrument(skip_all, fields(product_id = %id))]
pub async fn confirm_delete(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let product = find_product(&state, &auth, id).await?;
    Ok(ProductDeleteTemplate {
        shell: ShellView::new(&auth.user, LIST_PATH),
        id,
        product: Some(product),
        error: None,
    })
}

/// Delete a product.
///
/// POST /produits/{id}/delete
#[instrument(skip_all, fields(product_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<ProductId>,
) -> Response {
    match state.api().delete_product(&auth.token, id).await {
        Ok(()) => Redirect::to("/produits?message=deleted").into_response(),
        Err(e) => {
            tracing::warn!("Failed to delete product: {}", e);
            // The record may be gone already; the server's message still shows
            ProductDeleteTemplate {
                shell: ShellView::new(&auth.user, LIST_PATH),
                id,
                product: find_product(&state, &auth, id).await.ok(),
                error: Some(e.user_message()),
            }
            .into_response()
        }
    }
}
