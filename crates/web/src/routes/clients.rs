//! Client management.
//!
//! The list is refetched after every create, update and delete; the
//! mutation itself invalidates the query cache.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use minishop_core::ClientId;
use tracing::instrument;

use crate::api::Client;
use crate::error::{AppError, Result};
use crate::filters;
use crate::forms::{ClientForm, FieldErrors};
use crate::middleware::{AuthSession, RequireAuth};
use crate::routes::shell::ShellView;
use crate::routes::{ListQuery, notice};
use crate::search::filter_by_name;
use crate::state::AppState;

const LIST_PATH: &str = "/clients";

const NOTICES: &[(&str, &str)] = &[
    ("created", "Client ajouté avec succès !"),
    ("updated", "Client modifié avec succès !"),
    ("deleted", "Client supprimé !"),
];

/// Client list template.
#[derive(Template, WebTemplate)]
#[template(path = "clients/index.html")]
pub struct ClientsIndexTemplate {
    pub shell: ShellView,
    pub clients: Vec<Client>,
    pub q: String,
    pub notice: Option<&'static str>,
    pub error: Option<String>,
}

/// Client create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "clients/form.html")]
pub struct ClientFormTemplate {
    pub shell: ShellView,
    pub title: &'static str,
    pub action: String,
    pub form: ClientForm,
    pub errors: FieldErrors,
    pub error: Option<String>,
}

/// Client delete confirmation template.
///
/// `client` is `None` when a failed delete is re-rendered and the record
/// can no longer be fetched.
#[derive(Template, WebTemplate)]
#[template(path = "clients/delete.html")]
pub struct ClientDeleteTemplate {
    pub shell: ShellView,
    pub id: ClientId,
    pub client: Option<Client>,
    pub error: Option<String>,
}

impl ClientFormTemplate {
    fn create(auth: &AuthSession, form: ClientForm) -> Self {
        Self {
            shell: ShellView::new(&auth.user, "/clients/new"),
            title: "Ajouter Client",
            action: LIST_PATH.to_string(),
            form,
            errors: FieldErrors::new(),
            error: None,
        }
    }

    fn edit(auth: &AuthSession, id: ClientId, form: ClientForm) -> Self {
        Self {
            shell: ShellView::new(&auth.user, &format!("/clients/{id}/edit")),
            title: "Modifier Client",
            action: format!("/clients/{id}"),
            form,
            errors: FieldErrors::new(),
            error: None,
        }
    }
}

/// Fetch one client by id from the list.
async fn find_client(state: &AppState, auth: &AuthSession, id: ClientId) -> Result<Client> {
    state
        .api()
        .clients(&auth.token)
        .await?
        .into_iter()
        .find(|c| c.id == id)
        .ok_or_else(|| AppError::NotFound(format!("client {id}")))
}

/// List clients, filtered by `?q=`.
///
/// GET /clients
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let shell = ShellView::new(&auth.user, LIST_PATH);
    let notice = notice(NOTICES, query.message.as_deref());

    match state.api().clients(&auth.token).await {
        Ok(clients) => ClientsIndexTemplate {
            shell,
            clients: filter_by_name(clients, &query.q),
            q: query.q,
            notice,
            error: None,
        },
        Err(e) => {
            tracing::warn!("Failed to load clients: {}", e);
            ClientsIndexTemplate {
                shell,
                clients: Vec::new(),
                q: query.q,
                notice: None,
                error: Some(e.user_message()),
            }
        }
    }
}

/// Empty client form.
///
/// GET /clients/new
pub async fn new(RequireAuth(auth): RequireAuth) -> impl IntoResponse {
    ClientFormTemplate::create(&auth, ClientForm::default())
}

/// Create a client.
///
/// POST /clients
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Form(form): Form<ClientForm>,
) -> Response {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            let page = ClientFormTemplate {
                errors,
                ..ClientFormTemplate::create(&auth, form)
            };
            return (StatusCode::UNPROCESSABLE_ENTITY, page).into_response();
        }
    };

    match state.api().create_client(&auth.token, &input).await {
        Ok(()) => Redirect::to("/clients?message=created").into_response(),
        Err(e) => {
            tracing::warn!("Failed to create client: {}", e);
            ClientFormTemplate {
                error: Some(e.user_message()),
                ..ClientFormTemplate::create(&auth, form)
            }
            .into_response()
        }
    }
}

/// Edit form pre-filled from the fetched client.
///
/// GET /clients/{id}/edit
#[instrument(skip_all, fields(client_id = %id))]
pub async fn edit(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<ClientId>,
) -> Result<impl IntoResponse> {
    let client = find_client(&state, &auth, id).await?;
    Ok(ClientFormTemplate::edit(
        &auth,
        id,
        ClientForm::from_client(&client),
    ))
}

/// Update a client.
///
/// POST /clients/{id}
#[instrument(skip_all, fields(client_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<ClientId>,
    Form(form): Form<ClientForm>,
) -> Response {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            let page = ClientFormTemplate {
                errors,
                ..ClientFormTemplate::edit(&auth, id, form)
            };
            return (StatusCode::UNPROCESSABLE_ENTITY, page).into_response();
        }
    };

    match state.api().update_client(&auth.token, id, &input).await {
        Ok(()) => Redirect::to("/clients?message=updated").into_response(),
        Err(e) => {
            tracing::warn!("Failed to update client: {}", e);
            ClientFormTemplate {
                error: Some(e.user_message()),
                ..ClientFormTemplate::edit(&auth, id, form)
            }
            .into_response()
        }
    }
}

/// Ask "Voulez-vous vraiment supprimer ?".
///
/// GET /clients/{id}/delete
#[instrument(skip_all, fields(client_id = %id))]
pub async fn confirm_delete(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<ClientId>,
) -> Result<impl IntoResponse> {
    let client = find_client(&state, &auth, id).await?;
    Ok(ClientDeleteTemplate {
        shell: ShellView::new(&auth.user, LIST_PATH),
        id,
        client: Some(client),
        error: None,
    })
}

/// Delete a client.
///
/// POST /clients/{id}/delete
#[instrument(skip_all, fields(client_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<ClientId>,
) -> Response {
    match state.api().delete_client(&auth.token, id).await {
        Ok(()) => Redirect::to("/clients?message=deleted").into_response(),
        Err(e) => {
            tracing::warn!("Failed to delete client: {}", e);
            ClientDeleteTemplate {
                shell: ShellView::new(&auth.user, LIST_PATH),
                id,
                client: find_client(&state, &auth, id).await.ok(),
                error: Some(e.user_message()),
            }
            .into_response()
        }
    }
}
