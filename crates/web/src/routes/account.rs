//! Account page: who is logged in, and a change-password form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use crate::filters;
use crate::forms::{FieldErrors, PasswordForm};
use crate::middleware::{AuthSession, RequireAuth};
use crate::routes::shell::ShellView;
use crate::routes::{MessageQuery, notice};
use crate::state::AppState;

const ACCOUNT_PATH: &str = "/compte";

const NOTICES: &[(&str, &str)] = &[("password_changed", "Mot de passe modifié avec succès !")];

/// Account page template.
#[derive(Template, WebTemplate)]
#[template(path = "account.html")]
pub struct AccountTemplate {
    pub shell: ShellView,
    pub username: String,
    pub role_label: &'static str,
    pub errors: FieldErrors,
    pub notice: Option<&'static str>,
    pub error: Option<String>,
}

impl AccountTemplate {
    fn new(auth: &AuthSession) -> Self {
        Self {
            shell: ShellView::new(&auth.user, ACCOUNT_PATH),
            username: auth.user.username.clone(),
            role_label: auth.user.role_label(),
            errors: FieldErrors::new(),
            notice: None,
            error: None,
        }
    }
}

/// Display the account page.
///
/// GET /compte
pub async fn show(
    RequireAuth(auth): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    AccountTemplate {
        notice: notice(NOTICES, query.message.as_deref()),
        ..AccountTemplate::new(&auth)
    }
}

/// Change the password with `changePassword`.
///
/// POST /compte
#[instrument(skip_all, fields(user_id = %auth.user.id))]
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Form(form): Form<PasswordForm>,
) -> Response {
    let change = match form.validate() {
        Ok(change) => change,
        Err(errors) => {
            let page = AccountTemplate {
                errors,
                ..AccountTemplate::new(&auth)
            };
            return (StatusCode::UNPROCESSABLE_ENTITY, page).into_response();
        }
    };

    match state
        .api()
        .change_password(&auth.token, &change.old_password, &change.new_password)
        .await
    {
        Ok(()) => {
            tracing::info!("Password changed");
            Redirect::to("/compte?message=password_changed").into_response()
        }
        Err(e) => {
            tracing::warn!("Failed to change password: {}", e);
            AccountTemplate {
                error: Some(e.user_message()),
                ..AccountTemplate::new(&auth)
            }
            .into_response()
        }
    }
}
