//! Authentication route handlers.
//!
//! Login exchanges the credentials for an API token with `tokenAuth`, then
//! resolves the user record by username so the shell can show who is
//! logged in. Registration creates the account and sends the visitor back
//! to the login page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, set_sentry_user};
use crate::filters;
use crate::forms::{FieldErrors, LoginForm, RegisterForm};
use crate::middleware::{OptionalAuth, set_current_user};
use crate::models::CurrentUser;
use crate::routes::{MessageQuery, notice};
use crate::state::AppState;

/// Where a successful login lands.
const HOME_PATH: &str = "/dashboard";

const BAD_CREDENTIALS: &str = "Identifiants incorrects.";
const REGISTRATION_FAILED: &str = "Une erreur s'est produite lors de l'inscription.";

/// Flash messages shown above the login form.
const LOGIN_NOTICES: &[(&str, &str)] = &[(
    "registered",
    "Inscription réussie ! Vous pouvez maintenant vous connecter.",
)];

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub form: LoginForm,
    pub errors: FieldErrors,
    pub error: Option<String>,
    pub notice: Option<&'static str>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub form: RegisterForm,
    pub errors: FieldErrors,
    pub error: Option<String>,
}

/// Display the login page. Logged-in users go straight to the dashboard.
///
/// GET /login
pub async fn login_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    if user.is_some() {
        return Redirect::to(HOME_PATH).into_response();
    }

    LoginTemplate {
        form: LoginForm::default(),
        errors: FieldErrors::new(),
        error: None,
        notice: notice(LOGIN_NOTICES, query.message.as_deref()),
    }
    .into_response()
}

/// Handle login form submission.
///
/// POST /login
#[instrument(skip_all, fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let failed = |form: &LoginForm, errors: FieldErrors, error: Option<String>| LoginTemplate {
        form: LoginForm {
            username: form.username.clone(),
            password: String::new(),
        },
        errors,
        error,
        notice: None,
    };

    let credentials = match form.validate() {
        Ok(credentials) => credentials,
        Err(errors) => return Ok(failed(&form, errors, None).into_response()),
    };

    let token = match state
        .api()
        .token_auth(&credentials.username, &credentials.password)
        .await
    {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!("Login failed: {}", e);
            return Ok(
                failed(&form, FieldErrors::new(), Some(BAD_CREDENTIALS.to_string()))
                    .into_response(),
            );
        }
    };

    let user = match state.api().users(&token).await {
        Ok(users) => users
            .into_iter()
            .find(|u| u.username == credentials.username),
        Err(e) => {
            tracing::warn!("Failed to fetch users after login: {}", e);
            return Ok(failed(
                &form,
                FieldErrors::new(),
                Some(format!("Erreur : {}", e.user_message())),
            )
            .into_response());
        }
    };

    let Some(user) = user else {
        tracing::warn!("Authenticated user missing from allUtilisateurs");
        return Ok(
            failed(&form, FieldErrors::new(), Some(BAD_CREDENTIALS.to_string())).into_response(),
        );
    };

    let current_user = CurrentUser {
        id: user.id,
        username: user.username,
        role: user.role,
    };
    set_current_user(&session, &current_user, &token).await?;
    set_sentry_user(&current_user.id, &current_user.username);
    tracing::info!(user_id = %current_user.id, "User logged in");

    Ok(Redirect::to(HOME_PATH).into_response())
}

/// Display the registration page.
///
/// GET /register
pub async fn register_page() -> impl IntoResponse {
    RegisterTemplate {
        form: RegisterForm::default(),
        errors: FieldErrors::new(),
        error: None,
    }
}

/// Handle registration form submission.
///
/// POST /register
#[instrument(skip_all, fields(username = %form.username))]
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    let registration = match form.validate() {
        Ok(registration) => registration,
        Err(errors) => {
            return RegisterTemplate {
                form: form.without_password(),
                errors,
                error: None,
            }
            .into_response();
        }
    };

    match state.api().register_user(&registration).await {
        Ok(()) => Redirect::to("/login?message=registered").into_response(),
        Err(e) => {
            tracing::warn!("Registration failed: {}", e);
            RegisterTemplate {
                form: form.without_password(),
                errors: FieldErrors::new(),
                error: Some(REGISTRATION_FAILED.to_string()),
            }
            .into_response()
        }
    }
}
