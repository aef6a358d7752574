//! Order history and the new-order form.
//!
//! The form posts back to itself for every button. "Ajouter un produit" and
//! the per-line remove buttons only change the form; "Valider" places the
//! order with `createCommande`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use crate::api::{ApiError, Order, Product, User};
use crate::filters;
use crate::forms::{FieldErrors, OrderAction, OrderForm};
use crate::middleware::{AuthSession, RequireAuth};
use crate::routes::shell::ShellView;
use crate::routes::{MessageQuery, notice};
use crate::state::AppState;

const LIST_PATH: &str = "/commandes";
const NEW_PATH: &str = "/commandes/new";

const NOTICES: &[(&str, &str)] = &[("created", "✅ Commande créée avec succès !")];

/// One `<option>` of a select.
#[derive(Debug, Clone)]
pub struct ChoiceView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// One order line as rendered.
#[derive(Debug, Clone)]
pub struct LineView {
    pub index: usize,
    pub products: Vec<ChoiceView>,
    pub quantity: String,
    pub product_error: Option<String>,
    pub quantity_error: Option<String>,
}

/// Order history template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub shell: ShellView,
    pub orders: Vec<Order>,
    pub notice: Option<&'static str>,
    pub error: Option<String>,
}

/// New order template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/new.html")]
pub struct OrderNewTemplate {
    pub shell: ShellView,
    pub sellers: Vec<ChoiceView>,
    pub lines: Vec<LineView>,
    pub can_remove_lines: bool,
    pub seller_error: Option<String>,
    /// Set when the choices could not be loaded; the form is hidden.
    pub load_error: Option<String>,
    pub error: Option<String>,
}

/// Sellers and products offered by the form.
struct Choices {
    sellers: Vec<User>,
    products: Vec<Product>,
}

impl Choices {
    /// Users with the `vendeur` role, and every product.
    async fn load(state: &AppState, auth: &AuthSession) -> Result<Self, ApiError> {
        let (users, products) = tokio::join!(
            state.api().users(&auth.token),
            state.api().products(&auth.token),
        );
        Ok(Self {
            sellers: users?.into_iter().filter(User::is_seller).collect(),
            products: products?,
        })
    }
}

impl OrderNewTemplate {
    fn render_form(
        auth: &AuthSession,
        choices: &Choices,
        form: &OrderForm,
        errors: &FieldErrors,
    ) -> Self {
        let sellers = choices
            .sellers
            .iter()
            .map(|seller| {
                let value = seller.id.to_string();
                ChoiceView {
                    selected: value == form.seller_id.trim(),
                    label: seller.username.clone(),
                    value,
                }
            })
            .collect();

        let lines = form
            .lines
            .iter()
            .enumerate()
            .map(|(index, line)| LineView {
                index,
                products: choices
                    .products
                    .iter()
                    .map(|product| {
                        let value = product.id.to_string();
                        ChoiceView {
                            selected: value == line.product_id.trim(),
                            label: format!("{} (Prix : {})", product.name, product.price),
                            value,
                        }
                    })
                    .collect(),
                quantity: line.quantity.clone(),
                product_error: errors.line(index, "product_id").map(str::to_string),
                quantity_error: errors.line(index, "quantity").map(str::to_string),
            })
            .collect();

        Self {
            shell: ShellView::new(&auth.user, NEW_PATH),
            sellers,
            lines,
            can_remove_lines: form.can_remove_lines(),
            seller_error: errors.get("seller_id").map(str::to_string),
            load_error: None,
            error: None,
        }
    }

    fn unavailable(auth: &AuthSession, error: &ApiError) -> Self {
        Self {
            shell: ShellView::new(&auth.user, NEW_PATH),
            sellers: Vec::new(),
            lines: Vec::new(),
            can_remove_lines: false,
            seller_error: None,
            load_error: Some(error.user_message()),
            error: None,
        }
    }
}

/// Order history.
///
/// GET /commandes
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let shell = ShellView::new(&auth.user, LIST_PATH);

    match state.api().orders(&auth.token).await {
        Ok(orders) => OrdersIndexTemplate {
            shell,
            orders,
            notice: notice(NOTICES, query.message.as_deref()),
            error: None,
        },
        Err(e) => {
            tracing::warn!("Failed to load orders: {}", e);
            OrdersIndexTemplate {
                shell,
                orders: Vec::new(),
                notice: None,
                error: Some(e.user_message()),
            }
        }
    }
}

/// Empty order form with a single line.
///
/// GET /commandes/new
#[instrument(skip_all)]
pub async fn new(State(state): State<AppState>, RequireAuth(auth): RequireAuth) -> Response {
    match Choices::load(&state, &auth).await {
        Ok(choices) => OrderNewTemplate::render_form(
            &auth,
            &choices,
            &OrderForm::default(),
            &FieldErrors::new(),
        )
        .into_response(),
        Err(e) => {
            tracing::warn!("Failed to load order choices: {}", e);
            OrderNewTemplate::unavailable(&auth, &e).into_response()
        }
    }
}

/// Add or remove a line, or place the order.
///
/// POST /commandes/new
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let (mut form, action) = OrderForm::from_pairs(&pairs);

    let choices = match Choices::load(&state, &auth).await {
        Ok(choices) => choices,
        Err(e) => {
            tracing::warn!("Failed to load order choices: {}", e);
            return OrderNewTemplate::unavailable(&auth, &e).into_response();
        }
    };

    match action {
        OrderAction::AddLine => {
            form.add_line();
            return OrderNewTemplate::render_form(&auth, &choices, &form, &FieldErrors::new())
                .into_response();
        }
        OrderAction::RemoveLine(index) => {
            form.remove_line(index);
            return OrderNewTemplate::render_form(&auth, &choices, &form, &FieldErrors::new())
                .into_response();
        }
        OrderAction::Submit => {}
    }

    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            let page = OrderNewTemplate::render_form(&auth, &choices, &form, &errors);
            return (StatusCode::UNPROCESSABLE_ENTITY, page).into_response();
        }
    };

    match state.api().create_order(&auth.token, &input).await {
        Ok(()) => Redirect::to("/commandes?message=created").into_response(),
        Err(e) => {
            tracing::warn!("Failed to create order: {}", e);
            OrderNewTemplate {
                error: Some(e.user_message()),
                ..OrderNewTemplate::render_form(&auth, &choices, &form, &FieldErrors::new())
            }
            .into_response()
        }
    }
}
