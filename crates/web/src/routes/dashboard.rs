//! Tableau de bord.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::filters;
use crate::middleware::RequireAuth;
use crate::routes::shell::ShellView;
use crate::state::AppState;
use crate::stats::{DashboardSummary, summarize_orders};

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub shell: ShellView,
    pub summary: Option<DashboardSummary>,
    pub error: Option<String>,
}

/// Order count, sales total and top products, computed from the order history.
///
/// GET /dashboard
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
) -> impl IntoResponse {
    let shell = ShellView::new(&auth.user, "/dashboard");

    match state.api().orders(&auth.token).await {
        Ok(orders) => DashboardTemplate {
            shell,
            summary: Some(summarize_orders(&orders)),
            error: None,
        },
        Err(e) => {
            tracing::warn!("Failed to load orders: {}", e);
            DashboardTemplate {
                shell,
                summary: None,
                error: Some(e.user_message()),
            }
        }
    }
}
