//! Statistiques générales.
//!
//! Shows the API's own aggregates (`dashboardStats`) and the monthly
//! quantities per product (`produitsVendusParMois`). The two queries run
//! concurrently; the monthly table is optional and its failure only hides
//! that section.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::api::ServerStats;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::routes::shell::ShellView;
use crate::state::AppState;
use crate::stats::{MonthlyTable, ProductShare, monthly_table, server_top_products};

/// Label shown when no product has been sold yet.
const NO_BEST_SELLER: &str = "Aucun";

/// Stats page template.
#[derive(Template, WebTemplate)]
#[template(path = "stats.html")]
pub struct StatsTemplate {
    pub shell: ShellView,
    pub stats: Option<ServerStats>,
    pub best_seller: String,
    pub top_products: Vec<ProductShare>,
    pub monthly: Option<MonthlyTable>,
    pub error: Option<String>,
}

/// Display the statistics page.
///
/// GET /stats
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
) -> impl IntoResponse {
    let shell = ShellView::new(&auth.user, "/stats");

    let (stats, monthly) = tokio::join!(
        state.api().dashboard_stats(&auth.token),
        state.api().monthly_sales(&auth.token),
    );

    let monthly = match monthly {
        Ok(sales) if !sales.is_empty() => Some(monthly_table(&sales)),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!("Failed to load monthly sales: {}", e);
            None
        }
    };

    match stats {
        Ok(stats) => StatsTemplate {
            shell,
            best_seller: stats
                .best_seller
                .clone()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| NO_BEST_SELLER.to_string()),
            top_products: server_top_products(&stats.top_products),
            stats: Some(stats),
            monthly,
            error: None,
        },
        Err(e) => {
            tracing::warn!("Failed to load dashboard stats: {}", e);
            StatsTemplate {
                shell,
                stats: None,
                best_seller: NO_BEST_SELLER.to_string(),
                top_products: Vec::new(),
                monthly,
                error: Some(e.user_message()),
            }
        }
    }
}
