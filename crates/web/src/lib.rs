//! MiniShop console library.
//!
//! A server-rendered console over the shop's GraphQL API: clients, products,
//! orders, a dashboard and statistics. The binary in `main.rs` only wires up
//! logging and Sentry around [`app`]; the integration tests drive the same
//! router against a fake API.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod filters;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod search;
pub mod state;
pub mod stats;

use axum::{Router, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Build the full application: routes, static files, sessions, hardening
/// headers, request ids, request tracing and the Sentry layers.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());
    let static_dir = state.config().static_dir.clone();

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the shop API.
async fn health() -> &'static str {
    "ok"
}
