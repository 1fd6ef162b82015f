//! `ShopEasy` Storefront library.
//!
//! Server-rendered shop and admin back office in front of the `ShopEasy`
//! REST backend. The binary in `main.rs` only wires configuration,
//! tracing, and the session store; everything else lives here so it can
//! be exercised by router tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod db;
pub mod error;
mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod validation;
pub mod views;

use axum::{
    Router,
    extract::State,
    http::{HeaderValue, StatusCode, header::CACHE_CONTROL},
    middleware::{from_fn, from_fn_with_state},
    routing::get,
};
use tower_http::{
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tower::Layer;
use tower_sessions::SessionStore;
use tracing::Span;

use state::AppState;

/// Directory served under `/static`, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/storefront/static";

/// Build the full application router.
///
/// Layers, outermost first: trace, request ID, CSP nonce, security
/// headers, session, stale auth. Sentry layers are added by the caller.
pub fn app<S>(state: AppState, session_store: S) -> Router
where
    S: SessionStore + Clone,
{
    let session_layer = middleware::create_session_layer(session_store, state.config());

    let static_files = SetResponseHeaderLayer::if_not_present(
        CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=86400"),
    )
    .layer(ServeDir::new(STATIC_DIR));

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .nest_service("/static", static_files)
        .layer(from_fn(middleware::stale_auth_middleware))
        .layer(session_layer)
        .layer(from_fn_with_state(
            state.clone(),
            middleware::security_headers_middleware,
        ))
        .layer(from_fn(middleware::csp_nonce_middleware))
        .layer(from_fn(middleware::request_id_middleware))
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
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Checks the session database (when configured) and the backend.
/// Returns 503 Service Unavailable if either is unreachable.
async fn readiness(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if let Some(pool) = state.pool() {
        if let Err(e) = sqlx::query("SELECT 1").fetch_one(pool).await {
            tracing::warn!(error = %e, "Readiness: session database unreachable");
            return (StatusCode::SERVICE_UNAVAILABLE, "session database unavailable");
        }
    }

    if let Err(e) = state.api().ping().await {
        tracing::warn!(error = %e, "Readiness: backend unreachable");
        return (StatusCode::SERVICE_UNAVAILABLE, "backend unavailable");
    }

    (StatusCode::OK, "ready")
}
