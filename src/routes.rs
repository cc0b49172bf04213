//! Top-level router configuration combining API and web routes.
//!
//! # Route Structure
//!
//! - `GET  /`        - Submission form (public)
//! - `POST /w`       - Submit text for archiving (public, rate limited)
//! - `GET  /health`  - Health check: slots, channels, publish jobs
//!
//! Any other path gets a JSON `404`.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, not_found_handler};
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use crate::web;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let submit_router = rate_limit::limit(
        api::routes::submit_routes(),
        behind_proxy,
        rate_limit::SUBMIT_BURST,
    );

    let web_router = rate_limit::limit(
        web::routes::public_routes(),
        behind_proxy,
        rate_limit::PAGE_BURST,
    );

    let router = Router::new()
        .route("/health", get(health_handler))
        .merge(submit_router)
        .merge(web_router)
        .fallback(not_found_handler)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
