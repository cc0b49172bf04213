//! API route configuration.

use crate::api::handlers::{method_not_allowed_handler, submit_handler};
use crate::state::AppState;
use axum::{Router, routing::post};

/// Submission routes.
///
/// # Endpoints
///
/// - `POST /w` - Archive the URLs in a text; any other method gets `405`
pub fn submit_routes() -> Router<AppState> {
    Router::new().route(
        "/w",
        post(submit_handler).fallback(method_not_allowed_handler),
    )
}
