//! Web page route configuration.

use crate::state::AppState;
use crate::web::handlers::home_handler;
use axum::{Router, routing::get};

/// Public pages.
///
/// # Endpoints
///
/// - `GET /` - Submission form
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/", get(home_handler))
}
