//! Fallback handlers producing JSON errors for unmatched requests.

use axum::http::{Method, Uri};
use serde_json::json;
use tracing::warn;

use crate::domain::entities::Stage;
use crate::error::AppError;

/// Rejects any method other than `POST` on the submission endpoint.
pub async fn method_not_allowed_handler(method: Method) -> AppError {
    warn!(stage = %Stage::Rejected, method = %method, "method not allowed");
    AppError::method_not_allowed(
        format!("Method {method} is not allowed"),
        json!({ "allowed": ["POST"] }),
    )
}

/// Answers unknown paths.
pub async fn not_found_handler(uri: Uri) -> AppError {
    AppError::not_found("Page not found", json!({ "path": uri.path() }))
}
