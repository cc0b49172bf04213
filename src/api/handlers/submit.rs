//! Handler for the submission endpoint.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, header};
use serde_json::json;
use tracing::{info, warn};
use validator::Validate;

use crate::api::dto::submit::SubmitRequest;
use crate::application::services::{Reply, ResponseMode};
use crate::domain::entities::{Stage, Submission};
use crate::error::AppError;
use crate::state::AppState;

/// Archives the URLs found in a text and replies with the records.
///
/// # Endpoint
///
/// `POST /w`
///
/// # Request Body
///
/// `application/x-www-form-urlencoded` (or JSON when the content type says so):
///
/// ```text
/// text=https%3A%2F%2Fexample.com%2F&data-type=json
/// ```
///
/// # Response
///
/// With `data-type=json`, a JSON array holding one record per enabled slot
/// and URL:
///
/// ```json
/// [
///   {
///     "slot": "ia",
///     "extra": "https://web.archive.org/",
///     "source": "https://example.com/",
///     "destination": "https://web.archive.org/web/20240101000000/https://example.com/"
///   }
/// ]
/// ```
///
/// Otherwise an HTML page with the same records. Publishing to the enabled
/// channels starts after the reply is rendered and never delays it.
///
/// # Errors
///
/// - **411 Length Required**: empty body or blank `text`
/// - **400 Bad Request**: unparsable body or oversized `text`
/// - **500 Internal Server Error**: the reply could not be rendered
pub async fn submit_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Reply, AppError> {
    info!(stage = %Stage::Received, bytes = body.len(), "submission received");

    let request = parse_body(&headers, &body)
        .and_then(|request| {
            request.validate()?;
            Ok(request)
        })
        .map_err(rejected)?;
    if request.is_blank() {
        return Err(rejected(AppError::length_required(
            "Text is empty",
            json!({ "field": "text" }),
        )));
    }

    let mode = ResponseMode::from_field(request.data_type.as_deref());
    let submission = Submission::from_text(&request.text);
    info!(stage = %Stage::Validated, urls = submission.urls().len(), "submission validated");

    // Dropping the request future (client gone) cancels in-flight slots.
    let cancel = state.shutdown.child_token();
    let _guard = cancel.clone().drop_guard();

    let reply = state
        .submission_service
        .handle(submission, mode, &cancel)
        .await?;
    info!(stage = %Stage::Responded, mode = mode.as_str(), "submission answered");

    Ok(reply)
}

fn parse_body(headers: &HeaderMap, body: &Bytes) -> Result<SubmitRequest, AppError> {
    if body.is_empty() {
        return Err(AppError::length_required(
            "Request body is empty",
            json!({}),
        ));
    }

    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim_start().starts_with("application/json"));

    if is_json {
        serde_json::from_slice(body).map_err(|e| {
            AppError::bad_request("Invalid JSON body", json!({ "reason": e.to_string() }))
        })
    } else {
        serde_urlencoded::from_bytes(body).map_err(|e| {
            AppError::bad_request("Invalid form body", json!({ "reason": e.to_string() }))
        })
    }
}

fn rejected(err: AppError) -> AppError {
    warn!(stage = %Stage::Rejected, error = %err, "submission rejected");
    err
}
