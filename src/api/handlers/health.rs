//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Every enabled slot has a broker
/// - **503 Service Unavailable**: An enabled slot cannot archive
///
/// # Components Checked
///
/// 1. **Archive**: Brokers registered for the enabled slots
/// 2. **Publish**: Enabled channels and whether they can deliver
/// 3. **Publish tasks**: Detached publish jobs still running
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "archive": { "status": "ok", "message": "Slots ready: Internet Archive" },
///     "publish": { "status": "ok", "message": "No channel enabled" },
///     "publish_tasks": { "status": "ok", "message": "In flight: 0" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let archive_check = check_archive(&state);

    let publish_check = check_publish(&state);

    let tasks_check = CheckStatus::ok(format!(
        "In flight: {}",
        state.publish_service.in_flight()
    ));

    let all_healthy = archive_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            archive: archive_check,
            publish: publish_check,
            publish_tasks: tasks_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Checks that every enabled slot has a broker behind it.
fn check_archive(state: &AppState) -> CheckStatus {
    let (ready, missing): (Vec<_>, Vec<_>) = state
        .options
        .enabled_slots()
        .into_iter()
        .partition(|slot| state.archive_service.is_available(*slot));

    let names = |slots: Vec<crate::domain::entities::Slot>| {
        slots
            .into_iter()
            .map(|slot| slot.name())
            .collect::<Vec<_>>()
            .join(", ")
    };

    if missing.is_empty() {
        CheckStatus::ok(format!("Slots ready: {}", names(ready)))
    } else {
        CheckStatus::error(format!("No broker for: {}", names(missing)))
    }
}

/// Reports enabled channels; channels that cannot deliver only degrade publishing.
fn check_publish(state: &AppState) -> CheckStatus {
    let enabled = state.options.enabled_channels();
    if enabled.is_empty() {
        return CheckStatus::ok("No channel enabled");
    }

    let unready: Vec<_> = enabled
        .iter()
        .filter(|kind| {
            !state
                .options
                .channel(**kind)
                .is_some_and(|channel| channel.is_configured())
                || !state.publish_service.has_publisher(**kind)
        })
        .map(|kind| kind.as_str())
        .collect();

    if unready.is_empty() {
        CheckStatus::ok(format!("Channels: {}", enabled.len()))
    } else {
        CheckStatus::error(format!("Cannot deliver: {}", unready.join(", ")))
    }
}
