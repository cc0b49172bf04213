//! Submission form page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};

use crate::api::dto::submit::MAX_TEXT_LENGTH;
use crate::state::AppState;

/// Template for the submission form.
///
/// Renders `templates/home.html` with the enabled archive slots.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
struct HomeTemplate {
    slots: Vec<&'static str>,
    max_text_length: usize,
}

/// Renders the submission form.
///
/// # Endpoint
///
/// `GET /`
///
/// The form posts `text` and `data-type` to `/w`.
pub async fn home_handler(State(state): State<AppState>) -> impl IntoResponse {
    HomeTemplate {
        slots: state
            .options
            .enabled_slots()
            .into_iter()
            .map(|slot| slot.name())
            .collect(),
        max_text_length: MAX_TEXT_LENGTH,
    }
}
