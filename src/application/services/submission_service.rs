//! Submission handling: validated text in, rendered reply out.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use serde_json::json;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::application::services::{ArchiveService, PublishService};
use crate::config::Options;
use crate::domain::entities::{
    AggregateResult, PublishOutcome, RenderTarget, Stage, Submission,
};
use crate::domain::ports::{RenderError, Renderer};
use crate::error::AppError;

/// How the reply to a submission is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// The records as a JSON array.
    Structured,
    /// An HTML page listing the records.
    Presentation,
}

impl ResponseMode {
    /// Reads the `data-type` field: `json` selects [`ResponseMode::Structured`],
    /// anything else (or nothing) selects [`ResponseMode::Presentation`].
    pub fn from_field(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => ResponseMode::Structured,
            _ => ResponseMode::Presentation,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResponseMode::Structured => "json",
            ResponseMode::Presentation => "html",
        }
    }
}

/// Rendered reply plus the handle of the publish job it started.
#[derive(Debug)]
pub struct Reply {
    pub mode: ResponseMode,
    pub body: String,
    /// Detached publish job; dropping it does not stop the job.
    pub publish: JoinHandle<Vec<PublishOutcome>>,
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self.mode {
            ResponseMode::Structured => {
                ([(header::CONTENT_TYPE, "application/json")], self.body).into_response()
            }
            ResponseMode::Presentation => Html(self.body).into_response(),
        }
    }
}

/// Drives one submission through dispatch, rendering, and publish detachment.
pub struct SubmissionService {
    options: Arc<Options>,
    archive: Arc<ArchiveService>,
    publish: Arc<PublishService>,
    renderer: Arc<dyn Renderer>,
}

impl SubmissionService {
    pub fn new(
        options: Arc<Options>,
        archive: Arc<ArchiveService>,
        publish: Arc<PublishService>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            options,
            archive,
            publish,
            renderer,
        }
    }

    /// Archives the submission and renders the reply in `mode`.
    ///
    /// The publish job is started only after rendering succeeded, and exactly
    /// once per call. It receives its own copy of the records and is not
    /// awaited.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the reply cannot be rendered; nothing
    /// is published in that case.
    pub async fn handle(
        &self,
        submission: Submission,
        mode: ResponseMode,
        cancel: &CancellationToken,
    ) -> Result<Reply, AppError> {
        info!(
            stage = %Stage::Dispatching,
            urls = submission.urls().len(),
            mode = mode.as_str(),
            "dispatching submission"
        );

        let slots = self.options.enabled_slots();
        let records = self.archive.dispatch(&submission, &slots, cancel).await;

        let body = self.render(&records, mode).map_err(|e| {
            error!(stage = %Stage::Rendered, error = %e, "failed to render reply");
            AppError::internal("Failed to render response", json!({ "mode": mode.as_str() }))
        })?;
        info!(stage = %Stage::Rendered, records = records.len(), "reply rendered");

        let publish = self.publish.spawn(records);

        Ok(Reply {
            mode,
            body,
            publish,
        })
    }

    /// A panicking renderer is reported as a render error.
    fn render(&self, records: &AggregateResult, mode: ResponseMode) -> Result<String, RenderError> {
        match mode {
            ResponseMode::Structured => {
                serde_json::to_string(records).map_err(|e| RenderError::Serialize(e.to_string()))
            }
            ResponseMode::Presentation => panic::catch_unwind(AssertUnwindSafe(|| {
                self.renderer.render(records, RenderTarget::Presentation)
            }))
            .unwrap_or_else(|_| Err(RenderError::Template("renderer panicked".to_string()))),
        }
    }
}
