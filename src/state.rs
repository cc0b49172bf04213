use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::application::Backends;
use crate::application::services::{ArchiveService, PublishService, SubmissionService};
use crate::config::Options;
use crate::domain::ports::{PublishMetrics, Renderer};

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub options: Arc<Options>,
    pub archive_service: Arc<ArchiveService>,
    pub publish_service: Arc<PublishService>,
    pub submission_service: Arc<SubmissionService>,
    /// Cancelled when the process starts shutting down; request tokens are its
    /// children. Publish jobs are cancelled separately, after the grace period.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Wires the services around one set of backends.
    pub fn new(
        options: Arc<Options>,
        backends: Backends,
        renderer: Arc<dyn Renderer>,
        metrics: Arc<dyn PublishMetrics>,
        shutdown: CancellationToken,
    ) -> Self {
        let archive_service = Arc::new(ArchiveService::new(backends.clone()));
        let publish_service = Arc::new(PublishService::new(
            Arc::clone(&options),
            backends,
            Arc::clone(&renderer),
            metrics,
            CancellationToken::new(),
        ));
        let submission_service = Arc::new(SubmissionService::new(
            Arc::clone(&options),
            Arc::clone(&archive_service),
            Arc::clone(&publish_service),
            renderer,
        ));

        Self {
            options,
            archive_service,
            publish_service,
            submission_service,
            shutdown,
        }
    }
}
