//! Publish fan-out: delivers one aggregate to every enabled channel.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use crate::application::backends::Backends;
use crate::config::Options;
use crate::domain::entities::{AggregateResult, ChannelKind, PublishOutcome, RenderTarget};
use crate::domain::ports::{
    PublishError, PublishMetrics, PublishStatus, Publisher, Renderer,
};

/// Fans an aggregate out to every enabled publish channel.
///
/// Jobs run detached from the request that produced them. They are tracked so
/// shutdown can wait for them, and cancelled through `shutdown` once the
/// grace period runs out.
pub struct PublishService {
    options: Arc<Options>,
    backends: Backends,
    renderer: Arc<dyn Renderer>,
    metrics: Arc<dyn PublishMetrics>,
    tracker: TaskTracker,
    shutdown: CancellationToken,
}

impl PublishService {
    pub fn new(
        options: Arc<Options>,
        backends: Backends,
        renderer: Arc<dyn Renderer>,
        metrics: Arc<dyn PublishMetrics>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            options,
            backends,
            renderer,
            metrics,
            tracker: TaskTracker::new(),
            shutdown,
        }
    }

    /// Launches a publish job without waiting for it.
    ///
    /// The job owns `records`; the returned handle may be dropped.
    pub fn spawn(self: &Arc<Self>, records: AggregateResult) -> JoinHandle<Vec<PublishOutcome>> {
        let service = Arc::clone(self);
        self.tracker
            .spawn(async move { service.publish(records).await })
    }

    /// Whether a publisher is registered for `kind`.
    pub fn has_publisher(&self, kind: ChannelKind) -> bool {
        self.backends.has_publisher(kind)
    }

    /// Number of publish jobs still running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Waits up to `grace` for running jobs, then cancels the rest.
    ///
    /// Returns `true` if every job finished on its own.
    pub async fn drain(&self, grace: Duration) -> bool {
        self.tracker.close();
        let pending = self.tracker.len();
        if pending > 0 {
            info!(pending, "waiting for publish jobs");
        }

        if tokio::time::timeout(grace, self.tracker.wait()).await.is_ok() {
            return true;
        }

        warn!(
            pending = self.tracker.len(),
            grace_seconds = grace.as_secs(),
            "publish jobs still running after grace period, cancelling"
        );
        self.shutdown.cancel();
        self.tracker.wait().await;
        false
    }

    /// Publishes `records` to every enabled channel and waits for all of them.
    ///
    /// Each enabled channel records exactly one `request` metric and then
    /// exactly one `success` or `failure` metric, whatever its renderer or
    /// publisher does. Outcomes are returned in channel order.
    pub async fn publish(&self, records: AggregateResult) -> Vec<PublishOutcome> {
        let channels = self.options.enabled_channels();
        if channels.is_empty() {
            debug!("no publish channel enabled");
            return Vec::new();
        }

        let records = Arc::new(records);
        let mut texts: HashMap<RenderTarget, RenderedText> = HashMap::new();
        let mut outcomes = Vec::with_capacity(channels.len());
        let mut spawned = Vec::with_capacity(channels.len());
        let mut tasks = JoinSet::new();

        for kind in channels {
            self.metrics.increment_publish(kind, PublishStatus::Request);

            let publisher = match self.resolve(kind, &records) {
                Ok(publisher) => publisher,
                Err(reason) => {
                    warn!(channel = kind.as_str(), reason, "publish skipped");
                    outcomes.push(self.finish(kind, false));
                    continue;
                }
            };

            let text = Arc::clone(texts.entry(kind.render_target()).or_default());
            let renderer = Arc::clone(&self.renderer);
            let records = Arc::clone(&records);
            let shutdown = self.shutdown.clone();
            tasks.spawn(async move {
                let delivered = deliver(kind, publisher, renderer, records, text, shutdown).await;
                (kind, delivered)
            });
            spawned.push(kind);
        }

        let mut reported = Vec::with_capacity(spawned.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((kind, delivered)) => {
                    reported.push(kind);
                    outcomes.push(self.finish(kind, delivered));
                }
                Err(e) => error!(error = %e, "publish worker crashed"),
            }
        }

        // A crashed task never reports its channel; account for it by elimination.
        for kind in spawned {
            if !reported.contains(&kind) {
                warn!(channel = kind.as_str(), reason = "crashed", "publish failed");
                outcomes.push(self.finish(kind, false));
            }
        }

        outcomes.sort_by_key(|outcome| outcome.channel);
        outcomes
    }

    /// Resolves the publisher for one channel, or the reason to skip it.
    fn resolve(
        &self,
        kind: ChannelKind,
        records: &AggregateResult,
    ) -> Result<Arc<dyn Publisher>, &'static str> {
        if records.is_empty() || records.is_url_not_found() {
            return Err("empty");
        }

        let configured = self
            .options
            .channel(kind)
            .is_some_and(|channel| channel.is_configured());
        if !configured {
            return Err("unconfigured");
        }

        self.backends.publisher(kind).ok_or("unregistered")
    }

    fn finish(&self, channel: ChannelKind, delivered: bool) -> PublishOutcome {
        let status = if delivered {
            PublishStatus::Success
        } else {
            PublishStatus::Failure
        };
        self.metrics.increment_publish(channel, status);
        PublishOutcome { channel, delivered }
    }
}

/// Text rendered once per target and shared by the channels using it.
/// `None` records a render failure.
type RenderedText = Arc<OnceCell<Option<Arc<str>>>>;

/// Renders and delivers one channel's text. Runs inside the channel's own
/// task, so a panic here only fails this channel.
async fn deliver(
    kind: ChannelKind,
    publisher: Arc<dyn Publisher>,
    renderer: Arc<dyn Renderer>,
    records: Arc<AggregateResult>,
    text: RenderedText,
    shutdown: CancellationToken,
) -> bool {
    let target = kind.render_target();
    let (renderer, rendered_records) = (&renderer, &records);
    let rendered = text
        .get_or_init(|| async move {
            match renderer.render(rendered_records, target) {
                Ok(text) => Some(Arc::from(text)),
                Err(e) => {
                    error!(render_target = ?target, error = %e, "publish render failed");
                    None
                }
            }
        })
        .await;

    let text = match rendered {
        Some(text) if !text.trim().is_empty() => text,
        Some(_) => {
            warn!(channel = kind.as_str(), reason = "empty_text", "publish skipped");
            return false;
        }
        None => {
            warn!(channel = kind.as_str(), reason = "render_failed", "publish skipped");
            return false;
        }
    };

    let result = tokio::select! {
        biased;
        _ = shutdown.cancelled() => Err(PublishError::Cancelled),
        result = publisher.publish(&records, text) => result,
    };

    match result {
        Ok(()) => {
            info!(channel = kind.as_str(), "published");
            true
        }
        Err(e) => {
            warn!(channel = kind.as_str(), reason = "failed", error = %e, "publish failed");
            false
        }
    }
}
