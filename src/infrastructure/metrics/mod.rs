//! Publish counters backed by the `metrics` facade.
//!
//! Emits `wayback_publish_total{publish, status}`. Installing an exporter
//! for the facade is left to the embedding process; without one the
//! increments are no-ops.

use metrics::counter;

use crate::domain::entities::ChannelKind;
use crate::domain::ports::{PublishMetrics, PublishStatus};

/// Counter name for publish attempts and their results.
pub const PUBLISH_COUNTER: &str = "wayback_publish_total";

/// [`PublishMetrics`] implementation recording through `metrics::counter!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsRecorder;

impl MetricsRecorder {
    pub fn new() -> Self {
        Self
    }
}

impl PublishMetrics for MetricsRecorder {
    fn increment_publish(&self, channel: ChannelKind, status: PublishStatus) {
        counter!(
            PUBLISH_COUNTER,
            "publish" => channel.as_str(),
            "status" => status.as_str()
        )
        .increment(1);
    }
}
