//! Archive dispatch: fan-out over enabled slots, fan-in into one aggregate.

use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::application::backends::Backends;
use crate::domain::entities::{AggregateResult, Slot, Submission, slot_records};
use crate::domain::ports::BrokerError;

/// Dispatches a submission's URLs to every enabled archive slot.
///
/// Each slot runs in its own task and produces a private slice of records;
/// slices are merged only after every task has reported, so no record buffer
/// is shared between tasks.
pub struct ArchiveService {
    backends: Backends,
}

impl ArchiveService {
    pub fn new(backends: Backends) -> Self {
        Self { backends }
    }

    /// Whether a broker is registered for `slot`.
    pub fn is_available(&self, slot: Slot) -> bool {
        self.backends.has_broker(slot)
    }

    /// Archives the submission's URLs in `slots` concurrently.
    ///
    /// # Guarantees
    ///
    /// - Zero URLs: returns the "URL not found" sentinel without calling any broker
    /// - Otherwise: exactly one record per (slot, URL), whatever each broker did
    /// - Returns only once every slot task has finished, been cancelled, or crashed
    ///
    /// Cancelling `cancel` makes pending slots report a cancellation record
    /// instead of waiting for their broker.
    pub async fn dispatch(
        &self,
        submission: &Submission,
        slots: &[Slot],
        cancel: &CancellationToken,
    ) -> AggregateResult {
        if !submission.has_urls() {
            info!("archives failure, URL no found");
            return AggregateResult::url_not_found(submission.text());
        }

        let urls: Arc<[String]> = submission.urls().into();
        let mut parts = Vec::with_capacity(slots.len());
        let mut spawned = Vec::with_capacity(slots.len());
        let mut tasks = JoinSet::new();

        for &slot in slots {
            let Some(broker) = self.backends.broker(slot) else {
                warn!(slot = %slot, "no broker registered for enabled slot");
                parts.push((slot, slot_records(slot, &urls, Err(BrokerError::Unavailable))));
                continue;
            };

            let urls = Arc::clone(&urls);
            let cancel = cancel.clone();
            tasks.spawn(async move {
                debug!(slot = %slot, urls = urls.len(), "archiving slot");
                let outcome = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Err(BrokerError::Cancelled),
                    result = broker.archive(&urls) => result,
                };
                if let Err(e) = &outcome {
                    warn!(slot = %slot, error = %e, "archive slot failed");
                }
                (slot, slot_records(slot, &urls, outcome))
            });
            spawned.push(slot);
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(part) => parts.push(part),
                Err(e) => error!(error = %e, "archive worker crashed"),
            }
        }

        // A crashed task never reports its slot; account for it by elimination.
        for slot in spawned {
            if !parts.iter().any(|(reported, _)| *reported == slot) {
                parts.push((slot, slot_records(slot, &urls, Err(BrokerError::Crashed))));
            }
        }

        let aggregate = AggregateResult::merge(parts);
        debug!(records = aggregate.len(), "archives finished");
        aggregate
    }
}
