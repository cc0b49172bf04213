//! Publisher contract.

use async_trait::async_trait;

use crate::domain::entities::AggregateResult;

/// Errors reported by a publish channel.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PublishError {
    #[error("publish rejected: {0}")]
    Rejected(String),

    #[error("publish transport error: {0}")]
    Transport(String),

    #[error("publish cancelled")]
    Cancelled,
}

/// Client for one notification channel.
///
/// Receives the aggregated records together with the text already rendered
/// for the channel's [`crate::domain::entities::RenderTarget`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Delivers `text` to the channel.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] when delivery did not happen. The error is
    /// logged and metered by the fan-out; it never reaches the submitter.
    async fn publish(&self, records: &AggregateResult, text: &str) -> Result<(), PublishError>;
}
