//! Archive broker contract.

use async_trait::async_trait;
use std::collections::HashMap;

/// Errors a broker may report for a whole dispatch.
///
/// Per-URL failures should instead be returned as an explanatory
/// destination string in the result map.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BrokerError {
    #[error("archiving failed: {0}")]
    Failed(String),

    #[error("archiving timed out")]
    Timeout,

    #[error("archiving cancelled")]
    Cancelled,

    #[error("archive slot is not available")]
    Unavailable,

    #[error("archive worker crashed")]
    Crashed,
}

/// Client for one archive provider.
///
/// Called once per request with the full URL set. Implementations enforce
/// their own network timeouts and never retry on behalf of the dispatcher.
///
/// # Implementations
///
/// Provider clients live outside this crate and are registered per slot
/// through [`crate::application::Backends`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Broker: Send + Sync {
    /// Archives `urls`, returning a map from source URL to archived location
    /// (or a failure explanation for that URL).
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError`] when the provider cannot be used at all; every
    /// URL of the slot is then recorded with the error message.
    async fn archive(&self, urls: &[String]) -> Result<HashMap<String, String>, BrokerError>;
}
