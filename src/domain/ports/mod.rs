//! Contracts the core consumes from external collaborators.
//!
//! - [`Broker`] - Archive provider client, one per slot
//! - [`Publisher`] - Notification channel client, one per channel
//! - [`Renderer`] - Records to channel text
//! - [`PublishMetrics`] - Publish counters
//!
//! Mock implementations are auto-generated via `mockall` for unit tests.

pub mod broker;
pub mod metrics;
pub mod publisher;
pub mod renderer;

pub use broker::{Broker, BrokerError};
pub use metrics::{PublishMetrics, PublishStatus};
pub use publisher::{PublishError, Publisher};
pub use renderer::{RenderError, Renderer};

#[cfg(test)]
pub use broker::MockBroker;
#[cfg(test)]
pub use metrics::MockPublishMetrics;
#[cfg(test)]
pub use publisher::MockPublisher;
#[cfg(test)]
pub use renderer::MockRenderer;
