//! Renderer contract.

use crate::domain::entities::{AggregateResult, RenderTarget};

/// Errors produced while turning records into text.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template rendering failed: {0}")]
    Template(String),

    #[error("serialization failed: {0}")]
    Serialize(String),
}

/// Pure transformation from an aggregate into text for one target.
#[cfg_attr(test, mockall::automock)]
pub trait Renderer: Send + Sync {
    /// # Errors
    ///
    /// Returns [`RenderError`] if the template cannot be rendered.
    fn render(&self, records: &AggregateResult, target: RenderTarget) -> Result<String, RenderError>;
}
