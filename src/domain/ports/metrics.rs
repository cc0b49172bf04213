//! Publish metrics sink.

use crate::domain::entities::ChannelKind;

/// Publish counter status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublishStatus {
    Request,
    Success,
    Failure,
}

impl PublishStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PublishStatus::Request => "request",
            PublishStatus::Success => "success",
            PublishStatus::Failure => "failure",
        }
    }
}

/// Counter-increment interface used by the publish fan-out.
///
/// Every enabled channel gets one `Request` before the attempt and one
/// `Success` or `Failure` after it.
#[cfg_attr(test, mockall::automock)]
pub trait PublishMetrics: Send + Sync {
    fn increment_publish(&self, channel: ChannelKind, status: PublishStatus);
}
