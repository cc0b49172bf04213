//! Domain entities representing core business objects.
//!
//! - [`Slot`] - Archive provider identity
//! - [`ChannelKind`] - Notification channel identity
//! - [`ArchiveRecord`] / [`AggregateResult`] - Dispatch outcomes
//! - [`Submission`] - Text received from the caller

pub mod channel;
pub mod record;
pub mod slot;
pub mod submission;

pub use channel::{ChannelKind, RenderTarget};
pub use record::{AggregateResult, ArchiveRecord, PublishOutcome, URL_NOT_FOUND, slot_records};
pub use slot::Slot;
pub use submission::{Stage, Submission};
