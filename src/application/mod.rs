//! Application layer: the relay's fan-out/fan-in orchestration.
//!
//! Services consume the domain ports and know nothing about HTTP beyond the
//! reply they hand back to handlers.
//!
//! # Available Services
//!
//! - [`services::ArchiveService`] - Archive dispatch across enabled slots
//! - [`services::PublishService`] - Detached publish fan-out across channels
//! - [`services::SubmissionService`] - Per-request state machine

pub mod backends;
pub mod services;

pub use backends::Backends;
