//! Services orchestrating the relay core.

pub mod archive_service;
pub mod publish_service;
pub mod submission_service;

pub use archive_service::ArchiveService;
pub use publish_service::PublishService;
pub use submission_service::{Reply, ResponseMode, SubmissionService};
