//! # Wayback Relay
//!
//! An archival relay built with Axum: it extracts URLs from submitted text,
//! archives them concurrently across several web archives, answers with the
//! collected records, and publishes them to notification channels in the
//! background.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Slots, channels, records, and the ports
//!   brokers, publishers, renderers, and metrics sinks implement
//! - **Application Layer** ([`application`]) - Archive dispatch, submission
//!   handling, and publish fan-out
//! - **Infrastructure Layer** ([`infrastructure`]) - Template renderer and
//!   metrics recorder
//! - **API Layer** ([`api`]) - Submission and health handlers, DTOs, middleware
//! - **Web Layer** ([`web`]) - Submission form
//!
//! ## Features
//!
//! - One task per archive slot, merged into a deterministic record order
//! - JSON or HTML replies from the same submission endpoint
//! - Detached publishing with per-channel failure isolation and metrics
//! - Graceful shutdown that drains in-flight publish jobs
//! - Rate limiting and observability
//!
//! ## Quick Start
//!
//! ```bash
//! export WAYBACK_ENABLE_IA=true
//! export WAYBACK_PUBLISH_TELEGRAM=true
//! export WAYBACK_TELEGRAM_TOKEN="..." WAYBACK_TELEGRAM_CHANNEL="@archive"
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via
//! [`config::Options`]. See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;
pub mod web;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::Backends;
    pub use crate::application::services::{
        ArchiveService, PublishService, Reply, ResponseMode, SubmissionService,
    };
    pub use crate::config::Options;
    pub use crate::domain::entities::{
        AggregateResult, ArchiveRecord, ChannelKind, PublishOutcome, RenderTarget, Slot,
        Submission,
    };
    pub use crate::domain::ports::{
        Broker, BrokerError, PublishError, PublishMetrics, PublishStatus, Publisher, RenderError,
        Renderer,
    };
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
