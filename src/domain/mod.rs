//! Domain layer containing entities and the contracts of external collaborators.
//!
//! # Architecture
//!
//! - [`entities`] - Slots, channels, archive records and submissions
//! - [`ports`] - Broker, Publisher, Renderer and metrics traits
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Port traits define contracts implemented outside the core
//! - Orchestration lives in [`crate::application::services`]

pub mod entities;
pub mod ports;
