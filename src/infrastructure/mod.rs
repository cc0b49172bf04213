//! Infrastructure layer for concrete implementations of domain contracts.
//!
//! # Modules
//!
//! - [`metrics`] - Publish counters through the `metrics` facade
//! - [`render`] - Askama templates behind the renderer contract

pub mod metrics;
pub mod render;
