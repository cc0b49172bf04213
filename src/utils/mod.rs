//! Helpers shared across layers.
//!
//! - [`url_extractor`] - URL discovery and normalization in free text

pub mod url_extractor;
