//! Submission entity and its processing stages.

use serde::Serialize;
use std::fmt;

use crate::utils::url_extractor::extract_urls;

/// Raw text received from the caller plus the URLs extracted from it.
///
/// Lives only for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    text: String,
    urls: Vec<String>,
}

impl Submission {
    /// Builds a submission from already validated text.
    ///
    /// URL extraction never fails: text without URLs yields an empty list,
    /// which the dispatcher turns into the "URL not found" record.
    pub fn from_text(text: &str) -> Self {
        let text = text.trim().to_string();
        let urls = extract_urls(&text);
        Self { text, urls }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn has_urls(&self) -> bool {
        !self.urls.is_empty()
    }
}

/// Lifecycle of one submission, recorded in logs as the `stage` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Received,
    Validated,
    Dispatching,
    Rendered,
    Responded,
    Rejected,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::Validated => "validated",
            Stage::Dispatching => "dispatching",
            Stage::Rendered => "rendered",
            Stage::Responded => "responded",
            Stage::Rejected => "rejected",
        };
        f.write_str(name)
    }
}
