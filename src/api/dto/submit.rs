//! DTOs for the submission endpoint.

use serde::Deserialize;
use validator::Validate;

/// Largest accepted `text` field, in bytes.
pub const MAX_TEXT_LENGTH: usize = 16 * 1024;

/// Submission form, sent urlencoded or as JSON.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitRequest {
    /// Free text that may contain URLs.
    #[serde(default)]
    #[validate(custom(function = "validate_text_size"))]
    pub text: String,

    /// `json` for a JSON reply; anything else renders HTML.
    #[serde(default, rename = "data-type", alias = "data_type")]
    pub data_type: Option<String>,
}

impl SubmitRequest {
    /// Whether `text` holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

fn validate_text_size(text: &str) -> Result<(), validator::ValidationError> {
    if text.len() > MAX_TEXT_LENGTH {
        let mut err = validator::ValidationError::new("too_long");
        err.message = Some(format!("Text exceeds {MAX_TEXT_LENGTH} bytes").into());
        return Err(err);
    }
    Ok(())
}
