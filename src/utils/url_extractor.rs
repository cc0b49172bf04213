//! URL extraction from free-form text.
//!
//! Finds `http`/`https` URLs, strips trailing punctuation picked up from the
//! surrounding prose, and normalizes hostnames and default ports.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

/// Candidate URLs: a scheme followed by anything up to whitespace or a delimiter.
static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)https?://[^\s<>"'`]+"#).unwrap());

/// Characters commonly glued to the end of a URL in prose.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}', '>', '\''];

/// Errors that can occur while normalizing a single URL.
#[derive(Debug, thiserror::Error)]
pub enum UrlExtractionError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,
}

/// Extracts every distinct HTTP(S) URL from `text`, in order of appearance.
///
/// Invalid candidates are skipped. Duplicates are detected after
/// normalization, so `https://EXAMPLE.com:443/` and `https://example.com/`
/// count once.
pub fn extract_urls(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();

    URL_REGEX
        .find_iter(text)
        .filter_map(|m| normalize_url(trim_candidate(m.as_str())).ok())
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Removes trailing punctuation, keeping a closing parenthesis when the URL
/// itself opened one (e.g. Wikipedia links).
fn trim_candidate(candidate: &str) -> &str {
    let mut end = candidate.len();
    while let Some(c) = candidate[..end].chars().next_back() {
        if !TRAILING_PUNCTUATION.contains(&c) {
            break;
        }
        if c == ')' {
            let opened = candidate[..end].matches('(').count();
            let closed = candidate[..end].matches(')').count();
            if opened >= closed {
                break;
            }
        }
        end -= c.len_utf8();
    }
    &candidate[..end]
}

/// Normalizes a URL to a canonical form.
///
/// Lowercases the host, removes default ports and drops fragments. Query
/// and path are kept as-is.
pub fn normalize_url(input: &str) -> Result<String, UrlExtractionError> {
    let mut url = Url::parse(input).map_err(|e| UrlExtractionError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlExtractionError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlExtractionError::MissingHost);
    }

    url.set_fragment(None);

    let is_default_port = matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    );
    if is_default_port {
        let _ = url.set_port(None);
    }

    Ok(url.to_string())
}
