//! Relay options loaded from environment variables.
//!
//! Options are resolved once at startup, validated, and then shared
//! read-only (`Arc<Options>`) with every component that needs them.
//!
//! ## Archive slots
//!
//! ```bash
//! export WAYBACK_ENABLE_IA=true   # Internet Archive (default: true)
//! export WAYBACK_ENABLE_IS=true   # archive.today
//! export WAYBACK_ENABLE_IP=false  # IPFS
//! export WAYBACK_ENABLE_PH=false  # Telegraph
//! ```
//!
//! ## Publish channels
//!
//! A channel is published to when its toggle is on. Its credentials must all
//! be present, otherwise each publish attempt is recorded as a failure
//! without any network call.
//!
//! ```bash
//! export WAYBACK_PUBLISH_GITHUB=true
//! export WAYBACK_GITHUB_TOKEN="ghp_..."
//! export WAYBACK_GITHUB_OWNER="wabarc"
//! export WAYBACK_GITHUB_REPO="archives"
//! ```
//!
//! See [`ChannelKind::required_credentials`] for every channel's variables.
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:8964`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `BEHIND_PROXY` - Rate limit on forwarded client IPs (default: `false`)
//! - `SHUTDOWN_GRACE_SECONDS` - Wait for in-flight publishes on shutdown (default: 30)

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::env;

use crate::domain::entities::{ChannelKind, Slot};

/// Toggle and credentials of one publish channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    pub kind: ChannelKind,
    pub enabled: bool,
    credentials: BTreeMap<&'static str, String>,
}

impl ChannelConfig {
    /// A disabled channel without credentials.
    pub fn disabled(kind: ChannelKind) -> Self {
        Self {
            kind,
            enabled: false,
            credentials: BTreeMap::new(),
        }
    }

    /// Returns the credential stored under `key`, if present and non-empty.
    pub fn credential(&self, key: &str) -> Option<&str> {
        self.credentials
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Required credential variables that are missing or empty.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        self.kind
            .required_credentials()
            .iter()
            .copied()
            .filter(|key| self.credential(key).is_none())
            .collect()
    }

    /// Whether every required credential is present.
    pub fn is_configured(&self) -> bool {
        self.missing_credentials().is_empty()
    }
}

/// Resolved relay configuration.
#[derive(Debug, Clone)]
pub struct Options {
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    /// When true, rate limiting reads client IP from X-Forwarded-For / X-Real-IP headers.
    pub behind_proxy: bool,
    /// How long shutdown waits for detached publish tasks.
    pub shutdown_grace_seconds: u64,
    slots: BTreeMap<Slot, bool>,
    channels: BTreeMap<ChannelKind, ChannelConfig>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8964".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            behind_proxy: false,
            shutdown_grace_seconds: 30,
            slots: Slot::ALL
                .into_iter()
                .map(|slot| (slot, slot == Slot::InternetArchive))
                .collect(),
            channels: ChannelKind::ALL
                .into_iter()
                .map(|kind| (kind, ChannelConfig::disabled(kind)))
                .collect(),
        }
    }
}

impl Options {
    /// Loads options from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads options through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let listen_addr = lookup("LISTEN").unwrap_or(defaults.listen_addr);
        let log_level = lookup("RUST_LOG").unwrap_or(defaults.log_level);
        let log_format = lookup("LOG_FORMAT").unwrap_or(defaults.log_format);
        let behind_proxy = parse_bool(lookup("BEHIND_PROXY"), false);

        let shutdown_grace_seconds = match lookup("SHUTDOWN_GRACE_SECONDS") {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("SHUTDOWN_GRACE_SECONDS must be a number, got '{v}'"))?,
            None => defaults.shutdown_grace_seconds,
        };

        let slots = defaults
            .slots
            .into_iter()
            .map(|(slot, default)| (slot, parse_bool(lookup(&slot.env_key()), default)))
            .collect();

        let channels = ChannelKind::ALL
            .into_iter()
            .map(|kind| {
                let credentials = kind
                    .required_credentials()
                    .iter()
                    .filter_map(|key| lookup(key).map(|value| (*key, value)))
                    .collect();
                let config = ChannelConfig {
                    kind,
                    enabled: parse_bool(lookup(&kind.env_key()), false),
                    credentials,
                };
                (kind, config)
            })
            .collect();

        Ok(Self {
            listen_addr,
            log_level,
            log_format,
            behind_proxy,
            shutdown_grace_seconds,
            slots,
            channels,
        })
    }

    /// Validates the options.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is not `host:port`
    /// - no archive slot is enabled
    /// - `shutdown_grace_seconds` is outside 1..=600
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if self.enabled_slots().is_empty() {
            anyhow::bail!("At least one WAYBACK_ENABLE_* archive slot must be enabled");
        }

        if self.shutdown_grace_seconds == 0 || self.shutdown_grace_seconds > 600 {
            anyhow::bail!(
                "SHUTDOWN_GRACE_SECONDS must be between 1 and 600, got {}",
                self.shutdown_grace_seconds
            );
        }

        Ok(())
    }

    /// Enables exactly the given slots.
    pub fn with_slots(mut self, enabled: &[Slot]) -> Self {
        for (slot, on) in self.slots.iter_mut() {
            *on = enabled.contains(slot);
        }
        self
    }

    /// Enables a channel with the given credentials.
    pub fn with_channel<I>(mut self, kind: ChannelKind, credentials: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, String)>,
    {
        self.channels.insert(
            kind,
            ChannelConfig {
                kind,
                enabled: true,
                credentials: credentials.into_iter().collect(),
            },
        );
        self
    }

    pub fn is_slot_enabled(&self, slot: Slot) -> bool {
        self.slots.get(&slot).copied().unwrap_or(false)
    }

    /// Enabled slots in display order.
    pub fn enabled_slots(&self) -> Vec<Slot> {
        self.slots
            .iter()
            .filter(|(_, on)| **on)
            .map(|(slot, _)| *slot)
            .collect()
    }

    pub fn channel(&self, kind: ChannelKind) -> Option<&ChannelConfig> {
        self.channels.get(&kind)
    }

    /// Channels with their toggle on, configured or not.
    pub fn enabled_channels(&self) -> Vec<ChannelKind> {
        self.channels
            .values()
            .filter(|c| c.enabled)
            .map(|c| c.kind)
            .collect()
    }

    pub fn channels(&self) -> impl Iterator<Item = &ChannelConfig> {
        self.channels.values()
    }

    /// Prints options summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);

        let slots: Vec<_> = self.enabled_slots().iter().map(|s| s.name()).collect();
        tracing::info!("  Archive slots: {}", slots.join(", "));

        for channel in self.channels().filter(|c| c.enabled) {
            let missing = channel.missing_credentials();
            if missing.is_empty() {
                let shown: Vec<_> = channel
                    .credentials
                    .iter()
                    .map(|(k, v)| format!("{k}={}", mask_secret(v)))
                    .collect();
                tracing::info!("  Publish {}: {}", channel.kind, shown.join(" "));
            } else {
                tracing::warn!(
                    "  Publish {}: enabled but missing {}",
                    channel.kind,
                    missing.join(", ")
                );
            }
        }
    }
}

/// Parses a boolean toggle, accepting `true`/`1`/`yes`/`on`.
fn parse_bool(value: Option<String>, default: bool) -> bool {
    match value {
        Some(v) => {
            let v = v.trim();
            v.eq_ignore_ascii_case("true")
                || v == "1"
                || v.eq_ignore_ascii_case("yes")
                || v.eq_ignore_ascii_case("on")
        }
        None => default,
    }
}

/// Masks a secret for logging, keeping at most the first four characters.
///
/// - `ghp_abcdef123` → `ghp_***`
/// - `abc` → `***`
fn mask_secret(value: &str) -> String {
    let prefix: String = value.chars().take(4).collect();
    if value.chars().count() <= 8 {
        "***".to_string()
    } else {
        format!("{prefix}***")
    }
}

/// Loads and validates options from environment variables.
///
/// # Errors
///
/// Returns an error if a variable is malformed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Options> {
    let options = Options::from_env()?;
    options.validate()?;
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("ghp_abcdef123"), "ghp_***");
        assert_eq!(mask_secret("short"), "***");
    }

    #[test]
    fn test_defaults() {
        let options = Options::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(options.listen_addr, "0.0.0.0:8964");
        assert_eq!(options.enabled_slots(), vec![Slot::InternetArchive]);
        assert!(options.enabled_channels().is_empty());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_slot_toggles() {
        let options = Options::from_lookup(lookup_from(&[
            ("WAYBACK_ENABLE_IA", "false"),
            ("WAYBACK_ENABLE_PH", "1"),
            ("WAYBACK_ENABLE_IS", "yes"),
        ]))
        .unwrap();

        assert_eq!(
            options.enabled_slots(),
            vec![Slot::ArchiveToday, Slot::Telegraph]
        );
        assert!(!options.is_slot_enabled(Slot::InternetArchive));
    }

    #[test]
    fn test_channel_credentials() {
        let options = Options::from_lookup(lookup_from(&[
            ("WAYBACK_PUBLISH_GITHUB", "true"),
            ("WAYBACK_GITHUB_TOKEN", "ghp_token"),
            ("WAYBACK_GITHUB_OWNER", "wabarc"),
            ("WAYBACK_PUBLISH_IRC", "true"),
            ("WAYBACK_IRC_NICK", "relay"),
        ]))
        .unwrap();

        assert_eq!(
            options.enabled_channels(),
            vec![ChannelKind::Github, ChannelKind::Irc]
        );

        let github = options.channel(ChannelKind::Github).unwrap();
        assert!(!github.is_configured());
        assert_eq!(github.missing_credentials(), vec!["WAYBACK_GITHUB_REPO"]);
        assert_eq!(github.credential("WAYBACK_GITHUB_OWNER"), Some("wabarc"));

        let telegram = options.channel(ChannelKind::Telegram).unwrap();
        assert!(!telegram.enabled);
    }

    #[test]
    fn test_blank_credential_counts_as_missing() {
        let options = Options::default().with_channel(
            ChannelKind::Telegram,
            [
                ("WAYBACK_TELEGRAM_TOKEN", "token".to_string()),
                ("WAYBACK_TELEGRAM_CHANNEL", "   ".to_string()),
            ],
        );

        let telegram = options.channel(ChannelKind::Telegram).unwrap();
        assert_eq!(telegram.missing_credentials(), vec!["WAYBACK_TELEGRAM_CHANNEL"]);
    }

    #[test]
    fn test_options_validation() {
        let mut options = Options::default();
        assert!(options.validate().is_ok());

        options.log_format = "invalid".to_string();
        assert!(options.validate().is_err());
        options.log_format = "json".to_string();
        assert!(options.validate().is_ok());

        options.listen_addr = "8964".to_string();
        assert!(options.validate().is_err());
        options.listen_addr = "127.0.0.1:8964".to_string();

        options.shutdown_grace_seconds = 0;
        assert!(options.validate().is_err());
        options.shutdown_grace_seconds = 30;

        let options = options.with_slots(&[]);
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_invalid_grace_period_is_an_error() {
        let result = Options::from_lookup(lookup_from(&[("SHUTDOWN_GRACE_SECONDS", "soon")]));
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_from_env() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("LISTEN", "127.0.0.1:9000");
            env::set_var("WAYBACK_ENABLE_IP", "true");
            env::set_var("WAYBACK_PUBLISH_MASTODON", "true");
        }

        let options = Options::from_env().unwrap();

        assert_eq!(options.listen_addr, "127.0.0.1:9000");
        assert!(options.is_slot_enabled(Slot::Ipfs));
        assert!(options.enabled_channels().contains(&ChannelKind::Mastodon));

        // Cleanup
        unsafe {
            env::remove_var("LISTEN");
            env::remove_var("WAYBACK_ENABLE_IP");
            env::remove_var("WAYBACK_PUBLISH_MASTODON");
        }
    }
}
