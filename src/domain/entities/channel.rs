//! Publish channel entity.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// One notification provider consulted during the publish fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Telegram,
    Discord,
    Github,
    Mastodon,
    Twitter,
    Irc,
}

/// Text flavour a channel expects.
///
/// Channels sharing a target share one rendered payload per job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RenderTarget {
    /// HTML page returned to the submitting caller.
    Presentation,
    Telegram,
    Discord,
    Github,
    /// Plain text for microblogs.
    Plain,
    Irc,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 6] = [
        ChannelKind::Telegram,
        ChannelKind::Discord,
        ChannelKind::Github,
        ChannelKind::Mastodon,
        ChannelKind::Twitter,
        ChannelKind::Irc,
    ];

    /// Stable identifier, also used as the metrics label.
    pub fn as_str(self) -> &'static str {
        match self {
            ChannelKind::Telegram => "telegram",
            ChannelKind::Discord => "discord",
            ChannelKind::Github => "github",
            ChannelKind::Mastodon => "mastodon",
            ChannelKind::Twitter => "twitter",
            ChannelKind::Irc => "irc",
        }
    }

    /// Environment variable toggling publishing to this channel.
    pub fn env_key(self) -> String {
        format!("WAYBACK_PUBLISH_{}", self.as_str().to_ascii_uppercase())
    }

    /// Environment variables that must all be non-empty for the channel
    /// to count as configured.
    pub fn required_credentials(self) -> &'static [&'static str] {
        match self {
            ChannelKind::Telegram => &["WAYBACK_TELEGRAM_TOKEN", "WAYBACK_TELEGRAM_CHANNEL"],
            ChannelKind::Discord => &["WAYBACK_DISCORD_BOT_TOKEN", "WAYBACK_DISCORD_CHANNEL"],
            ChannelKind::Github => &[
                "WAYBACK_GITHUB_TOKEN",
                "WAYBACK_GITHUB_OWNER",
                "WAYBACK_GITHUB_REPO",
            ],
            ChannelKind::Mastodon => &[
                "WAYBACK_MASTODON_SERVER",
                "WAYBACK_MASTODON_KEY",
                "WAYBACK_MASTODON_SECRET",
                "WAYBACK_MASTODON_TOKEN",
            ],
            ChannelKind::Twitter => &[
                "WAYBACK_TWITTER_CONSUMER_KEY",
                "WAYBACK_TWITTER_CONSUMER_SECRET",
                "WAYBACK_TWITTER_ACCESS_TOKEN",
                "WAYBACK_TWITTER_ACCESS_SECRET",
            ],
            ChannelKind::Irc => &["WAYBACK_IRC_NICK", "WAYBACK_IRC_SERVER", "WAYBACK_IRC_CHANNEL"],
        }
    }

    pub fn render_target(self) -> RenderTarget {
        match self {
            ChannelKind::Telegram => RenderTarget::Telegram,
            ChannelKind::Discord => RenderTarget::Discord,
            ChannelKind::Github => RenderTarget::Github,
            ChannelKind::Mastodon | ChannelKind::Twitter => RenderTarget::Plain,
            ChannelKind::Irc => RenderTarget::Irc,
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown channel identifier.
#[derive(Debug, thiserror::Error)]
#[error("unknown publish channel: {0}")]
pub struct UnknownChannel(pub String);

impl FromStr for ChannelKind {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChannelKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownChannel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_parse() {
        assert_eq!("github".parse::<ChannelKind>().unwrap(), ChannelKind::Github);
        assert_eq!("IRC".parse::<ChannelKind>().unwrap(), ChannelKind::Irc);
        assert!("slack".parse::<ChannelKind>().is_err());
    }

    #[test]
    fn test_microblogs_share_render_target() {
        assert_eq!(
            ChannelKind::Mastodon.render_target(),
            ChannelKind::Twitter.render_target()
        );
        assert_ne!(
            ChannelKind::Github.render_target(),
            ChannelKind::Irc.render_target()
        );
    }

    #[test]
    fn test_env_keys() {
        assert_eq!(ChannelKind::Telegram.env_key(), "WAYBACK_PUBLISH_TELEGRAM");
        assert!(
            ChannelKind::Github
                .required_credentials()
                .contains(&"WAYBACK_GITHUB_REPO")
        );
    }
}
