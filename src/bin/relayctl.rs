//! Operator CLI for wayback-relay.
//!
//! Inspects the configuration the relay would start with and previews URL
//! extraction without running the server.
//!
//! # Usage
//!
//! ```bash
//! # Validate configuration and show slot/channel status
//! cargo run --bin relayctl -- config check
//!
//! # Show which URLs a submission would archive
//! cargo run --bin relayctl -- extract "see https://example.com/ and https://example.org"
//!
//! # Inspect one archive slot or publish channel by id
//! cargo run --bin relayctl -- slot ia
//! cargo run --bin relayctl -- channel telegram
//! ```
//!
//! # Environment Variables
//!
//! Reads the same `WAYBACK_*` variables as the server (a `.env` file is
//! loaded when present).

use wayback_relay::config::Options;
use wayback_relay::domain::entities::{ChannelKind, Slot, Submission};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;

/// CLI tool for inspecting wayback-relay.
#[derive(Parser)]
#[command(name = "relayctl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Configuration operations
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Print the URLs extracted from a text
    Extract {
        /// Text as it would be submitted
        text: String,
    },

    /// Show one archive slot
    Slot {
        /// Slot id (ia, is, ip, ph)
        id: Slot,
    },

    /// Show one publish channel and its credentials
    Channel {
        /// Channel id (telegram, discord, github, mastodon, twitter, irc)
        id: ChannelKind,
    },
}

/// Configuration subcommands.
#[derive(Subcommand)]
enum ConfigAction {
    /// Load and validate configuration
    Check,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config {
            action: ConfigAction::Check,
        } => check_config(),
        Commands::Extract { text } => {
            extract(&text);
            Ok(())
        }
        Commands::Slot { id } => show_slot(id),
        Commands::Channel { id } => show_channel(id),
    }
}

/// Loads options, validates them, and prints slot and channel status.
fn check_config() -> Result<()> {
    println!("{}", "Configuration check".bright_blue().bold());
    println!();

    let options = Options::from_env().context("Failed to read configuration")?;

    println!("  {} {}", "Listen:".bold(), options.listen_addr);
    println!("  {} {}", "Log format:".bold(), options.log_format);
    println!(
        "  {} {}s",
        "Shutdown grace:".bold(),
        options.shutdown_grace_seconds
    );
    println!();

    println!("{}", "Archive slots".bold());
    for slot in Slot::ALL {
        let status = if options.is_slot_enabled(slot) {
            "enabled".green()
        } else {
            "disabled".dimmed()
        };
        println!("  {:<18} {:<4} {}", slot.name(), slot.id(), status);
    }
    println!();

    println!("{}", "Publish channels".bold());
    for kind in ChannelKind::ALL {
        println!("  {:<10} {}", kind.as_str(), channel_status(&options, kind));
    }
    println!();

    match options.validate() {
        Ok(()) => {
            println!("{}", "Configuration is valid".green().bold());
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "Configuration is invalid:".red().bold(), e);
            Err(e)
        }
    }
}

fn channel_status(options: &Options, kind: ChannelKind) -> ColoredString {
    let Some(channel) = options.channel(kind).filter(|c| c.enabled) else {
        return "disabled".dimmed();
    };

    let missing = channel.missing_credentials();
    if missing.is_empty() {
        "enabled".green()
    } else {
        format!("enabled, missing {}", missing.join(", ")).yellow()
    }
}

/// Prints the URLs the relay would archive for `text`.
fn extract(text: &str) {
    let submission = Submission::from_text(text);

    if !submission.has_urls() {
        println!("{}", "No URL found".yellow());
        return;
    }

    println!(
        "{}",
        format!("{} URL(s)", submission.urls().len()).bright_blue().bold()
    );
    for url in submission.urls() {
        println!("  {url}");
    }
}

/// Prints where `slot` archives to and whether it is enabled.
fn show_slot(slot: Slot) -> Result<()> {
    let options = Options::from_env().context("Failed to read configuration")?;

    println!("{}", slot.name().bright_blue().bold());
    println!("  {} {}", "Id:".bold(), slot.id());
    println!("  {} {}", "Archive:".bold(), slot.extra());
    println!("  {} {}", "Toggle:".bold(), slot.env_key());
    let status = if options.is_slot_enabled(slot) {
        "enabled".green()
    } else {
        "disabled".dimmed()
    };
    println!("  {} {}", "Status:".bold(), status);

    Ok(())
}

/// Prints the status of `kind` and which of its credentials are set.
fn show_channel(kind: ChannelKind) -> Result<()> {
    let options = Options::from_env().context("Failed to read configuration")?;

    println!("{}", kind.as_str().bright_blue().bold());
    println!("  {} {}", "Status:".bold(), channel_status(&options, kind));
    println!("  {}", "Credentials:".bold());

    let channel = options.channel(kind);
    for key in kind.required_credentials() {
        let set = channel.and_then(|c| c.credential(key)).is_some();
        let marker = if set { "set".green() } else { "missing".red() };
        println!("    {key:<32} {marker}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_parse_into_slot_and_channel() {
        let cli = Cli::try_parse_from(["relayctl", "slot", "IA"]).unwrap();
        assert!(matches!(cli.command, Commands::Slot { id: Slot::InternetArchive }));

        let cli = Cli::try_parse_from(["relayctl", "channel", "telegram"]).unwrap();
        assert!(matches!(cli.command, Commands::Channel { id: ChannelKind::Telegram }));
    }

    #[test]
    fn test_unknown_id_is_rejected() {
        assert!(Cli::try_parse_from(["relayctl", "slot", "ga"]).is_err());
        assert!(Cli::try_parse_from(["relayctl", "channel", "slack"]).is_err());
    }
}
