//! Archive slot entity.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// One archive provider consulted during dispatch.
///
/// Variants are declared in display order; the derived [`Ord`] is what
/// keeps aggregated records stable across requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Slot {
    #[serde(rename = "ia")]
    InternetArchive,
    #[serde(rename = "is")]
    ArchiveToday,
    #[serde(rename = "ip")]
    Ipfs,
    #[serde(rename = "ph")]
    Telegraph,
}

impl Slot {
    /// All built-in slots in declaration order.
    pub const ALL: [Slot; 4] = [
        Slot::InternetArchive,
        Slot::ArchiveToday,
        Slot::Ipfs,
        Slot::Telegraph,
    ];

    /// Short identifier used in configuration and JSON (`ia`, `is`, `ip`, `ph`).
    pub fn id(self) -> &'static str {
        match self {
            Slot::InternetArchive => "ia",
            Slot::ArchiveToday => "is",
            Slot::Ipfs => "ip",
            Slot::Telegraph => "ph",
        }
    }

    /// Human-readable provider name.
    pub fn name(self) -> &'static str {
        match self {
            Slot::InternetArchive => "Internet Archive",
            Slot::ArchiveToday => "archive.today",
            Slot::Ipfs => "IPFS",
            Slot::Telegraph => "Telegraph",
        }
    }

    /// Provider landing page, rendered next to the slot name.
    pub fn extra(self) -> &'static str {
        match self {
            Slot::InternetArchive => "https://web.archive.org/",
            Slot::ArchiveToday => "https://archive.today/",
            Slot::Ipfs => "https://ipfs.github.io/public-gateway-checker/",
            Slot::Telegraph => "https://telegra.ph/",
        }
    }

    /// Environment variable toggling this slot.
    pub fn env_key(self) -> String {
        format!("WAYBACK_ENABLE_{}", self.id().to_ascii_uppercase())
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when parsing an unknown slot identifier.
#[derive(Debug, thiserror::Error)]
#[error("unknown archive slot: {0}")]
pub struct UnknownSlot(pub String);

impl FromStr for Slot {
    type Err = UnknownSlot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Slot::ALL
            .into_iter()
            .find(|slot| slot.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSlot(s.to_string()))
    }
}
