//! Template-based implementation of the [`Renderer`] contract.
//!
//! Templates live in `templates/` and are compiled in by `askama`:
//!
//! | target         | template                 |
//! |----------------|--------------------------|
//! | Presentation   | `collector.html`         |
//! | Telegram       | `publish/telegram.html`  |
//! | Discord        | `publish/discord.md`     |
//! | Github         | `publish/github.md`      |
//! | Plain          | `publish/plain.txt`      |
//! | Irc            | `publish/irc.txt`        |

use askama::Template;

use crate::domain::entities::{AggregateResult, ArchiveRecord, RenderTarget, Slot};
use crate::domain::ports::{RenderError, Renderer};

/// Records of one slot, as iterated by the publish templates.
pub struct SlotGroup<'a> {
    pub name: &'static str,
    pub extra: &'static str,
    pub records: Vec<&'a ArchiveRecord>,
}

/// Groups records by slot, keeping the aggregate order.
pub fn group_by_slot(records: &AggregateResult) -> Vec<SlotGroup<'_>> {
    records
        .slots()
        .into_iter()
        .map(|slot: Slot| SlotGroup {
            name: slot.name(),
            extra: slot.extra(),
            records: records.for_slot(slot).collect(),
        })
        .collect()
}

#[derive(Template)]
#[template(path = "collector.html")]
struct CollectorTemplate<'a> {
    records: &'a [ArchiveRecord],
}

#[derive(Template)]
#[template(path = "publish/telegram.html")]
struct TelegramTemplate<'a> {
    groups: &'a [SlotGroup<'a>],
}

#[derive(Template)]
#[template(path = "publish/discord.md")]
struct DiscordTemplate<'a> {
    groups: &'a [SlotGroup<'a>],
}

#[derive(Template)]
#[template(path = "publish/github.md")]
struct GithubTemplate<'a> {
    groups: &'a [SlotGroup<'a>],
}

#[derive(Template)]
#[template(path = "publish/plain.txt")]
struct PlainTemplate<'a> {
    groups: &'a [SlotGroup<'a>],
}

#[derive(Template)]
#[template(path = "publish/irc.txt")]
struct IrcTemplate<'a> {
    groups: &'a [SlotGroup<'a>],
}

/// Renders records through the compiled askama templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for TemplateRenderer {
    fn render(&self, records: &AggregateResult, target: RenderTarget) -> Result<String, RenderError> {
        let groups = group_by_slot(records);
        let groups = groups.as_slice();

        let rendered = match target {
            RenderTarget::Presentation => CollectorTemplate {
                records: records.records(),
            }
            .render(),
            RenderTarget::Telegram => TelegramTemplate { groups }.render(),
            RenderTarget::Discord => DiscordTemplate { groups }.render(),
            RenderTarget::Github => GithubTemplate { groups }.render(),
            RenderTarget::Plain => PlainTemplate { groups }.render(),
            RenderTarget::Irc => IrcTemplate { groups }
                .render()
                .map(|line| line.trim().trim_end_matches(',').to_string()),
        }
        .map_err(|e| RenderError::Template(e.to_string()))?;

        Ok(match target {
            RenderTarget::Presentation => rendered,
            _ => rendered.trim().to_string(),
        })
    }
}
