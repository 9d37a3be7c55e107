//! Markdown pipeline.
//!
//! Turns article bodies into HTML and derives the data shown next to them:
//!
//! | Function            | Output                                      |
//! |---------------------|---------------------------------------------|
//! | [`render_markdown`] | HTML with heading ids, linkified URLs and safe external links |
//! | [`extract_toc`]     | `{level, title, anchor}` in document order  |
//! | [`reading_time`]    | whole minutes, at least 1                   |
//!
//! Rendering and TOC extraction parse with the same options and hand out
//! anchors through the same [`AnchorSet`] rules, so every TOC link points at
//! a heading id in the rendered HTML.

mod anchor;
mod highlight;
mod reading;
mod render;
mod toc;

pub use anchor::{AnchorSet, DuplicateAnchors};
pub use reading::reading_time;
pub use render::render_markdown;
pub use toc::{TocEntry, extract_toc};

use crate::config::MarkdownConfig;
use pulldown_cmark::{Event, Options, Tag, TagEnd};
use serde::Serialize;

/// Rendering switches, usually taken from `[markdown]` in folio.toml.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownOptions {
    pub highlight: bool,
    pub breaks: bool,
    pub smart_punctuation: bool,
    pub linkify: bool,
    pub duplicate_anchors: DuplicateAnchors,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            highlight: true,
            breaks: true,
            smart_punctuation: true,
            linkify: true,
            duplicate_anchors: DuplicateAnchors::default(),
        }
    }
}

impl From<&MarkdownConfig> for MarkdownOptions {
    fn from(config: &MarkdownConfig) -> Self {
        Self {
            highlight: config.highlight,
            breaks: config.breaks,
            smart_punctuation: config.smart_punctuation,
            linkify: config.linkify,
            duplicate_anchors: config.duplicate_anchors,
        }
    }
}

impl MarkdownOptions {
    /// Parser extensions. Raw HTML always passes through.
    fn parser_options(&self) -> Options {
        let mut options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
        if self.smart_punctuation {
            options.insert(Options::ENABLE_SMART_PUNCTUATION);
        }
        options
    }
}

/// A rendered article body with its derived data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedDocument {
    pub html: String,
    pub toc: Vec<TocEntry>,
    pub reading_time: u32,
}

/// Render `text` and derive its TOC and reading time in one call.
pub fn render_document(text: &str, options: &MarkdownOptions) -> RenderedDocument {
    RenderedDocument {
        html: render_markdown(text, options),
        toc: extract_toc(text, options),
        reading_time: reading_time(text),
    }
}

/// Collects the visible text of a heading.
///
/// Text nested in images (alt text) is ignored, so a heading holding only an
/// image has no title and gets neither an id nor a TOC entry.
#[derive(Debug, Default)]
struct HeadingText {
    text: String,
    image_depth: usize,
}

impl HeadingText {
    fn push(&mut self, event: &Event<'_>) {
        match event {
            Event::Start(Tag::Image { .. }) => self.image_depth += 1,
            Event::End(TagEnd::Image) => self.image_depth = self.image_depth.saturating_sub(1),
            Event::Text(text) | Event::Code(text) if self.image_depth == 0 => {
                self.text.push_str(text)
            }
            Event::SoftBreak | Event::HardBreak if self.image_depth == 0 => self.text.push(' '),
            _ => {}
        }
    }

    fn finish(self) -> Option<String> {
        let title = self.text.trim();
        (!title.is_empty()).then(|| title.to_owned())
    }
}
