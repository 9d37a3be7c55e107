//! Table of contents extraction.

use super::{AnchorSet, HeadingText, MarkdownOptions};
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use serde::Serialize;

/// One heading in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Heading level, 1..=6
    pub level: u8,
    /// Visible heading text
    pub title: String,
    /// Fragment id of the rendered heading
    pub anchor: String,
}

/// Collect the headings of `text`.
///
/// Headings without text (e.g. a lone image) are skipped; they still render,
/// just without an id.
pub fn extract_toc(text: &str, options: &MarkdownOptions) -> Vec<TocEntry> {
    let mut anchors = AnchorSet::new(options.duplicate_anchors);
    let mut toc = Vec::new();
    let mut current: Option<(u8, HeadingText)> = None;

    for event in Parser::new_ext(text, options.parser_options()) {
        match &event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((*level as u8, HeadingText::default()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, title)) = current.take()
                    && let Some(title) = title.finish()
                {
                    let anchor = anchors.assign(&title);
                    toc.push(TocEntry {
                        level,
                        title,
                        anchor,
                    });
                }
            }
            _ => {
                if let Some((_, title)) = current.as_mut() {
                    title.push(&event);
                }
            }
        }
    }

    toc
}
