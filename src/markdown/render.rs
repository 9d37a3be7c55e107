//! Markdown to HTML rendering.

use super::{AnchorSet, HeadingText, MarkdownOptions, highlight};
use linkify::{LinkFinder, LinkKind};
use pulldown_cmark::{
    CodeBlockKind, CowStr, Event, LinkType, Parser, Tag, TagEnd, TextMergeStream, html,
};
use pulldown_cmark_escape::{escape_href, escape_html};
use std::sync::LazyLock;

/// Finds `scheme://` URLs in plain text.
static URL_FINDER: LazyLock<LinkFinder> = LazyLock::new(|| {
    let mut finder = LinkFinder::new();
    finder.kinds(&[LinkKind::Url]);
    finder
});

/// Fenced code block being collected.
struct FencedCode {
    lang: Option<String>,
    code: String,
}

/// Render Markdown to an HTML fragment.
///
/// - fenced code goes through the highlighter
/// - headings with text get `id="{anchor}"`
/// - bare URLs outside links and code become links when `linkify` is on
/// - links to `http…` or `//…` open in a new tab without referrer or opener
pub fn render_markdown(text: &str, options: &MarkdownOptions) -> String {
    let mut anchors = AnchorSet::new(options.duplicate_anchors);
    let mut events: Vec<Event<'_>> = Vec::new();
    let mut heading: Option<(usize, HeadingText)> = None;
    let mut fenced: Option<FencedCode> = None;
    // open links, images and indented code blocks
    let mut verbatim = 0usize;

    let parser = Parser::new_ext(text, options.parser_options());
    for event in TextMergeStream::new(parser) {
        if let Some(block) = fenced.as_mut() {
            match event {
                Event::Text(code) => block.code.push_str(&code),
                Event::End(TagEnd::CodeBlock) => {
                    let html =
                        highlight::code_block(&block.code, block.lang.as_deref(), options.highlight);
                    events.push(Event::Html(html.into()));
                    fenced = None;
                }
                _ => {}
            }
            continue;
        }

        if let Some((_, title)) = heading.as_mut() {
            title.push(&event);
        }

        match &event {
            Event::Start(
                Tag::Link { .. } | Tag::Image { .. } | Tag::CodeBlock(CodeBlockKind::Indented),
            ) => verbatim += 1,
            Event::InlineHtml(html) if is_raw_link_open(html) => verbatim += 1,
            Event::End(TagEnd::Link | TagEnd::Image | TagEnd::CodeBlock) => {
                verbatim = verbatim.saturating_sub(1)
            }
            Event::InlineHtml(html) if html.to_ascii_lowercase().starts_with("</a") => {
                verbatim = verbatim.saturating_sub(1)
            }
            _ => {}
        }

        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                fenced = Some(FencedCode {
                    lang: fence_language(info),
                    code: String::new(),
                });
            }
            Event::Start(Tag::Heading { .. }) => {
                heading = Some((events.len(), HeadingText::default()));
                events.push(event);
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((start, title)) = heading.take()
                    && let Some(title) = title.finish()
                    && let Event::Start(Tag::Heading { id, .. }) = &mut events[start]
                {
                    *id = Some(anchors.assign(&title).into());
                }
                events.push(event);
            }
            Event::Start(Tag::Link {
                dest_url, title, ..
            }) if is_external(&dest_url) => {
                events.push(Event::InlineHtml(external_link_open(&dest_url, &title).into()));
            }
            Event::Text(text) if options.linkify && verbatim == 0 => {
                push_linkified(text, &mut events)
            }
            Event::SoftBreak if options.breaks => events.push(Event::HardBreak),
            other => events.push(other),
        }
    }

    let mut output = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut output, events.into_iter());
    output
}

/// Language tag of a fence: the first word of its info string.
fn fence_language(info: CowStr<'_>) -> Option<String> {
    info.split_whitespace().next().map(str::to_owned)
}

/// `<a>` or `<a ...>` written as inline HTML.
fn is_raw_link_open(html: &str) -> bool {
    let lower = html.to_ascii_lowercase();
    lower.starts_with("<a>") || lower.starts_with("<a ")
}

/// Absolute and protocol-relative targets leave the site.
#[inline]
fn is_external(href: &str) -> bool {
    href.starts_with("http") || href.starts_with("//")
}

/// Opening `<a>` for an external target, escaped the way pulldown-cmark
/// escapes its own links.
fn external_link_open(href: &str, title: &str) -> String {
    let mut tag = String::from("<a href=\"");
    // writing into a String cannot fail
    let _ = escape_href(&mut tag, href);
    if !title.is_empty() {
        tag.push_str("\" title=\"");
        let _ = escape_html(&mut tag, title);
    }
    tag.push_str("\" target=\"_blank\" rel=\"noopener noreferrer\">");
    tag
}

/// Push `text`, turning every URL in it into a link.
fn push_linkified<'a>(text: CowStr<'a>, events: &mut Vec<Event<'a>>) {
    if URL_FINDER.links(&text).next().is_none() {
        events.push(Event::Text(text));
        return;
    }

    for span in URL_FINDER.spans(&text) {
        let part = span.as_str().to_owned();
        if span.kind().is_none() {
            events.push(Event::Text(part.into()));
            continue;
        }

        let open = if is_external(&part) {
            Event::InlineHtml(external_link_open(&part, "").into())
        } else {
            Event::Start(Tag::Link {
                link_type: LinkType::Autolink,
                dest_url: part.clone().into(),
                title: CowStr::Borrowed(""),
                id: CowStr::Borrowed(""),
            })
        };
        events.push(open);
        events.push(Event::Text(part.into()));
        events.push(Event::End(TagEnd::Link));
    }
}
