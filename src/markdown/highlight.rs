//! Syntax highlighting for fenced code blocks.
//!
//! Output uses CSS classes (`hljs-` prefixed) rather than inline styles, so
//! the site stylesheet decides the theme.

use quick_xml::escape::escape;
use std::sync::LazyLock;
use syntect::{
    html::{ClassStyle, ClassedHTMLGenerator},
    parsing::SyntaxSet,
    util::LinesWithEndings,
};

/// syntect's defaults plus the extra grammars (TypeScript, TSX, Vue, ...).
static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(two_face::syntax::extra_newlines);

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hljs-" };

/// Render a code block.
///
/// Highlights when `lang` names a known syntax and `highlight` is on;
/// otherwise, or if highlighting fails, the code is emitted escaped.
pub fn code_block(code: &str, lang: Option<&str>, highlight: bool) -> String {
    if highlight
        && let Some(lang) = lang
        && let Some(html) = highlight_code(code, lang)
    {
        return format!(
            "<pre class=\"hljs\"><code class=\"language-{}\">{html}</code></pre>\n",
            escape(lang)
        );
    }

    format!("<pre class=\"hljs\"><code>{}</code></pre>\n", escape(code))
}

/// Highlight `code` as `lang`, `None` if the language is unknown or the
/// highlighter fails.
fn highlight_code(code: &str, lang: &str) -> Option<String> {
    let syntax = SYNTAX_SET.find_syntax_by_token(syntax_token(lang))?;
    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, CLASS_STYLE);

    for line in LinesWithEndings::from(code) {
        if let Err(err) = generator.parse_html_for_line_which_includes_newline(line) {
            crate::log!("markdown"; "highlighting `{lang}` failed: {err}");
            return None;
        }
    }

    Some(generator.finalize())
}

/// Fence names that syntect knows under another token.
fn syntax_token(lang: &str) -> &str {
    match lang {
        "shell" | "console" | "zsh" => "bash",
        other => other,
    }
}
