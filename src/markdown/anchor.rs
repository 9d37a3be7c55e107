//! Heading anchor generation.
//!
//! Anchors are the lowercased heading text with every run of characters
//! outside `[A-Za-z0-9_]` and the CJK block U+4E00..=U+9FA5 collapsed to `-`.
//! Rendering and TOC extraction both go through [`AnchorSet`] so that
//! in-page links always resolve.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{
    collections::{HashMap, HashSet},
    sync::LazyLock,
};

/// Policy for headings whose anchors collide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateAnchors {
    /// Append `-1`, `-2`, ... to repeated anchors (default)
    #[default]
    Suffix,
    /// Emit the same anchor for every colliding heading
    Keep,
}

static RE_NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\x{4e00}-\x{9fa5}]+").unwrap());

/// Convert heading text to its anchor.
///
/// Leading and trailing separators are kept, so `"Hello, World!"` becomes
/// `"hello-world-"`.
pub fn anchor(title: &str) -> String {
    RE_NON_WORD
        .replace_all(&title.to_lowercase(), "-")
        .into_owned()
}

/// Anchors handed out within one document.
#[derive(Debug, Default)]
pub struct AnchorSet {
    policy: DuplicateAnchors,
    used: HashSet<String>,
    /// Last suffix issued per base anchor
    suffixes: HashMap<String, usize>,
}

impl AnchorSet {
    pub fn new(policy: DuplicateAnchors) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Produce the anchor for the next heading with this title.
    pub fn assign(&mut self, title: &str) -> String {
        let base = anchor(title);
        if self.policy == DuplicateAnchors::Keep {
            return base;
        }

        let mut candidate = base.clone();
        if self.used.contains(&candidate) {
            let suffix = self.suffixes.entry(base.clone()).or_insert(0);
            while self.used.contains(&candidate) {
                *suffix += 1;
                candidate = format!("{base}-{suffix}");
            }
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_ascii() {
        assert_eq!(anchor("Hello World"), "hello-world");
        assert_eq!(anchor("snake_case stays"), "snake_case-stays");
        assert_eq!(anchor("Rust 2024 Edition"), "rust-2024-edition");
    }

    #[test]
    fn test_anchor_cjk() {
        assert_eq!(anchor("你好 世界"), "你好-世界");
        assert_eq!(anchor("你好   世界"), "你好-世界");
        assert_eq!(anchor("Vue 3 入门"), "vue-3-入门");
    }

    #[test]
    fn test_anchor_collapses_punctuation_runs() {
        assert_eq!(anchor("Hello, World!"), "hello-world-");
        assert_eq!(anchor("a -- b"), "a-b");
        assert_eq!(anchor("(intro)"), "-intro-");
    }

    #[test]
    fn test_anchor_non_ascii_letters_are_separators() {
        // only ASCII word characters and the CJK block survive
        assert_eq!(anchor("Café au lait"), "caf-au-lait");
        assert_eq!(anchor("日本語のテキスト"), "日本語-");
    }

    #[test]
    fn test_anchor_set_suffix() {
        let mut set = AnchorSet::new(DuplicateAnchors::Suffix);
        assert_eq!(set.assign("Intro"), "intro");
        assert_eq!(set.assign("Intro"), "intro-1");
        assert_eq!(set.assign("Intro"), "intro-2");
        assert_eq!(set.assign("Other"), "other");
    }

    #[test]
    fn test_anchor_set_suffix_avoids_existing_suffixed_title() {
        let mut set = AnchorSet::new(DuplicateAnchors::Suffix);
        assert_eq!(set.assign("Intro 1"), "intro-1");
        assert_eq!(set.assign("Intro"), "intro");
        // "intro-1" is taken by the first heading
        assert_eq!(set.assign("Intro"), "intro-2");
    }

    #[test]
    fn test_anchor_set_keep() {
        let mut set = AnchorSet::new(DuplicateAnchors::Keep);
        assert_eq!(set.assign("Intro"), "intro");
        assert_eq!(set.assign("Intro"), "intro");
    }
}
