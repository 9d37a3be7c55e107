//! Reading time estimation.

/// CJK characters read per minute
const CJK_PER_MINUTE: f64 = 300.0;
/// Non-CJK words read per minute
const WORDS_PER_MINUTE: f64 = 200.0;

/// Markdown markers ignored when counting
const MARKERS: &[char] = &['#', '*', '`', '_', '~', '[', ']', '(', ')'];

#[inline]
const fn is_cjk(c: char) -> bool {
    matches!(c, '\u{4e00}'..='\u{9fa5}')
}

/// Estimate reading time in whole minutes, never less than 1.
///
/// CJK characters and whitespace-delimited words in the remaining text are
/// counted separately: `ceil(cjk / 300 + words / 200)`.
pub fn reading_time(text: &str) -> u32 {
    let (cjk, words) = counts(text);
    let minutes = (cjk as f64 / CJK_PER_MINUTE + words as f64 / WORDS_PER_MINUTE).ceil();
    (minutes as u32).max(1)
}

/// `(cjk characters, words)` after markers are stripped.
///
/// CJK characters are removed before splitting, so `abc中def` is one word.
fn counts(text: &str) -> (usize, usize) {
    let plain: String = text.chars().filter(|c| !MARKERS.contains(c)).collect();

    let cjk = plain.chars().filter(|&c| is_cjk(c)).count();
    let rest: String = plain.chars().filter(|&c| !is_cjk(c)).collect();
    (cjk, rest.split_whitespace().count())
}
