//! Text helpers shared by validation and logging.

use unicode_segmentation::UnicodeSegmentation;

/// Length in UTF-16 code units, the unit browsers report for `string.length`.
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// First `max` grapheme clusters of `text`, with `...` appended when cut.
pub fn truncate_graphemes(text: &str, max: usize) -> String {
    let mut graphemes = text.graphemes(true);
    let head: String = graphemes.by_ref().take(max).collect();
    if graphemes.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// Trim, drop angle brackets, trim again.
pub fn strip_markup(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| !matches!(c, '<' | '>'))
        .collect::<String>()
        .trim()
        .to_string()
}
