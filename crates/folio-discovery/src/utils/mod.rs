//! crates/folio-discovery/src/utils/mod.rs
//! Text helpers shared by the index and the CLI

/// Truncate a string to `max_chars` characters with an ellipsis.
///
/// Counts characters, not bytes, so multi-byte text never splits mid-glyph.
pub fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &s[..cut]),
        None => s.to_string(),
    }
}

/// Number of whitespace-separated words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Lowercased alphanumeric terms, in order of appearance
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Up to `width` words of `text` centred on word index `focus`.
///
/// Ellipses mark text cut from either end.
pub fn word_window(text: &str, focus: usize, width: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() || width == 0 {
        return String::new();
    }

    let focus = focus.min(words.len() - 1);
    let start = focus
        .saturating_sub(width / 2)
        .min(words.len().saturating_sub(width));
    let end = (start + width).min(words.len());

    let mut window = words[start..end].join(" ");
    if start > 0 {
        window.insert_str(0, "... ");
    }
    if end < words.len() {
        window.push_str(" ...");
    }
    window
}
