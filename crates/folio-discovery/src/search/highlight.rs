// crates/folio-discovery/src/search/highlight.rs
// Case-insensitive term highlighting with literal (escaped) patterns

use regex::RegexBuilder;
use tracing::warn;

pub const HIGHLIGHT_OPEN: &str = "<mark>";
pub const HIGHLIGHT_CLOSE: &str = "</mark>";

/// Wrap every case-insensitive occurrence of any whitespace-separated query
/// term in `<mark>` tags. Terms are matched literally; an empty query
/// returns the text unchanged.
pub fn highlight(text: &str, query: &str) -> String {
    let mut terms: Vec<&str> = query.split_whitespace().collect();
    if terms.is_empty() || text.is_empty() {
        return text.to_string();
    }
    // Longest first so "design" wins over "des" at the same position
    terms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    terms.dedup();

    let pattern = terms
        .iter()
        .map(|term| regex::escape(term))
        .collect::<Vec<_>>()
        .join("|");

    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => re
            .replace_all(text, |caps: &regex::Captures| {
                format!("{}{}{}", HIGHLIGHT_OPEN, &caps[0], HIGHLIGHT_CLOSE)
            })
            .into_owned(),
        Err(e) => {
            warn!(query, error = %e, "Could not build highlight pattern");
            text.to_string()
        }
    }
}
