// crates/folio-discovery/src/filter/tags.rs
// Pure tag-set algebra

use std::collections::BTreeSet;

/// Tag membership set; ordered so serialization is canonical
pub type TagSet = BTreeSet<String>;

/// Split a comma-joined tag list, trimming and dropping empties
pub fn parse_tag_list(raw: &str) -> TagSet {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Sorted, comma-joined form; `None` for the empty set
pub fn serialize_tags(tags: &TagSet) -> Option<String> {
    if tags.is_empty() {
        return None;
    }
    Some(tags.iter().map(String::as_str).collect::<Vec<_>>().join(","))
}

/// An item is visible when no filter is active or it shares any active tag
pub fn is_visible(item_tags: &TagSet, active: &TagSet) -> bool {
    active.is_empty() || !item_tags.is_disjoint(active)
}
