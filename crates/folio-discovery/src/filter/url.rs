// crates/folio-discovery/src/filter/url.rs
// The `tags` query parameter is the durable form of filter state

use super::tags::{TagSet, parse_tag_list, serialize_tags};
use crate::error::Result;
use tracing::warn;
use url::Url;

pub const TAGS_PARAM: &str = "tags";

/// Active tags encoded in a location. Malformed URLs yield no tags.
pub fn tags_from_url(location: &str) -> TagSet {
    match Url::parse(location) {
        Ok(url) => url
            .query_pairs()
            .find(|(key, _)| key == TAGS_PARAM)
            .map(|(_, value)| parse_tag_list(&value))
            .unwrap_or_default(),
        Err(e) => {
            warn!(location, error = %e, "Unparseable location, starting unfiltered");
            TagSet::new()
        }
    }
}

/// `location` with its `tags` parameter set to the sorted tag list, or
/// removed entirely when `tags` is empty. Other parameters keep their order.
pub fn url_with_tags(location: &str, tags: &TagSet) -> Result<String> {
    let mut url = Url::parse(location)?;

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != TAGS_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    let serialized = serialize_tags(tags);

    if kept.is_empty() && serialized.is_none() {
        url.set_query(None);
    } else {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (key, value) in &kept {
            pairs.append_pair(key, value);
        }
        if let Some(value) = &serialized {
            pairs.append_pair(TAGS_PARAM, value);
        }
    }

    Ok(url.to_string())
}
