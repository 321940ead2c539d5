// crates/folio-discovery/src/search/format.rs
// Result-count wording and search-page URL helpers

use tracing::warn;
use url::{ParseError, Url};

pub const SEARCH_QUERY_PARAM: &str = "q";

/// Placeholder origin for resolving site-relative paths like "/search/"
const RELATIVE_BASE: &str = "http://folio.invalid";

/// "No posts found" / "1 post" / "3 posts"
pub fn format_result_count(count: usize, kind: &str) -> String {
    match count {
        0 => format!("No {}s found", kind),
        1 => format!("1 {}", kind),
        n => format!("{} {}s", n, kind),
    }
}

/// Parse absolute URLs as-is and site-relative ones against a placeholder
/// origin. Returns the parsed URL and whether it was relative.
fn parse_lenient(raw: &str) -> Result<(Url, bool), ParseError> {
    match Url::parse(raw) {
        Ok(url) => Ok((url, false)),
        Err(ParseError::RelativeUrlWithoutBase) => {
            let base = Url::parse(RELATIVE_BASE)?;
            Ok((base.join(raw)?, true))
        }
        Err(e) => Err(e),
    }
}

/// Search page URL carrying `query` as `q`. A blank query yields the bare
/// page. Malformed bases yield `None`.
pub fn search_url(base: &str, query: &str) -> Option<String> {
    let (mut url, relative) = match parse_lenient(base) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(base, error = %e, "Cannot build search URL");
            return None;
        }
    };

    let query = query.trim();
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != SEARCH_QUERY_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if kept.is_empty() && query.is_empty() {
        url.set_query(None);
    } else {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (key, value) in &kept {
            pairs.append_pair(key, value);
        }
        if !query.is_empty() {
            pairs.append_pair(SEARCH_QUERY_PARAM, query);
        }
    }

    if relative {
        let mut out = url.path().to_string();
        if let Some(q) = url.query() {
            out.push('?');
            out.push_str(q);
        }
        if let Some(fragment) = url.fragment() {
            out.push('#');
            out.push_str(fragment);
        }
        Some(out)
    } else {
        Some(url.to_string())
    }
}

/// The trimmed, non-empty `q` parameter of a search page URL
pub fn query_from_url(raw: &str) -> Option<String> {
    let (url, _) = match parse_lenient(raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(url = raw, error = %e, "Cannot read search query from URL");
            return None;
        }
    };

    url.query_pairs()
        .find(|(key, _)| key == SEARCH_QUERY_PARAM)
        .map(|(_, value)| value.trim().to_string())
        .filter(|q| !q.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_result_count_boundaries() {
        assert_eq!(format_result_count(0, "post"), "No posts found");
        assert_eq!(format_result_count(1, "post"), "1 post");
        assert_eq!(format_result_count(2, "post"), "2 posts");
    }

    #[test]
    fn test_search_url_absolute() {
        assert_eq!(
            search_url("https://example.com/search/", "rust async").as_deref(),
            Some("https://example.com/search/?q=rust+async")
        );
    }

    #[test]
    fn test_search_url_relative() {
        assert_eq!(
            search_url("/search/", "a&b").as_deref(),
            Some("/search/?q=a%26b")
        );
    }

    #[test]
    fn test_search_url_blank_query() {
        assert_eq!(
            search_url("/search/?q=old", "  ").as_deref(),
            Some("/search/")
        );
    }

    #[test]
    fn test_search_url_malformed_base() {
        assert_eq!(search_url("http://[::1", "rust"), None);
    }

    #[test]
    fn test_query_from_url() {
        assert_eq!(
            query_from_url("https://example.com/search/?q=rust+async").as_deref(),
            Some("rust async")
        );
        assert_eq!(
            query_from_url("/search/?q=%245.00").as_deref(),
            Some("$5.00")
        );
    }

    #[test]
    fn test_query_from_url_missing_or_blank() {
        assert_eq!(query_from_url("/search/"), None);
        assert_eq!(query_from_url("/search/?q=+"), None);
        assert_eq!(query_from_url("http://[::1"), None);
    }

    #[test]
    fn test_roundtrip_through_url() {
        let url = search_url("/search/", "price is $5.00").unwrap();
        assert_eq!(query_from_url(&url).as_deref(), Some("price is $5.00"));
    }
}
