// crates/folio-discovery/src/filter/mod.rs
// Tag filter engine: active-tag state, item visibility, URL sync

mod count;
mod session;
pub mod tags;
pub mod url;

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

pub use count::results_count_message;
pub use session::{ControlEvent, EventResponse, FilterSession, FilterSessionBuilder};
pub use tags::{TagSet, is_visible, parse_tag_list, serialize_tags};
pub use url::{TAGS_PARAM, tags_from_url, url_with_tags};

/// Content section a filter session operates on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SectionType {
    Writing,
    Work,
    Other(String),
}

impl SectionType {
    /// Singular noun used in the results-count message
    pub fn label(&self) -> &str {
        match self {
            Self::Writing => "post",
            Self::Work => "project",
            Self::Other(name) => name,
        }
    }

    /// Data attribute holding an item's comma-joined tag list
    pub fn tag_attribute(&self) -> &'static str {
        match self {
            Self::Writing => "data-post-tags",
            Self::Work => "data-project-tags",
            Self::Other(_) => "data-tags",
        }
    }
}

impl FromStr for SectionType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "writing" => Self::Writing,
            "work" => Self::Work,
            other => Self::Other(other.to_string()),
        })
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Writing => write!(f, "writing"),
            Self::Work => write!(f, "work"),
            Self::Other(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_labels() {
        assert_eq!(SectionType::Writing.label(), "post");
        assert_eq!(SectionType::Work.label(), "project");
        assert_eq!(SectionType::Other("talk".to_string()).label(), "talk");
    }

    #[test]
    fn test_section_parse_roundtrip() {
        let section: SectionType = "Writing".parse().unwrap();
        assert_eq!(section, SectionType::Writing);
        assert_eq!(section.to_string(), "writing");

        let other: SectionType = "notes".parse().unwrap();
        assert_eq!(other, SectionType::Other("notes".to_string()));
        assert_eq!(other.tag_attribute(), "data-tags");
    }
}
