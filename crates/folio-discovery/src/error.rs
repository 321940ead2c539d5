// crates/folio-discovery/src/error.rs
// Standardized error types for Folio discovery

use thiserror::Error;

/// Main error type for the discovery library
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// A DOM anchor the filter engine needs is absent from the page
    #[error("missing page anchor: {0}")]
    MissingAnchor(String),

    #[error("search index unavailable after {attempts} attempts: {reason}")]
    IndexUnavailable { attempts: u32, reason: String },

    #[error("index load failed: {0}")]
    IndexLoad(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("result materialization failed: {0}")]
    Materialize(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    /// A component that spawns timers was started outside a Tokio runtime
    #[error("no Tokio runtime available: {0}")]
    NoRuntime(String),

    #[error("unknown error: {0}")]
    Other(String),
}

/// Convenience type alias for Result using DiscoveryError
pub type Result<T> = std::result::Result<T, DiscoveryError>;

impl DiscoveryError {
    /// Whether the caller should fall back to a "search unavailable" state
    pub fn is_unavailable(&self) -> bool {
        matches!(self, DiscoveryError::IndexUnavailable { .. })
    }
}

impl From<String> for DiscoveryError {
    fn from(s: String) -> Self {
        DiscoveryError::Other(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================================
    // Display tests
    // ============================================================================

    #[test]
    fn test_missing_anchor_error() {
        let err = DiscoveryError::MissingAnchor("results count".to_string());
        assert!(err.to_string().contains("missing page anchor"));
        assert!(err.to_string().contains("results count"));
    }

    #[test]
    fn test_index_unavailable_error() {
        let err = DiscoveryError::IndexUnavailable {
            attempts: 3,
            reason: "connection reset".to_string(),
        };
        assert!(err.to_string().contains("after 3 attempts"));
        assert!(err.to_string().contains("connection reset"));
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_query_error_is_not_unavailable() {
        let err = DiscoveryError::Query("bad syntax".to_string());
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_no_runtime_error() {
        let err = DiscoveryError::NoRuntime("filter session".to_string());
        assert!(err.to_string().contains("no Tokio runtime"));
        assert!(!err.is_unavailable());
    }

    // ============================================================================
    // From implementations tests
    // ============================================================================

    #[test]
    fn test_from_string() {
        let err: DiscoveryError = "something odd".to_string().into();
        assert!(matches!(err, DiscoveryError::Other(_)));
    }

    #[test]
    fn test_from_url_error() {
        let parse_err = url::Url::parse("not a url").unwrap_err();
        let err: DiscoveryError = parse_err.into();
        assert!(matches!(err, DiscoveryError::InvalidUrl(_)));
    }
}
