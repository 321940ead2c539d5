// crates/folio-discovery/src/config/file.rs
// File-based configuration from ./folio.toml or ~/.folio/config.toml

use super::FolioConfig;
use crate::error::{DiscoveryError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Project-local config file name
pub const LOCAL_CONFIG_FILE: &str = "folio.toml";

impl FolioConfig {
    /// Load config from the first file found, then apply environment overrides
    pub fn load() -> Self {
        let mut config = Self::candidate_paths()
            .into_iter()
            .find(|path| path.is_file())
            .map(|path| match Self::load_from(&path) {
                Ok(config) => config,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to parse config file");
                    Self::default()
                }
            })
            .unwrap_or_else(|| {
                debug!("No config file found, using defaults");
                Self::default()
            });

        config.apply_env_overrides(|name| std::env::var(name).ok());
        config
    }

    /// Load config from an explicit TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        debug!(path = %path.display(), "Loaded config from file");
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| DiscoveryError::Config(e.to_string()))
    }

    /// Search order: working directory first, then the per-user file
    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".folio").join("config.toml"));
        }
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_config() {
        let toml = r#"
[filter]
url_debounce_ms = 250

[search]
max_results = 5
attempt_timeout_ms = 8000
"#;
        let config = FolioConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.filter.url_debounce_ms, 250);
        assert_eq!(config.search.max_results, 5);
        assert_eq!(config.search.attempt_timeout_ms, Some(8000));
        // Unset keys keep their defaults
        assert_eq!(config.search.load_attempts, 3);
    }

    #[test]
    fn test_parse_empty_config() {
        let config = FolioConfig::from_toml_str("").unwrap();
        assert_eq!(config, FolioConfig::default());
    }

    #[test]
    fn test_parse_invalid_config() {
        let err = FolioConfig::from_toml_str("[search]\nmax_results = \"many\"").unwrap_err();
        assert!(matches!(err, DiscoveryError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[search]\nload_attempts = 5").unwrap();

        let config = FolioConfig::load_from(file.path()).unwrap();
        assert_eq!(config.search.load_attempts, 5);
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = FolioConfig::load_from(Path::new("/nonexistent/folio.toml")).unwrap_err();
        assert!(matches!(err, DiscoveryError::Io(_)));
    }
}
