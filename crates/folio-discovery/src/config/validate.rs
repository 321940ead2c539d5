// crates/folio-discovery/src/config/validate.rs
// Sanity checks on the effective configuration

use super::FolioConfig;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// One problem with one config key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    /// Dotted TOML key, e.g. `search.load_attempts`
    pub key: &'static str,
    pub message: String,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {}", self.severity, self.key, self.message)
    }
}

/// Issues found by `FolioConfig::validate`. Errors make the config unusable
/// for search; warnings are logged and tolerated.
#[derive(Debug, Default)]
pub struct ConfigValidation {
    issues: Vec<ConfigIssue>,
}

impl ConfigValidation {
    fn push(&mut self, severity: Severity, key: &'static str, message: impl Into<String>) {
        self.issues.push(ConfigIssue {
            severity,
            key,
            message: message.into(),
        });
    }

    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn issues(&self) -> &[ConfigIssue] {
        &self.issues
    }

    pub fn errors(&self) -> impl Iterator<Item = &ConfigIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ConfigIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    /// One issue per line, errors first; "no issues" when clean
    pub fn report(&self) -> String {
        if self.issues.is_empty() {
            return "folio config: no issues".to_string();
        }
        let mut sorted: Vec<&ConfigIssue> = self.issues.iter().collect();
        sorted.sort_by_key(|issue| (issue.severity, issue.key));
        sorted
            .iter()
            .map(|issue| issue.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl FolioConfig {
    /// Check the effective configuration for values that cannot work
    pub fn validate(&self) -> ConfigValidation {
        let mut validation = ConfigValidation::default();

        if self.search.load_attempts == 0 {
            validation.push(Severity::Error, "search.load_attempts", "must be at least 1");
        }
        if self.search.max_results == 0 {
            validation.push(Severity::Error, "search.max_results", "must be at least 1");
        }
        if self.search.attempt_timeout_ms == Some(0) {
            validation.push(Severity::Error, "search.attempt_timeout_ms", "must be positive when set");
        }
        if self.filter.url_debounce_ms == 0 {
            validation.push(
                Severity::Warning,
                "filter.url_debounce_ms",
                "is 0; every toggle rewrites the URL",
            );
        }

        validation
    }
}
