//! Configuration types for a validation run.
//!
//! Everything here deserializes from the JSON/YAML configuration surface
//! (camelCase keys). The engine never looks inside a check's `settings`.

use std::path::PathBuf;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigurationError;

/// Default include pattern for `Matching` mode: markdown files only.
pub const DEFAULT_INCLUDE_PATTERN: &str = r"\.md$";

/// Default remote fetched in `Changed` mode.
pub const DEFAULT_REMOTE: &str = "origin";

/// Default branch diffed against in `Changed` mode.
pub const DEFAULT_BRANCH: &str = "main";

/// How the set of files to validate is determined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Mode {
    /// Walk the base directory and keep files matching the include/exclude filters.
    #[default]
    Matching,
    /// Validate only files changed relative to a branch.
    Changed,
}

/// File filters plus the `Changed`-mode VCS options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct ModeConfig {
    /// Regex a path must match to be validated. Defaults to
    /// [`DEFAULT_INCLUDE_PATTERN`].
    #[serde(default, alias = "includes", skip_serializing_if = "Option::is_none")]
    pub include_pattern: Option<String>,
    /// Regex that removes a path from validation.
    #[serde(default, alias = "excludes", skip_serializing_if = "Option::is_none")]
    pub exclude_pattern: Option<String>,
    /// Branch to diff against (`Changed` mode only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Remote to fetch from (`Changed` mode only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
}

impl ModeConfig {
    #[must_use]
    pub fn branch(&self) -> &str {
        self.branch.as_deref().unwrap_or(DEFAULT_BRANCH)
    }

    #[must_use]
    pub fn remote(&self) -> &str {
        self.remote.as_deref().unwrap_or(DEFAULT_REMOTE)
    }

    /// Compile the file filter, applying the default include pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidPattern`] if either pattern is not
    /// a valid regular expression.
    pub fn file_filter(&self) -> Result<PathFilter, ConfigurationError> {
        let include = self
            .include_pattern
            .as_deref()
            .unwrap_or(DEFAULT_INCLUDE_PATTERN);
        PathFilter::new(Some(include), self.exclude_pattern.as_deref())
    }
}

/// One configured check: the rule to run and where to run it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct RuleConfig {
    /// Registered rule name.
    pub name: String,
    /// Only documents whose path matches this regex are checked.
    #[serde(default, alias = "includes", skip_serializing_if = "Option::is_none")]
    pub include_pattern: Option<String>,
    /// Documents whose path matches this regex are skipped.
    #[serde(default, alias = "excludes", skip_serializing_if = "Option::is_none")]
    pub exclude_pattern: Option<String>,
    /// Rule-owned settings, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
}

impl RuleConfig {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: Value) -> Self {
        self.settings = Some(settings);
        self
    }

    #[must_use]
    pub fn with_include(mut self, pattern: impl Into<String>) -> Self {
        self.include_pattern = Some(pattern.into());
        self
    }

    #[must_use]
    pub fn with_exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_pattern = Some(pattern.into());
        self
    }
}

/// Full configuration of a validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct ValidationConfig {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub mode_config: ModeConfig,
    /// Directory (or single file) to validate.
    #[serde(default = "default_base_directory")]
    pub base_directory: PathBuf,
    /// Checks to run against every document, in order.
    #[serde(default)]
    pub checks: Vec<RuleConfig>,
}

fn default_base_directory() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            mode_config: ModeConfig::default(),
            base_directory: default_base_directory(),
            checks: Vec::new(),
        }
    }
}

impl ValidationConfig {
    #[must_use]
    pub fn new(base_directory: impl Into<PathBuf>, checks: Vec<RuleConfig>) -> Self {
        Self {
            base_directory: base_directory.into(),
            checks,
            ..Self::default()
        }
    }
}

/// Compiled include/exclude regex pair, tested against the path string.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    include: Option<Regex>,
    exclude: Option<Regex>,
}

impl PathFilter {
    /// Compile a filter. `None` means "no constraint" on that side.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidPattern`] for an invalid regex.
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> Result<Self, ConfigurationError> {
        Ok(Self {
            include: include.map(|p| compile_pattern("include", p)).transpose()?,
            exclude: exclude.map(|p| compile_pattern("exclude", p)).transpose()?,
        })
    }

    /// A path is included when it matches `include` (if set) and does not
    /// match `exclude` (if set). Matching is a search anywhere in the path.
    #[must_use]
    pub fn is_included(&self, path: &str) -> bool {
        if let Some(include) = &self.include
            && !include.is_match(path)
        {
            return false;
        }
        if let Some(exclude) = &self.exclude
            && exclude.is_match(path)
        {
            return false;
        }
        true
    }
}

fn compile_pattern(field: &'static str, pattern: &str) -> Result<Regex, ConfigurationError> {
    Regex::new(pattern).map_err(|source| ConfigurationError::InvalidPattern {
        field,
        pattern: pattern.to_owned(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_full_config() {
        let config: ValidationConfig = serde_json::from_value(json!({
            "mode": "Changed",
            "modeConfig": { "includePattern": "docs/", "branch": "develop" },
            "baseDirectory": "site",
            "checks": [
                { "name": "WriteGood" },
                {
                    "name": "RequiredProperties",
                    "excludePattern": "drafts/",
                    "settings": { "properties": ["title"] }
                }
            ]
        }))
        .unwrap();

        assert_eq!(config.mode, Mode::Changed);
        assert_eq!(config.mode_config.include_pattern.as_deref(), Some("docs/"));
        assert_eq!(config.mode_config.branch(), "develop");
        assert_eq!(config.mode_config.remote(), DEFAULT_REMOTE);
        assert_eq!(config.base_directory, PathBuf::from("site"));
        assert_eq!(config.checks.len(), 2);
        assert_eq!(config.checks[1].exclude_pattern.as_deref(), Some("drafts/"));
        assert_eq!(config.checks[1].settings, Some(json!({ "properties": ["title"] })));
    }

    #[test]
    fn test_defaults_and_aliases() {
        let config: ValidationConfig = serde_json::from_value(json!({
            "modeConfig": { "includes": ".*\\.txt", "excludes": "skip" },
            "checks": [{ "name": "Spelling", "includes": "a" }]
        }))
        .unwrap();
        assert_eq!(config.mode, Mode::Matching);
        assert_eq!(config.base_directory, PathBuf::from("."));
        assert_eq!(config.mode_config.include_pattern.as_deref(), Some(".*\\.txt"));
        assert_eq!(config.mode_config.exclude_pattern.as_deref(), Some("skip"));
        assert_eq!(config.checks[0].include_pattern.as_deref(), Some("a"));
        assert_eq!(config.mode_config.branch(), DEFAULT_BRANCH);
    }

    #[test]
    fn test_default_filter_is_markdown_only() {
        let filter = ModeConfig::default().file_filter().unwrap();
        assert!(filter.is_included("docs/readme.md"));
        assert!(!filter.is_included("docs/readme.txt"));
        assert!(!filter.is_included("docs/readme.md.bak"));
    }

    #[test]
    fn test_filter_include_and_exclude() {
        let filter = PathFilter::new(Some("x"), Some("draft")).unwrap();
        assert!(filter.is_included("docs/x.md"));
        assert!(!filter.is_included("docs/y.md"));
        assert!(!filter.is_included("docs/x-draft.md"));
        assert!(PathFilter::default().is_included("anything"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = PathFilter::new(Some("("), None).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::InvalidPattern { field: "include", .. }
        ));
    }
}
