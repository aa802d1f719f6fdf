//! Orchestration entry point.

use std::path::Path;

use crate::config::ValidationConfig;
use crate::dispatch::RuleDispatcher;
use crate::document;
use crate::error::ConfigurationError;
use crate::registry::RuleRegistry;
use crate::report::{FileResult, ValidationReport};
use crate::rule::Rule;
use crate::scope;
use crate::vcs::{GitCli, Vcs};

/// Runs configured checks over a document corpus.
///
/// Owns its [`RuleRegistry`]; add or remove rules between runs only.
#[derive(Debug)]
pub struct Validator {
    registry: RuleRegistry,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// A validator with every built-in rule registered.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(RuleRegistry::with_builtins())
    }

    #[must_use]
    pub fn with_registry(registry: RuleRegistry) -> Self {
        Self { registry }
    }

    #[must_use]
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut RuleRegistry {
        &mut self.registry
    }

    /// Make `rule` available under its name, replacing any rule with that name.
    pub fn add_rule(&mut self, rule: Box<dyn Rule>) {
        self.registry.register(rule);
    }

    /// Remove the rule registered under `name`.
    pub fn remove_rule(&mut self, name: &str) -> Option<Box<dyn Rule>> {
        self.registry.unregister(name)
    }

    /// Validate using `git` in the base directory for `Changed` mode.
    ///
    /// # Errors
    ///
    /// See [`Validator::validate_with_vcs`].
    pub fn validate(
        &self,
        config: &ValidationConfig,
    ) -> Result<ValidationReport, ConfigurationError> {
        let vcs = GitCli::new(vcs_work_dir(&config.base_directory));
        self.validate_with_vcs(config, &vcs)
    }

    /// Validate every file in scope against the configured checks.
    ///
    /// Configuration problems abort the run before any file is read.
    /// Unreadable files and failing rules are recorded in the report.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the base directory is missing,
    /// no checks are configured, a check names an unknown rule, a pattern
    /// does not compile, or changed files cannot be determined.
    pub fn validate_with_vcs(
        &self,
        config: &ValidationConfig,
        vcs: &dyn Vcs,
    ) -> Result<ValidationReport, ConfigurationError> {
        let base = &config.base_directory;
        if !base.exists() {
            return Err(ConfigurationError::MissingBase(base.clone()));
        }
        let dispatcher = RuleDispatcher::prepare(&self.registry, &config.checks)?;
        let files = scope::resolve(base, config.mode, &config.mode_config, vcs)?;

        tracing::debug!(count = files.len(), "reading files");
        let mut report = ValidationReport::new(files.len());
        for path in &files {
            tracing::debug!(file = %path.display(), "reading file");
            let document = match document::load(path) {
                Ok(document) => document,
                Err(err) => {
                    tracing::warn!(file = %path.display(), error = %err, "failed to read file");
                    report.push(FileResult::read_failure(path, &err));
                    continue;
                }
            };

            tracing::info!(file = %document.path.display(), "validating");
            let mut file_result = FileResult::new(&document.path);
            file_result.extend(dispatcher.run_all(&document));
            report.push(file_result);
        }

        let summary = report.summary();
        tracing::debug!(
            status = %report.status(),
            failures = summary.failures,
            errors = summary.errors,
            warnings = summary.warnings,
            "validation finished"
        );
        Ok(report)
    }
}

/// Directory `git` runs in: the base itself, or its parent for a single file.
fn vcs_work_dir(base: &Path) -> &Path {
    if base.is_file() {
        base.parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    } else {
        base
    }
}

/// Validate with a fresh [`Validator`] holding the built-in rules.
///
/// # Errors
///
/// See [`Validator::validate_with_vcs`].
pub fn validate(config: &ValidationConfig) -> Result<ValidationReport, ConfigurationError> {
    Validator::new().validate(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;

    #[test]
    fn test_builtins_registered() {
        let validator = Validator::new();
        assert_eq!(validator.registry().len(), 5);
        assert!(validator.registry().contains("RequiredProperties"));
    }

    #[test]
    fn test_missing_base_checked_first() {
        let config = ValidationConfig::new("/definitely/not/here", Vec::new());
        let err = Validator::new().validate(&config).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingBase(_)));
    }

    #[test]
    fn test_vcs_work_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("a.md");
        std::fs::write(&file, "Body").unwrap();
        assert_eq!(vcs_work_dir(dir.path()), dir.path());
        assert_eq!(vcs_work_dir(&file), dir.path());
    }

    #[test]
    fn test_no_checks() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ValidationConfig::new(dir.path(), Vec::new());
        let err = Validator::new().validate(&config).unwrap_err();
        assert_eq!(err.to_string(), "No checks specified");
    }

    #[test]
    fn test_remove_and_add_rule() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut validator = Validator::new();
        let removed = validator.remove_rule("WriteGood").unwrap();
        let config = ValidationConfig::new(dir.path(), vec![RuleConfig::new("WriteGood")]);
        let err = validator.validate(&config).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported check: WriteGood requested");

        validator.add_rule(removed);
        assert!(validator.validate(&config).is_ok());
    }
}
