//! Rule dispatch: pre-flight resolution of configured checks, then per-file
//! execution with inclusion filtering and fault isolation.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use serde_json::{Map, Value};

use crate::config::{PathFilter, RuleConfig};
use crate::document::Document;
use crate::error::{ConfigurationError, RuleError};
use crate::registry::RuleRegistry;
use crate::rule::{Rule, RuleResult};
use crate::severity::Severity;

/// A configured check whose rule has been resolved and whose filters have
/// been compiled.
struct PreparedCheck<'r> {
    name: &'r str,
    rule: &'r dyn Rule,
    filter: PathFilter,
    settings: Value,
}

/// Runs the configured checks, in declared order, against one document at a
/// time.
pub struct RuleDispatcher<'r> {
    checks: Vec<PreparedCheck<'r>>,
}

impl<'r> RuleDispatcher<'r> {
    /// Resolve every configured check against `registry`.
    ///
    /// Runs before any file is read, so a misconfigured check never produces
    /// partial output.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::NoChecks`] for an empty list,
    /// [`ConfigurationError::UnknownRule`] for a name with no registered rule
    /// and [`ConfigurationError::InvalidPattern`] for a bad include/exclude.
    pub fn prepare(
        registry: &'r RuleRegistry,
        configs: &'r [RuleConfig],
    ) -> Result<Self, ConfigurationError> {
        if configs.is_empty() {
            return Err(ConfigurationError::NoChecks);
        }

        let mut checks = Vec::with_capacity(configs.len());
        for config in configs {
            let rule = registry
                .lookup(&config.name)
                .ok_or_else(|| ConfigurationError::UnknownRule(config.name.clone()))?;
            let filter = PathFilter::new(
                config.include_pattern.as_deref(),
                config.exclude_pattern.as_deref(),
            )?;
            checks.push(PreparedCheck {
                name: &config.name,
                rule,
                filter,
                settings: config
                    .settings
                    .clone()
                    .unwrap_or_else(|| Value::Object(Map::new())),
            });
        }
        Ok(Self { checks })
    }

    /// Run every applicable check against `document`.
    ///
    /// Results follow declared order. Checks whose include/exclude filter
    /// rejects the document's path produce no entry.
    #[must_use]
    pub fn run_all(&self, document: &Document) -> Vec<RuleResult> {
        let path = document.path.to_string_lossy();
        let mut results = Vec::with_capacity(self.checks.len());
        for check in &self.checks {
            if !check.filter.is_included(&path) {
                tracing::info!(check = check.name, file = %path, "skipping check");
                continue;
            }
            results.push(run_check(check, document));
        }
        results
    }
}

fn run_check(check: &PreparedCheck<'_>, document: &Document) -> RuleResult {
    tracing::info!(check = check.name, "running check");

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        check.rule.check(document, &check.settings)
    }))
    .unwrap_or_else(|payload| Err(RuleError::Other(panic_message(payload.as_ref()))));

    match outcome {
        Ok(mut result) => {
            if result.rule_name.is_empty() {
                check.name.clone_into(&mut result.rule_name);
            }
            if result.file_path.as_os_str().is_empty() {
                result.file_path.clone_from(&document.path);
            }
            tracing::info!(check = check.name, status = %result.status, message = %result.message, "check result");
            result
        }
        Err(err) => {
            let message = format!("Failed to execute check [{}], message: {err}", check.name);
            tracing::warn!(check = check.name, file = %document.path.display(), error = %err, "{message}");
            RuleResult::new(Severity::Failure, message)
                .for_rule(check.name)
                .for_file(&document.path)
                .with_detail(err.to_detail())
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "rule panicked".to_owned()
    }
}
