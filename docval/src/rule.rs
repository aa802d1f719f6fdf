//! The rule contract and the result every rule produces.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::Document;
use crate::error::RuleError;
use crate::severity::Severity;

/// A pluggable check executed against one document.
///
/// `settings` is the rule's own configuration object, passed through by the
/// engine without inspection; an absent object arrives as `{}`. A rule may
/// block on I/O. Any `Err` it returns (or a panic) is isolated by the
/// dispatcher and reported as a `Failure` result for this rule only.
pub trait Rule {
    /// Name the rule is registered and configured under.
    fn name(&self) -> &str;

    /// Check `document` and report a single result.
    ///
    /// # Errors
    ///
    /// Returns an error if the rule cannot complete, e.g. because its settings
    /// are invalid or a resource it depends on is unavailable.
    fn check(&self, document: &Document, settings: &Value) -> Result<RuleResult, RuleError>;
}

/// Outcome of one rule applied to one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct RuleResult {
    pub status: Severity,
    /// Name of the rule that produced the result.
    #[serde(rename = "check")]
    pub rule_name: String,
    #[serde(rename = "file")]
    pub file_path: PathBuf,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl RuleResult {
    /// Create a result. `rule_name` and `file_path` may be left empty; the
    /// dispatcher fills them in.
    #[must_use]
    pub fn new(status: Severity, message: impl Into<String>) -> Self {
        Self {
            status,
            rule_name: String::new(),
            file_path: PathBuf::new(),
            message: message.into(),
            detail: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = Some(detail);
        self
    }

    #[must_use]
    pub fn for_rule(mut self, rule_name: impl Into<String>) -> Self {
        self.rule_name = rule_name.into();
        self
    }

    #[must_use]
    pub fn for_file(mut self, file_path: impl Into<PathBuf>) -> Self {
        self.file_path = file_path.into();
        self
    }
}

/// Deserialize a rule's settings object into its typed form.
///
/// # Errors
///
/// Returns [`RuleError::Settings`] if the object does not match `T`.
pub fn parse_settings<T: DeserializeOwned>(settings: &Value) -> Result<T, RuleError> {
    T::deserialize(settings).map_err(|e| RuleError::Settings(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Limits {
        warn_limit: Option<u32>,
    }

    #[test]
    fn test_serialized_shape() {
        let result = RuleResult::new(Severity::Error, "Missing property: title")
            .for_rule("RequiredProperties")
            .for_file("docs/a.md");
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "status": "Error",
                "check": "RequiredProperties",
                "file": "docs/a.md",
                "message": "Missing property: title"
            })
        );
    }

    #[test]
    fn test_parse_settings() {
        let limits: Limits = parse_settings(&json!({ "warnLimit": 3 })).unwrap();
        assert_eq!(limits.warn_limit, Some(3));
        let empty: Limits = parse_settings(&json!({})).unwrap();
        assert_eq!(empty.warn_limit, None);
        let err = parse_settings::<Limits>(&json!({ "warnLimit": "many" })).unwrap_err();
        assert!(matches!(err, RuleError::Settings(_)));
    }
}
