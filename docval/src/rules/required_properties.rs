//! `RequiredProperties`: front-matter keys that must be present, optionally
//! restricted to a set of allowed values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::Document;
use crate::error::RuleError;
use crate::rule::{Rule, RuleResult, parse_settings};
use crate::severity::{Severity, fold_statuses};

pub const NAME: &str = "RequiredProperties";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredPropertiesSettings {
    pub properties: Vec<PropertySpec>,
}

/// Either a bare property name or a detailed requirement.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PropertySpec {
    Name(String),
    Detailed(RequiredProperty),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredProperty {
    pub property: String,
    #[serde(default)]
    pub allowed_values: Option<Vec<Value>>,
    /// Status reported when the property is missing or invalid. Defaults to `Error`.
    #[serde(default)]
    pub invalid_status: Option<Severity>,
}

impl From<PropertySpec> for RequiredProperty {
    fn from(spec: PropertySpec) -> Self {
        match spec {
            PropertySpec::Name(property) => Self {
                property,
                allowed_values: None,
                invalid_status: None,
            },
            PropertySpec::Detailed(required) => required,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct PropertyResult {
    property: String,
    status: Severity,
    message: String,
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn check_property(properties: &Map<String, Value>, required: &RequiredProperty) -> PropertyResult {
    let invalid_status = required.invalid_status.unwrap_or(Severity::Error);
    let name = &required.property;

    let (status, message) = match properties.get(name) {
        None => (invalid_status, format!("Missing property: {name}")),
        Some(value)
            if required
                .allowed_values
                .as_ref()
                .is_some_and(|allowed| !allowed.contains(value)) =>
        {
            let allowed = Value::from(required.allowed_values.clone().unwrap_or_default());
            (
                invalid_status,
                format!(
                    "Invalid value: {} for: {name}, must be one of: {allowed}",
                    display_value(value)
                ),
            )
        }
        Some(_) => (Severity::Success, format!("Property {name} is valid")),
    };

    PropertyResult {
        property: name.clone(),
        status,
        message,
    }
}

/// Checks that front-matter properties exist and hold allowed values.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequiredProperties;

impl Rule for RequiredProperties {
    fn name(&self) -> &str {
        NAME
    }

    fn check(&self, document: &Document, settings: &Value) -> Result<RuleResult, RuleError> {
        let settings: RequiredPropertiesSettings = parse_settings(settings)?;

        let results: Vec<PropertyResult> = settings
            .properties
            .into_iter()
            .map(|spec| check_property(&document.properties, &spec.into()))
            .collect();
        let status = fold_statuses(results.iter().map(|r| r.status));

        let problems: Vec<&str> = results
            .iter()
            .filter(|r| r.status != Severity::Success)
            .map(|r| r.message.as_str())
            .collect();
        let message = if problems.is_empty() {
            format!("Checked: {} properties, result: {status}", results.len())
        } else {
            problems.join("; ")
        };

        let detail = serde_json::to_value(&results).map_err(|e| RuleError::Other(e.to_string()))?;
        Ok(RuleResult::new(status, message)
            .for_rule(NAME)
            .for_file(&document.path)
            .with_detail(detail))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(properties: Value) -> Document {
        let Value::Object(map) = properties else {
            panic!("properties must be an object");
        };
        Document::from_parts("test".into(), map, "Hello World".to_owned())
    }

    #[test]
    fn test_name() {
        assert_eq!(RequiredProperties.name(), "RequiredProperties");
    }

    #[test]
    fn test_present_property() {
        let result = RequiredProperties
            .check(&doc(json!({ "title": "test" })), &json!({ "properties": ["title"] }))
            .unwrap();
        assert_eq!(result.status, Severity::Success);
        assert_eq!(result.message, "Checked: 1 properties, result: Success");
    }

    #[test]
    fn test_missing_property() {
        let result = RequiredProperties
            .check(&doc(json!({})), &json!({ "properties": ["title"] }))
            .unwrap();
        assert_eq!(result.status, Severity::Error);
        assert_eq!(result.message, "Missing property: title");
        assert_eq!(result.detail.unwrap()[0]["status"], "Error");
    }

    #[test]
    fn test_invalid_status_override() {
        let result = RequiredProperties
            .check(
                &doc(json!({})),
                &json!({ "properties": [{ "property": "test", "invalidStatus": "Warn" }] }),
            )
            .unwrap();
        assert_eq!(result.status, Severity::Warn);
    }

    #[test]
    fn test_allowed_values() {
        let settings = json!({ "properties": [{ "property": "test", "allowedValues": ["value", 1] }] });

        let invalid = RequiredProperties
            .check(&doc(json!({ "test": "something" })), &settings)
            .unwrap();
        assert_eq!(invalid.status, Severity::Error);
        assert_eq!(
            invalid.message,
            "Invalid value: something for: test, must be one of: [\"value\",1]"
        );

        let valid = RequiredProperties
            .check(&doc(json!({ "test": "value" })), &settings)
            .unwrap();
        assert_eq!(valid.status, Severity::Success);
    }

    #[test]
    fn test_first_allowed_value_is_accepted() {
        let settings = json!({ "properties": [{ "property": "layout", "allowedValues": ["default", "post"] }] });
        let first = RequiredProperties
            .check(&doc(json!({ "layout": "default" })), &settings)
            .unwrap();
        assert_eq!(first.status, Severity::Success);
        let second = RequiredProperties
            .check(&doc(json!({ "layout": "post" })), &settings)
            .unwrap();
        assert_eq!(second.status, Severity::Success);
    }

    #[test]
    fn test_mixed_results_fold() {
        let result = RequiredProperties
            .check(
                &doc(json!({ "title": "x" })),
                &json!({ "properties": [
                    "title",
                    { "property": "summary", "invalidStatus": "Warn" },
                    "author"
                ] }),
            )
            .unwrap();
        assert_eq!(result.status, Severity::Error);
        assert_eq!(
            result.message,
            "Missing property: summary; Missing property: author"
        );
    }

    #[test]
    fn test_missing_settings_is_error() {
        let err = RequiredProperties.check(&doc(json!({})), &json!({})).unwrap_err();
        assert!(matches!(err, RuleError::Settings(_)));
    }
}
