//! Name to rule lookup table.

use std::collections::HashMap;
use std::fmt;

use crate::rule::Rule;
use crate::rules;

/// Rules available to a validator, keyed by name.
///
/// Owned by a single validator and mutated only between runs.
#[derive(Default)]
pub struct RuleRegistry {
    rules: HashMap<String, Box<dyn Rule>>,
}

impl RuleRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-seeded with the built-in rules.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for rule in rules::builtin_rules() {
            registry.register(rule);
        }
        registry
    }

    /// Add a rule. A rule with the same name is replaced.
    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.insert(rule.name().to_owned(), rule);
    }

    /// Remove a rule by name, returning it if present.
    pub fn unregister(&mut self, name: &str) -> Option<Box<dyn Rule>> {
        self.rules.remove(name)
    }

    /// Remove whichever rule is registered under `rule`'s name.
    pub fn unregister_rule(&mut self, rule: &dyn Rule) -> Option<Box<dyn Rule>> {
        self.unregister(rule.name())
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&dyn Rule> {
        self.rules.get(name).map(Box::as_ref)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Registered names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.names())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::error::RuleError;
    use crate::rule::RuleResult;
    use crate::severity::Severity;
    use serde_json::Value;

    struct Fixed {
        name: &'static str,
        status: Severity,
    }

    impl Rule for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        fn check(&self, _document: &Document, _settings: &Value) -> Result<RuleResult, RuleError> {
            Ok(RuleResult::new(self.status, "fixed"))
        }
    }

    #[test]
    fn test_builtins_are_registered() {
        let registry = RuleRegistry::with_builtins();
        assert_eq!(
            registry.names(),
            vec!["DateRange", "Readability", "RequiredProperties", "Spelling", "WriteGood"]
        );
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(Fixed { name: "x", status: Severity::Warn }));
        registry.register(Box::new(Fixed { name: "x", status: Severity::Error }));
        assert_eq!(registry.len(), 1);

        let rule = registry.lookup("x").unwrap();
        let result = rule.check(&Document::default(), &Value::Null).unwrap();
        assert_eq!(result.status, Severity::Error);
    }

    #[test]
    fn test_unregister_by_name_and_instance() {
        let mut registry = RuleRegistry::with_builtins();
        assert!(registry.unregister("WriteGood").is_some());
        assert!(!registry.contains("WriteGood"));
        assert!(registry.unregister("WriteGood").is_none());

        let probe = Fixed { name: "Spelling", status: Severity::Success };
        assert!(registry.unregister_rule(&probe).is_some());
        assert!(registry.lookup("Spelling").is_none());
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_empty_registry() {
        let registry = RuleRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.lookup("RequiredProperties").is_none());
    }
}
