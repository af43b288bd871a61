//! Validation rules module

pub mod cross;
pub mod sync;

use crate::errors::ErrorSet;

/// A composed list of synchronous field rules.
///
/// Rules are pure functions from a value to an `ErrorSet`; evaluation runs
/// every rule and unions the results, so rule order never changes the
/// outcome.
#[derive(Default)]
pub struct RuleSet {
    rules: Vec<Box<dyn Fn(&str) -> ErrorSet + Send + Sync>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule, builder-style.
    pub fn with(mut self, rule: impl Fn(&str) -> ErrorSet + Send + Sync + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Run every rule against the value and union the fired errors.
    pub fn evaluate(&self, value: &str) -> ErrorSet {
        let mut errors = ErrorSet::new();
        for rule in &self.rules {
            errors.merge(rule(value));
        }
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSet")
            .field("rules", &self.rules.len())
            .finish()
    }
}

/// Read access to named sibling fields, used by cross-field rules.
///
/// Names are the record's published field identifiers (`password`,
/// `telefonoPrincipal`, ...), not struct member names.
pub trait FieldLookup {
    fn field_value(&self, name: &str) -> Option<&str>;
}

/// A composed list of cross-field rules attached to an enclosing record.
#[derive(Default)]
pub struct CrossRuleSet {
    rules: Vec<Box<dyn Fn(&dyn FieldLookup) -> ErrorSet + Send + Sync>>,
}

impl CrossRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        rule: impl Fn(&dyn FieldLookup) -> ErrorSet + Send + Sync + 'static,
    ) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Run every rule against the record and union the fired errors.
    pub fn evaluate(&self, record: &dyn FieldLookup) -> ErrorSet {
        let mut errors = ErrorSet::new();
        for rule in &self.rules {
            errors.merge(rule(record));
        }
        errors
    }
}

impl std::fmt::Debug for CrossRuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossRuleSet")
            .field("rules", &self.rules.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ErrorKind, ValidationError};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rule_set_unions_all_outputs() {
        let rules = RuleSet::new()
            .with(sync::required)
            .with(sync::min_length(2));
        let errors = rules.evaluate("");
        // min_length is empty-exempt, required fires
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(ErrorKind::Required));
    }

    #[test]
    fn test_rule_order_does_not_change_union() {
        let forward = RuleSet::new()
            .with(sync::required)
            .with(sync::telefono)
            .evaluate("12");
        let reverse = RuleSet::new()
            .with(sync::telefono)
            .with(sync::required)
            .evaluate("12");
        assert_eq!(forward, reverse);
    }

    #[test]
    fn test_empty_rule_set_is_always_valid() {
        assert!(RuleSet::new().evaluate("anything").is_empty());
    }

    struct TwoFields;

    impl FieldLookup for TwoFields {
        fn field_value(&self, name: &str) -> Option<&str> {
            match name {
                "a" => Some("x"),
                "b" => Some(""),
                _ => None,
            }
        }
    }

    #[test]
    fn test_cross_rule_set_evaluates_against_record() {
        let rules = CrossRuleSet::new().with(|record: &dyn FieldLookup| {
            if record.field_value("b").is_some_and(str::is_empty) {
                ErrorSet::single(ValidationError::Required)
            } else {
                ErrorSet::new()
            }
        });
        assert!(rules.evaluate(&TwoFields).contains(ErrorKind::Required));
    }
}
