//! Per-field value and validity state

use crate::errors::{ErrorKind, ErrorSet};
use crate::rules::RuleSet;

/// A single form field: its value, fired errors, and interaction flags.
///
/// Synchronous rules re-run on every value change. Errors from async
/// uniqueness checks are inserted and cleared by the controller and are
/// dropped whenever the value changes, since they describe a stale value.
#[derive(Debug)]
pub struct FieldState {
    value: String,
    pub errors: ErrorSet,
    pub touched: bool,
    pub dirty: bool,
    pub pending_async: bool,
    rules: RuleSet,
}

impl FieldState {
    /// Create a field with its rules and evaluate them against the empty
    /// initial value, so required-ness is visible from the start.
    pub fn new(rules: RuleSet) -> Self {
        let errors = rules.evaluate("");
        Self {
            value: String::new(),
            errors,
            touched: false,
            dirty: false,
            pending_async: false,
            rules,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the value, mark the field dirty, and re-run sync rules.
    pub fn set_value(&mut self, value: &str) {
        self.value.clear();
        self.value.push_str(value);
        self.dirty = true;
        self.errors = self.rules.evaluate(&self.value);
    }

    pub fn touch(&mut self) {
        self.touched = true;
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_error(&self, kind: ErrorKind) -> bool {
        self.errors.contains(kind)
    }

    /// Clear the value and all flags; rules re-evaluate the empty value.
    pub fn reset(&mut self) {
        self.value.clear();
        self.touched = false;
        self.dirty = false;
        self.pending_async = false;
        self.errors = self.rules.evaluate("");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::sync;
    use pretty_assertions::assert_eq;

    fn required_field() -> FieldState {
        FieldState::new(RuleSet::new().with(sync::required).with(sync::min_length(2)))
    }

    #[test]
    fn test_new_field_evaluates_initial_value() {
        let field = required_field();
        assert!(field.has_error(ErrorKind::Required));
        assert!(!field.touched);
        assert!(!field.dirty);
        assert!(!field.pending_async);
    }

    #[test]
    fn test_set_value_marks_dirty_and_revalidates() {
        let mut field = required_field();
        field.set_value("a");
        assert!(field.dirty);
        assert!(!field.has_error(ErrorKind::Required));
        assert!(field.has_error(ErrorKind::MinLength));

        field.set_value("ana");
        assert!(field.is_valid());
    }

    #[test]
    fn test_set_value_drops_async_errors_for_stale_value() {
        let mut field = FieldState::new(RuleSet::new());
        field
            .errors
            .insert(crate::errors::ValidationError::EmailTaken);
        field.set_value("fresh@example.com");
        assert!(!field.has_error(ErrorKind::EmailTaken));
    }

    #[test]
    fn test_touch_only_sets_flag() {
        let mut field = required_field();
        field.touch();
        assert!(field.touched);
        assert!(!field.dirty);
        assert_eq!(field.value(), "");
    }

    #[test]
    fn test_reset_restores_pristine_state() {
        let mut field = required_field();
        field.set_value("ana");
        field.touch();
        field.pending_async = true;

        field.reset();
        assert_eq!(field.value(), "");
        assert!(!field.touched);
        assert!(!field.dirty);
        assert!(!field.pending_async);
        assert!(field.has_error(ErrorKind::Required));
    }
}
