//! Cross-field validation rules
//!
//! These attach to the enclosing record and re-run whenever any
//! participating field changes; their errors belong to the record, not to
//! either participant field.

use super::FieldLookup;
use crate::errors::{ErrorSet, ValidationError};
use chrono::NaiveDate;

/// Fires `passwordMismatch` when the confirmation field is non-empty and
/// differs from the password field. An empty confirmation is exempt; its
/// own `required` rule covers that case.
pub fn password_match(
    password_field: &'static str,
    confirm_field: &'static str,
) -> impl Fn(&dyn FieldLookup) -> ErrorSet {
    move |record| {
        let password = record.field_value(password_field);
        let confirm = record.field_value(confirm_field);
        match (password, confirm) {
            (Some(password), Some(confirm)) if !confirm.is_empty() && password != confirm => {
                ErrorSet::single(ValidationError::PasswordMismatch)
            }
            _ => ErrorSet::new(),
        }
    }
}

/// Fires `atLeastOneRequired{fields}` when every named field is empty or
/// whitespace-only.
pub fn at_least_one_required(
    fields: &'static [&'static str],
) -> impl Fn(&dyn FieldLookup) -> ErrorSet {
    move |record| {
        let has_one = fields.iter().any(|name| {
            record
                .field_value(name)
                .is_some_and(|value| !value.trim().is_empty())
        });
        if has_one {
            ErrorSet::new()
        } else {
            ErrorSet::single(ValidationError::AtLeastOneRequired {
                fields: fields.iter().map(|f| (*f).to_string()).collect(),
            })
        }
    }
}

/// Fires `invalidDateRange` unless the end date is strictly after the
/// start date. Either field empty or unparseable defers to field rules.
pub fn date_range(
    start_field: &'static str,
    end_field: &'static str,
) -> impl Fn(&dyn FieldLookup) -> ErrorSet {
    move |record| {
        let parse = |name: &str| {
            record
                .field_value(name)
                .and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
        };
        match (parse(start_field), parse(end_field)) {
            (Some(start), Some(end)) if end <= start => {
                ErrorSet::single(ValidationError::InvalidDateRange)
            }
            _ => ErrorSet::new(),
        }
    }
}
