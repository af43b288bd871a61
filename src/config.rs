//! Configuration for the validation pipeline

use crate::checks::UniqueField;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunable knobs for the registration form engine.
///
/// Defaults match the production values; deserializing a partial document
/// fills the rest from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Debounce window for email uniqueness checks, in milliseconds.
    pub email_debounce_ms: u64,
    /// Debounce window for username uniqueness checks, in milliseconds.
    pub username_debounce_ms: u64,
    /// Debounce window for NIF uniqueness checks, in milliseconds.
    pub nif_debounce_ms: u64,
    /// Maximum number of additional phone entries.
    pub max_telefonos_adicionales: usize,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            email_debounce_ms: 800,
            username_debounce_ms: 600,
            nif_debounce_ms: 500,
            max_telefonos_adicionales: 3,
        }
    }
}

impl FormConfig {
    /// Debounce window for the given uniqueness-checked field.
    pub fn debounce(&self, field: UniqueField) -> Duration {
        let ms = match field {
            UniqueField::Email => self.email_debounce_ms,
            UniqueField::Username => self.username_debounce_ms,
            UniqueField::Nif => self.nif_debounce_ms,
        };
        Duration::from_millis(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_debounce_windows() {
        let config = FormConfig::default();
        assert_eq!(config.debounce(UniqueField::Email), Duration::from_millis(800));
        assert_eq!(
            config.debounce(UniqueField::Username),
            Duration::from_millis(600)
        );
        assert_eq!(config.debounce(UniqueField::Nif), Duration::from_millis(500));
        assert_eq!(config.max_telefonos_adicionales, 3);
    }

    #[test]
    fn test_partial_document_falls_back_to_defaults() {
        let config: FormConfig = serde_json::from_str(r#"{"email_debounce_ms": 100}"#).unwrap();
        assert_eq!(config.email_debounce_ms, 100);
        assert_eq!(config.username_debounce_ms, 600);
        assert_eq!(config.max_telefonos_adicionales, 3);
    }
}
