//! Synchronous field validation rules
//!
//! Every shape rule treats an empty value as valid; whether a field may be
//! empty at all is `required`'s job alone.

use crate::errors::{ErrorSet, ValidationError};
use chrono::{Datelike, Local, NaiveDate};

/// Control letters for the Spanish NIF checksum, indexed by `number % 23`.
const NIF_LETTERS: &str = "TRWAGMYFPDXBNJZSQVHLCKE";

/// Special characters accepted by the password strength rule.
const PASSWORD_SPECIALS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Fires `required` when the value is empty or whitespace-only.
pub fn required(value: &str) -> ErrorSet {
    if value.trim().is_empty() {
        ErrorSet::single(ValidationError::Required)
    } else {
        ErrorSet::new()
    }
}

/// Fires `minlength` when a non-empty value is shorter than `required_length`.
pub fn min_length(required_length: usize) -> impl Fn(&str) -> ErrorSet {
    move |value| {
        if !value.is_empty() && value.chars().count() < required_length {
            ErrorSet::single(ValidationError::MinLength { required_length })
        } else {
            ErrorSet::new()
        }
    }
}

/// Fires `maxlength` when the value is longer than `required_length`.
pub fn max_length(required_length: usize) -> impl Fn(&str) -> ErrorSet {
    move |value| {
        if value.chars().count() > required_length {
            ErrorSet::single(ValidationError::MaxLength { required_length })
        } else {
            ErrorSet::new()
        }
    }
}

/// Fires `email` unless the value looks like `local@domain.tld`.
pub fn email(value: &str) -> ErrorSet {
    if value.is_empty() || is_email(value) {
        ErrorSet::new()
    } else {
        ErrorSet::single(ValidationError::Email)
    }
}

fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let mut labels = domain.split('.');
    let has_dot = domain.contains('.');
    has_dot && labels.all(|label| !label.is_empty())
}

/// Password strength rule.
///
/// Fires `minLength{required: 8, actual}` plus one kind per missing
/// character class; several kinds may fire at once. Empty input is valid.
pub fn password_strength(value: &str) -> ErrorSet {
    if value.is_empty() {
        return ErrorSet::new();
    }

    let mut errors = ErrorSet::new();
    let actual = value.chars().count();
    if actual < 8 {
        errors.insert(ValidationError::PasswordMinLength {
            required: 8,
            actual,
        });
    }
    if !value.chars().any(|c| c.is_ascii_uppercase()) {
        errors.insert(ValidationError::NoUppercase);
    }
    if !value.chars().any(|c| c.is_ascii_lowercase()) {
        errors.insert(ValidationError::NoLowercase);
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        errors.insert(ValidationError::NoNumber);
    }
    if !value.chars().any(|c| PASSWORD_SPECIALS.contains(c)) {
        errors.insert(ValidationError::NoSpecial);
    }
    errors
}

/// Spanish NIF checksum rule: 8 digits plus a control letter.
///
/// The value is upper-cased and trimmed before checking. A format failure
/// and a wrong control letter both fire `invalidNif`, with distinct
/// messages.
pub fn nif(value: &str) -> ErrorSet {
    let value = value.trim().to_uppercase();
    if value.is_empty() {
        return ErrorSet::new();
    }

    let well_formed = value.is_ascii()
        && value.len() == 9
        && value[..8].bytes().all(|b| b.is_ascii_digit())
        && value.as_bytes()[8].is_ascii_uppercase();
    if !well_formed {
        return ErrorSet::single(ValidationError::InvalidNif {
            message: "Formato incorrecto: 8 dígitos + 1 letra (ej: 12345678Z)".into(),
        });
    }

    // The slice is all ASCII digits, so the parse cannot fail.
    let number: u32 = value[..8].parse().unwrap_or(0);
    let provided = value.as_bytes()[8] as char;
    let expected = NIF_LETTERS
        .chars()
        .nth((number % 23) as usize)
        .unwrap_or('T');

    if provided != expected {
        ErrorSet::single(ValidationError::InvalidNif {
            message: format!(
                "Letra incorrecta. Para {} debería ser \"{}\"",
                &value[..8],
                expected
            ),
        })
    } else {
        ErrorSet::new()
    }
}

/// Spanish mobile phone rule: 9 digits starting with 6 or 7.
///
/// Whitespace is stripped before checking.
pub fn telefono(value: &str) -> ErrorSet {
    if value.is_empty() {
        return ErrorSet::new();
    }

    let clean: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    let valid = clean.len() == 9
        && clean.starts_with(['6', '7'])
        && clean.bytes().all(|b| b.is_ascii_digit());

    if valid {
        ErrorSet::new()
    } else {
        ErrorSet::single(ValidationError::InvalidTelefono {
            message: "Debe empezar por 6 o 7 y tener 9 dígitos".into(),
        })
    }
}

/// Spanish postal code rule: 5 digits with a province prefix in 01-52.
pub fn codigo_postal(value: &str) -> ErrorSet {
    if value.is_empty() {
        return ErrorSet::new();
    }

    if value.len() != 5 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return ErrorSet::single(ValidationError::InvalidCp {
            message: "Debe tener 5 dígitos".into(),
        });
    }

    let provincia: u32 = value[..2].parse().unwrap_or(0);
    if !(1..=52).contains(&provincia) {
        ErrorSet::single(ValidationError::InvalidCp {
            message: "Provincia inválida (01-52)".into(),
        })
    } else {
        ErrorSet::new()
    }
}

/// Fires `minAge` when an ISO `YYYY-MM-DD` birth date yields an age below
/// the minimum. An unparseable or empty value is left to other rules.
pub fn min_age(required: u32) -> impl Fn(&str) -> ErrorSet {
    move |value| {
        if value.is_empty() {
            return ErrorSet::new();
        }
        let Ok(birth) = NaiveDate::parse_from_str(value, "%Y-%m-%d") else {
            return ErrorSet::new();
        };

        let today = Local::now().date_naive();
        let mut age = today.year() - birth.year();
        if (today.month(), today.day()) < (birth.month(), birth.day()) {
            age -= 1;
        }

        if age < required as i32 {
            ErrorSet::single(ValidationError::MinAge {
                required,
                actual: age,
            })
        } else {
            ErrorSet::new()
        }
    }
}
