//! Validation error kinds and error-set composition

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Tag identifying a validation error kind.
///
/// Serialized identifiers match the keys the client template looks up,
/// e.g. `minlength`, `invalidCP`, `emailTaken`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ErrorKind {
    #[serde(rename = "required")]
    Required,
    #[serde(rename = "minlength")]
    MinLength,
    #[serde(rename = "maxlength")]
    MaxLength,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "minLength")]
    PasswordMinLength,
    #[serde(rename = "noUppercase")]
    NoUppercase,
    #[serde(rename = "noLowercase")]
    NoLowercase,
    #[serde(rename = "noNumber")]
    NoNumber,
    #[serde(rename = "noSpecial")]
    NoSpecial,
    #[serde(rename = "invalidNif")]
    InvalidNif,
    #[serde(rename = "invalidTelefono")]
    InvalidTelefono,
    #[serde(rename = "invalidCP")]
    InvalidCp,
    #[serde(rename = "passwordMismatch")]
    PasswordMismatch,
    #[serde(rename = "atLeastOneRequired")]
    AtLeastOneRequired,
    #[serde(rename = "emailTaken")]
    EmailTaken,
    #[serde(rename = "usernameTaken")]
    UsernameTaken,
    #[serde(rename = "nifTaken")]
    NifTaken,
    #[serde(rename = "minAge")]
    MinAge,
    #[serde(rename = "invalidDateRange")]
    InvalidDateRange,
}

impl ErrorKind {
    /// The identifier the presentation layer keys error messages on.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::MinLength => "minlength",
            Self::MaxLength => "maxlength",
            Self::Email => "email",
            Self::PasswordMinLength => "minLength",
            Self::NoUppercase => "noUppercase",
            Self::NoLowercase => "noLowercase",
            Self::NoNumber => "noNumber",
            Self::NoSpecial => "noSpecial",
            Self::InvalidNif => "invalidNif",
            Self::InvalidTelefono => "invalidTelefono",
            Self::InvalidCp => "invalidCP",
            Self::PasswordMismatch => "passwordMismatch",
            Self::AtLeastOneRequired => "atLeastOneRequired",
            Self::EmailTaken => "emailTaken",
            Self::UsernameTaken => "usernameTaken",
            Self::NifTaken => "nifTaken",
            Self::MinAge => "minAge",
            Self::InvalidDateRange => "invalidDateRange",
        }
    }
}

/// A single fired validation error with its structured payload.
///
/// `Display` renders the user-facing message the register form shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Este campo es obligatorio")]
    Required,
    #[error("Mínimo {required_length} caracteres")]
    MinLength { required_length: usize },
    #[error("Máximo {required_length} caracteres")]
    MaxLength { required_length: usize },
    #[error("Formato de email inválido")]
    Email,
    #[error("Mínimo {required} caracteres")]
    PasswordMinLength { required: usize, actual: usize },
    #[error("Debe contener al menos una mayúscula")]
    NoUppercase,
    #[error("Debe contener al menos una minúscula")]
    NoLowercase,
    #[error("Debe contener al menos un número")]
    NoNumber,
    #[error("Debe contener al menos un carácter especial (!@#$%...)")]
    NoSpecial,
    #[error("{message}")]
    InvalidNif { message: String },
    #[error("{message}")]
    InvalidTelefono { message: String },
    #[error("{message}")]
    InvalidCp { message: String },
    #[error("Las contraseñas no coinciden")]
    PasswordMismatch,
    #[error("Debe indicar al menos uno de los campos: {}", fields.join(", "))]
    AtLeastOneRequired { fields: Vec<String> },
    #[error("Este email ya está registrado")]
    EmailTaken,
    #[error("Este nombre de usuario no está disponible")]
    UsernameTaken,
    #[error("Este NIF ya está registrado")]
    NifTaken,
    #[error("Debe tener al menos {required} años")]
    MinAge { required: u32, actual: i32 },
    #[error("La fecha de fin debe ser posterior a la de inicio")]
    InvalidDateRange,
}

impl ValidationError {
    /// The kind tag for this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Required => ErrorKind::Required,
            Self::MinLength { .. } => ErrorKind::MinLength,
            Self::MaxLength { .. } => ErrorKind::MaxLength,
            Self::Email => ErrorKind::Email,
            Self::PasswordMinLength { .. } => ErrorKind::PasswordMinLength,
            Self::NoUppercase => ErrorKind::NoUppercase,
            Self::NoLowercase => ErrorKind::NoLowercase,
            Self::NoNumber => ErrorKind::NoNumber,
            Self::NoSpecial => ErrorKind::NoSpecial,
            Self::InvalidNif { .. } => ErrorKind::InvalidNif,
            Self::InvalidTelefono { .. } => ErrorKind::InvalidTelefono,
            Self::InvalidCp { .. } => ErrorKind::InvalidCp,
            Self::PasswordMismatch => ErrorKind::PasswordMismatch,
            Self::AtLeastOneRequired { .. } => ErrorKind::AtLeastOneRequired,
            Self::EmailTaken => ErrorKind::EmailTaken,
            Self::UsernameTaken => ErrorKind::UsernameTaken,
            Self::NifTaken => ErrorKind::NifTaken,
            Self::MinAge { .. } => ErrorKind::MinAge,
            Self::InvalidDateRange => ErrorKind::InvalidDateRange,
        }
    }
}

/// The set of validation errors currently attached to a field or record.
///
/// Keyed by kind; an empty set means valid. Merging is a union where a
/// later entry for the same kind replaces the earlier one (payloads for a
/// given kind come from a single rule, so nothing is lost).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorSet {
    entries: BTreeMap<ErrorKind, ValidationError>,
}

impl ErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a single error.
    pub fn single(error: ValidationError) -> Self {
        let mut set = Self::new();
        set.insert(error);
        set
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Insert an error, replacing any previous entry of the same kind.
    pub fn insert(&mut self, error: ValidationError) {
        self.entries.insert(error.kind(), error);
    }

    /// Remove the entry of the given kind, if present.
    pub fn remove(&mut self, kind: ErrorKind) -> Option<ValidationError> {
        self.entries.remove(&kind)
    }

    pub fn contains(&self, kind: ErrorKind) -> bool {
        self.entries.contains_key(&kind)
    }

    pub fn get(&self, kind: ErrorKind) -> Option<&ValidationError> {
        self.entries.get(&kind)
    }

    /// Union with another set; entries from `other` win on kind collision.
    pub fn merge(&mut self, other: ErrorSet) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.entries.values()
    }

    pub fn kinds(&self) -> impl Iterator<Item = ErrorKind> + '_ {
        self.entries.keys().copied()
    }

    /// User-facing messages for every fired error, in kind order.
    pub fn messages(&self) -> Vec<String> {
        self.entries.values().map(|e| e.to_string()).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl FromIterator<ValidationError> for ErrorSet {
    fn from_iter<I: IntoIterator<Item = ValidationError>>(iter: I) -> Self {
        let mut set = Self::new();
        for error in iter {
            set.insert(error);
        }
        set
    }
}
