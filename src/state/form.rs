//! Registration form record: fields, nested address, repeated phones

use crate::errors::ErrorSet;
use crate::rules::{cross, sync, CrossRuleSet, FieldLookup, RuleSet};
use crate::state::field::FieldState;
use crate::state::phones::{TelefonoList, TipoTelefono};
use crate::state::record::{DireccionData, RegistrationData, TelefonoData};

/// Top-level scalar fields of the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarField {
    Nombre,
    Apellidos,
    Nif,
    FechaNacimiento,
    Username,
    Email,
    Password,
    ConfirmPassword,
    TelefonoPrincipal,
    TelefonoSecundario,
}

impl ScalarField {
    /// Published field identifier, as the presentation layer knows it.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Nombre => "nombre",
            Self::Apellidos => "apellidos",
            Self::Nif => "nif",
            Self::FechaNacimiento => "fechaNacimiento",
            Self::Username => "username",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
            Self::TelefonoPrincipal => "telefonoPrincipal",
            Self::TelefonoSecundario => "telefonoSecundario",
        }
    }
}

/// Fields of the nested address record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressField {
    Calle,
    Numero,
    Piso,
    CodigoPostal,
    Ciudad,
    Provincia,
}

/// Addresses any editable text field in the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldId {
    Scalar(ScalarField),
    Direccion(AddressField),
    /// The number field of the additional-phone entry at this index.
    TelefonoAdicional(usize),
}

impl From<ScalarField> for FieldId {
    fn from(field: ScalarField) -> Self {
        Self::Scalar(field)
    }
}

impl From<AddressField> for FieldId {
    fn from(field: AddressField) -> Self {
        Self::Direccion(field)
    }
}

/// Nested address sub-record.
#[derive(Debug)]
pub struct AddressForm {
    pub calle: FieldState,
    pub numero: FieldState,
    pub piso: FieldState,
    pub codigo_postal: FieldState,
    pub ciudad: FieldState,
    pub provincia: FieldState,
}

impl AddressForm {
    fn new() -> Self {
        Self {
            calle: FieldState::new(RuleSet::new().with(sync::required)),
            numero: FieldState::new(RuleSet::new().with(sync::required)),
            piso: FieldState::new(RuleSet::new()),
            codigo_postal: FieldState::new(
                RuleSet::new().with(sync::required).with(sync::codigo_postal),
            ),
            ciudad: FieldState::new(RuleSet::new().with(sync::required)),
            provincia: FieldState::new(RuleSet::new().with(sync::required)),
        }
    }

    pub fn field(&self, field: AddressField) -> &FieldState {
        match field {
            AddressField::Calle => &self.calle,
            AddressField::Numero => &self.numero,
            AddressField::Piso => &self.piso,
            AddressField::CodigoPostal => &self.codigo_postal,
            AddressField::Ciudad => &self.ciudad,
            AddressField::Provincia => &self.provincia,
        }
    }

    pub fn field_mut(&mut self, field: AddressField) -> &mut FieldState {
        match field {
            AddressField::Calle => &mut self.calle,
            AddressField::Numero => &mut self.numero,
            AddressField::Piso => &mut self.piso,
            AddressField::CodigoPostal => &mut self.codigo_postal,
            AddressField::Ciudad => &mut self.ciudad,
            AddressField::Provincia => &mut self.provincia,
        }
    }

    fn fields_mut(&mut self) -> [&mut FieldState; 6] {
        [
            &mut self.calle,
            &mut self.numero,
            &mut self.piso,
            &mut self.codigo_postal,
            &mut self.ciudad,
            &mut self.provincia,
        ]
    }

    pub fn is_valid(&self) -> bool {
        [
            &self.calle,
            &self.numero,
            &self.piso,
            &self.codigo_postal,
            &self.ciudad,
            &self.provincia,
        ]
        .iter()
        .all(|f| f.is_valid())
    }

    fn resolve(&self) -> DireccionData {
        DireccionData {
            calle: self.calle.value().to_string(),
            numero: self.numero.value().to_string(),
            piso: self.piso.value().to_string(),
            codigo_postal: self.codigo_postal.value().to_string(),
            ciudad: self.ciudad.value().to_string(),
            provincia: self.provincia.value().to_string(),
        }
    }
}

/// The registration form record.
///
/// Validity is the AND of every field's validity, the record-level
/// cross-field rules, the nested address record, the repeated phone list,
/// and the terms checkbox.
#[derive(Debug)]
pub struct RegistrationForm {
    nombre: FieldState,
    apellidos: FieldState,
    nif: FieldState,
    fecha_nacimiento: FieldState,
    username: FieldState,
    email: FieldState,
    password: FieldState,
    confirm_password: FieldState,
    telefono_principal: FieldState,
    telefono_secundario: FieldState,
    pub direccion: AddressForm,
    pub telefonos_adicionales: TelefonoList,
    acepta_terminos: bool,
    recibir_newsletter: bool,
    cross_rules: CrossRuleSet,
    cross_errors: ErrorSet,
}

impl RegistrationForm {
    pub fn new(max_telefonos: usize) -> Self {
        let cross_rules = CrossRuleSet::new()
            .with(cross::password_match("password", "confirmPassword"))
            .with(cross::at_least_one_required(&[
                "telefonoPrincipal",
                "telefonoSecundario",
            ]));

        let mut form = Self {
            nombre: FieldState::new(RuleSet::new().with(sync::required).with(sync::min_length(2))),
            apellidos: FieldState::new(
                RuleSet::new().with(sync::required).with(sync::min_length(2)),
            ),
            nif: FieldState::new(RuleSet::new().with(sync::required).with(sync::nif)),
            fecha_nacimiento: FieldState::new(RuleSet::new().with(sync::required)),
            username: FieldState::new(
                RuleSet::new()
                    .with(sync::required)
                    .with(sync::min_length(3))
                    .with(sync::max_length(20)),
            ),
            email: FieldState::new(RuleSet::new().with(sync::required).with(sync::email)),
            password: FieldState::new(
                RuleSet::new()
                    .with(sync::required)
                    .with(sync::password_strength),
            ),
            confirm_password: FieldState::new(RuleSet::new().with(sync::required)),
            telefono_principal: FieldState::new(RuleSet::new().with(sync::telefono)),
            telefono_secundario: FieldState::new(RuleSet::new().with(sync::telefono)),
            direccion: AddressForm::new(),
            telefonos_adicionales: TelefonoList::new(max_telefonos),
            acepta_terminos: false,
            recibir_newsletter: false,
            cross_rules,
            cross_errors: ErrorSet::new(),
        };
        form.recompute_cross();
        form
    }

    pub fn scalar(&self, field: ScalarField) -> &FieldState {
        match field {
            ScalarField::Nombre => &self.nombre,
            ScalarField::Apellidos => &self.apellidos,
            ScalarField::Nif => &self.nif,
            ScalarField::FechaNacimiento => &self.fecha_nacimiento,
            ScalarField::Username => &self.username,
            ScalarField::Email => &self.email,
            ScalarField::Password => &self.password,
            ScalarField::ConfirmPassword => &self.confirm_password,
            ScalarField::TelefonoPrincipal => &self.telefono_principal,
            ScalarField::TelefonoSecundario => &self.telefono_secundario,
        }
    }

    pub fn scalar_mut(&mut self, field: ScalarField) -> &mut FieldState {
        match field {
            ScalarField::Nombre => &mut self.nombre,
            ScalarField::Apellidos => &mut self.apellidos,
            ScalarField::Nif => &mut self.nif,
            ScalarField::FechaNacimiento => &mut self.fecha_nacimiento,
            ScalarField::Username => &mut self.username,
            ScalarField::Email => &mut self.email,
            ScalarField::Password => &mut self.password,
            ScalarField::ConfirmPassword => &mut self.confirm_password,
            ScalarField::TelefonoPrincipal => &mut self.telefono_principal,
            ScalarField::TelefonoSecundario => &mut self.telefono_secundario,
        }
    }

    pub fn field(&self, id: FieldId) -> Option<&FieldState> {
        match id {
            FieldId::Scalar(field) => Some(self.scalar(field)),
            FieldId::Direccion(field) => Some(self.direccion.field(field)),
            FieldId::TelefonoAdicional(index) => {
                self.telefonos_adicionales.get(index).map(|e| &e.numero)
            }
        }
    }

    pub fn field_mut(&mut self, id: FieldId) -> Option<&mut FieldState> {
        match id {
            FieldId::Scalar(field) => Some(self.scalar_mut(field)),
            FieldId::Direccion(field) => Some(self.direccion.field_mut(field)),
            FieldId::TelefonoAdicional(index) => self
                .telefonos_adicionales
                .get_mut(index)
                .map(|e| &mut e.numero),
        }
    }

    /// Set a field's value and re-run the record's cross-field rules.
    ///
    /// An out-of-range phone index is ignored; the list is never corrupted.
    pub fn set_value(&mut self, id: FieldId, value: &str) {
        if let Some(field) = self.field_mut(id) {
            field.set_value(value);
            self.recompute_cross();
        }
    }

    pub fn touch(&mut self, id: FieldId) {
        if let Some(field) = self.field_mut(id) {
            field.touch();
        }
    }

    pub fn set_tipo_telefono(&mut self, index: usize, tipo: TipoTelefono) {
        if let Some(entry) = self.telefonos_adicionales.get_mut(index) {
            entry.tipo = tipo;
        }
    }

    pub fn set_acepta_terminos(&mut self, accepted: bool) {
        self.acepta_terminos = accepted;
    }

    pub fn acepta_terminos(&self) -> bool {
        self.acepta_terminos
    }

    pub fn set_recibir_newsletter(&mut self, subscribe: bool) {
        self.recibir_newsletter = subscribe;
    }

    pub fn recibir_newsletter(&self) -> bool {
        self.recibir_newsletter
    }

    /// Record-level errors from cross-field rules.
    pub fn cross_errors(&self) -> &ErrorSet {
        &self.cross_errors
    }

    fn recompute_cross(&mut self) {
        self.cross_errors = self.cross_rules.evaluate(&CrossScope {
            password: &self.password,
            confirm_password: &self.confirm_password,
            telefono_principal: &self.telefono_principal,
            telefono_secundario: &self.telefono_secundario,
        });
    }

    fn scalars(&self) -> [&FieldState; 10] {
        [
            &self.nombre,
            &self.apellidos,
            &self.nif,
            &self.fecha_nacimiento,
            &self.username,
            &self.email,
            &self.password,
            &self.confirm_password,
            &self.telefono_principal,
            &self.telefono_secundario,
        ]
    }

    fn scalars_mut(&mut self) -> [&mut FieldState; 10] {
        [
            &mut self.nombre,
            &mut self.apellidos,
            &mut self.nif,
            &mut self.fecha_nacimiento,
            &mut self.username,
            &mut self.email,
            &mut self.password,
            &mut self.confirm_password,
            &mut self.telefono_principal,
            &mut self.telefono_secundario,
        ]
    }

    /// Overall record validity, async checks aside.
    pub fn is_valid(&self) -> bool {
        self.scalars().iter().all(|f| f.is_valid())
            && self.cross_errors.is_empty()
            && self.direccion.is_valid()
            && self.telefonos_adicionales.is_valid()
            && self.acepta_terminos
    }

    /// Whether any field still has an async check applied but unresolved.
    pub fn has_pending_async(&self) -> bool {
        self.scalars().iter().any(|f| f.pending_async)
    }

    /// Force every field (nested records included) to `touched`, so latent
    /// errors become visible after a blocked submission.
    pub fn mark_all_touched(&mut self) {
        for field in self.scalars_mut() {
            field.touch();
        }
        for field in self.direccion.fields_mut() {
            field.touch();
        }
        self.telefonos_adicionales.mark_all_touched();
    }

    /// Build the resolved record for submission.
    pub fn resolve(&self) -> RegistrationData {
        RegistrationData {
            nombre: self.nombre.value().to_string(),
            apellidos: self.apellidos.value().to_string(),
            nif: self.nif.value().trim().to_uppercase(),
            fecha_nacimiento: self.fecha_nacimiento.value().to_string(),
            username: self.username.value().to_string(),
            email: self.email.value().to_string(),
            password: self.password.value().to_string(),
            telefono_principal: self.telefono_principal.value().to_string(),
            telefono_secundario: self.telefono_secundario.value().to_string(),
            direccion: self.direccion.resolve(),
            telefonos_adicionales: self
                .telefonos_adicionales
                .iter()
                .map(|entry| TelefonoData {
                    tipo: entry.tipo,
                    numero: entry.numero.value().to_string(),
                })
                .collect(),
            acepta_terminos: self.acepta_terminos,
            recibir_newsletter: self.recibir_newsletter,
        }
    }

    /// Clear every field and flag, and empty the phone list.
    pub fn reset(&mut self) {
        for field in self.scalars_mut() {
            field.reset();
        }
        for field in self.direccion.fields_mut() {
            field.reset();
        }
        self.telefonos_adicionales.clear();
        self.acepta_terminos = false;
        self.recibir_newsletter = false;
        self.recompute_cross();
    }
}

/// Cross-rule view over the fields that participate in record-level rules.
struct CrossScope<'a> {
    password: &'a FieldState,
    confirm_password: &'a FieldState,
    telefono_principal: &'a FieldState,
    telefono_secundario: &'a FieldState,
}

impl FieldLookup for CrossScope<'_> {
    fn field_value(&self, name: &str) -> Option<&str> {
        match name {
            "password" => Some(self.password.value()),
            "confirmPassword" => Some(self.confirm_password.value()),
            "telefonoPrincipal" => Some(self.telefono_principal.value()),
            "telefonoSecundario" => Some(self.telefono_secundario.value()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use pretty_assertions::assert_eq;

    /// Fill every field with values that pass the sync rules.
    pub(crate) fn fill_valid(form: &mut RegistrationForm) {
        form.set_value(ScalarField::Nombre.into(), "Ana");
        form.set_value(ScalarField::Apellidos.into(), "García");
        form.set_value(ScalarField::Nif.into(), "12345678Z");
        form.set_value(ScalarField::FechaNacimiento.into(), "1958-03-14");
        form.set_value(ScalarField::Username.into(), "anagarcia");
        form.set_value(ScalarField::Email.into(), "ana@example.com");
        form.set_value(ScalarField::Password.into(), "Abcdef1!");
        form.set_value(ScalarField::ConfirmPassword.into(), "Abcdef1!");
        form.set_value(ScalarField::TelefonoPrincipal.into(), "612345678");
        form.set_value(AddressField::Calle.into(), "Gran Vía");
        form.set_value(AddressField::Numero.into(), "12");
        form.set_value(AddressField::CodigoPostal.into(), "28001");
        form.set_value(AddressField::Ciudad.into(), "Madrid");
        form.set_value(AddressField::Provincia.into(), "Madrid");
        form.set_acepta_terminos(true);
    }

    #[test]
    fn test_new_form_is_invalid_and_untouched() {
        let form = RegistrationForm::new(3);
        assert!(!form.is_valid());
        assert!(!form.scalar(ScalarField::Nombre).touched);
        // both phone fields empty: at-least-one fires at the record level
        assert!(form.cross_errors().contains(ErrorKind::AtLeastOneRequired));
    }

    #[test]
    fn test_filled_form_is_valid() {
        let mut form = RegistrationForm::new(3);
        fill_valid(&mut form);
        assert!(form.is_valid());
        assert!(form.cross_errors().is_empty());
    }

    #[test]
    fn test_terms_gate_validity() {
        let mut form = RegistrationForm::new(3);
        fill_valid(&mut form);
        form.set_acepta_terminos(false);
        assert!(!form.is_valid());
    }

    #[test]
    fn test_password_mismatch_attaches_to_record_not_fields() {
        let mut form = RegistrationForm::new(3);
        fill_valid(&mut form);
        form.set_value(ScalarField::ConfirmPassword.into(), "different");

        assert!(form.cross_errors().contains(ErrorKind::PasswordMismatch));
        assert!(form.scalar(ScalarField::Password).is_valid());
        assert!(form.scalar(ScalarField::ConfirmPassword).is_valid());
        assert!(!form.is_valid());
    }

    #[test]
    fn test_secondary_phone_alone_satisfies_at_least_one() {
        let mut form = RegistrationForm::new(3);
        form.set_value(ScalarField::TelefonoSecundario.into(), "712345678");
        assert!(!form.cross_errors().contains(ErrorKind::AtLeastOneRequired));
    }

    #[test]
    fn test_invalid_address_field_invalidates_record() {
        let mut form = RegistrationForm::new(3);
        fill_valid(&mut form);
        form.set_value(AddressField::CodigoPostal.into(), "53001");
        assert!(!form.is_valid());
        assert!(form
            .direccion
            .codigo_postal
            .has_error(ErrorKind::InvalidCp));
    }

    #[test]
    fn test_invalid_phone_entry_invalidates_record() {
        let mut form = RegistrationForm::new(3);
        fill_valid(&mut form);
        form.telefonos_adicionales.add();
        assert!(!form.is_valid());

        form.set_value(FieldId::TelefonoAdicional(0), "612999888");
        assert!(form.is_valid());
    }

    #[test]
    fn test_set_value_out_of_range_phone_is_ignored() {
        let mut form = RegistrationForm::new(3);
        form.set_value(FieldId::TelefonoAdicional(7), "612345678");
        assert_eq!(form.telefonos_adicionales.len(), 0);
    }

    #[test]
    fn test_mark_all_touched_reaches_nested_records() {
        let mut form = RegistrationForm::new(3);
        form.telefonos_adicionales.add();
        form.mark_all_touched();
        assert!(form.scalar(ScalarField::Email).touched);
        assert!(form.direccion.ciudad.touched);
        assert!(form.telefonos_adicionales.get(0).unwrap().numero.touched);
    }

    #[test]
    fn test_resolve_builds_full_nested_record() {
        let mut form = RegistrationForm::new(3);
        fill_valid(&mut form);
        form.telefonos_adicionales.add();
        form.set_value(FieldId::TelefonoAdicional(0), "633333333");
        form.set_tipo_telefono(0, TipoTelefono::Fijo);
        form.set_recibir_newsletter(true);

        let record = form.resolve();
        assert_eq!(record.nombre, "Ana");
        assert_eq!(record.nif, "12345678Z");
        assert_eq!(record.direccion.codigo_postal, "28001");
        assert_eq!(record.telefonos_adicionales.len(), 1);
        assert_eq!(record.telefonos_adicionales[0].tipo, TipoTelefono::Fijo);
        assert!(record.acepta_terminos);
        assert!(record.recibir_newsletter);
    }

    #[test]
    fn test_resolve_normalizes_nif() {
        let mut form = RegistrationForm::new(3);
        form.set_value(ScalarField::Nif.into(), " 12345678z ");
        assert_eq!(form.resolve().nif, "12345678Z");
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut form = RegistrationForm::new(3);
        fill_valid(&mut form);
        form.telefonos_adicionales.add();
        form.mark_all_touched();

        form.reset();
        assert_eq!(form.scalar(ScalarField::Nombre).value(), "");
        assert!(!form.scalar(ScalarField::Nombre).touched);
        assert_eq!(form.telefonos_adicionales.len(), 0);
        assert!(!form.acepta_terminos());
        assert!(!form.is_valid());
    }
}
