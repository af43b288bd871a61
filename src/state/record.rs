//! Resolved registration payload handed to the submit capability

use crate::state::phones::TipoTelefono;
use serde::{Deserialize, Serialize};

/// Nested address block of the resolved record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DireccionData {
    pub calle: String,
    pub numero: String,
    pub piso: String,
    pub codigo_postal: String,
    pub ciudad: String,
    pub provincia: String,
}

/// One resolved additional phone entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelefonoData {
    pub tipo: TipoTelefono,
    pub numero: String,
}

/// The fully resolved registration record: scalar fields, nested address,
/// repeated phone list, and consent flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationData {
    pub nombre: String,
    pub apellidos: String,
    pub nif: String,
    pub fecha_nacimiento: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub telefono_principal: String,
    pub telefono_secundario: String,
    pub direccion: DireccionData,
    pub telefonos_adicionales: Vec<TelefonoData>,
    pub acepta_terminos: bool,
    pub recibir_newsletter: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_record_serializes_with_camel_case_keys() {
        let record = RegistrationData {
            nombre: "Ana".into(),
            fecha_nacimiento: "1960-05-02".into(),
            telefonos_adicionales: vec![TelefonoData {
                tipo: TipoTelefono::Fijo,
                numero: "612345678".into(),
            }],
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["nombre"], "Ana");
        assert_eq!(json["fechaNacimiento"], "1960-05-02");
        assert_eq!(json["telefonosAdicionales"][0]["tipo"], "fijo");
        assert_eq!(json["direccion"]["codigoPostal"], "");
        assert_eq!(json["aceptaTerminos"], false);
    }
}
