//! Record and draft payloads.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend-assigned record identifier.
///
/// The service has shipped both numeric and string ids, so either form is
/// accepted and rendered verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersonaId {
    Number(i64),
    Text(String),
}

impl fmt::Display for PersonaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonaId::Number(value) => write!(f, "{value}"),
            PersonaId::Text(value) => f.write_str(value),
        }
    }
}

/// A person entry as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub id: PersonaId,
    pub nombre: String,
    pub apellido: String,
    #[serde(default)]
    pub ciudad: Option<String>,
    #[serde(default)]
    pub ocupacion: Option<String>,
    #[serde(default)]
    pub relato: Option<String>,
    /// Server-assigned creation timestamp, kept as sent.
    #[serde(default)]
    pub fecha: Option<String>,
}

impl Persona {
    /// Full display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.nombre, self.apellido)
    }

    /// City, when present and non-empty.
    pub fn ciudad(&self) -> Option<&str> {
        non_empty(self.ciudad.as_deref())
    }

    /// Occupation, when present and non-empty.
    pub fn ocupacion(&self) -> Option<&str> {
        non_empty(self.ocupacion.as_deref())
    }

    /// Free-text note, when present and non-empty.
    pub fn relato(&self) -> Option<&str> {
        non_empty(self.relato.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

/// Form state for a record that has not been submitted yet.
///
/// Serialized with all five keys, empty strings included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaDraft {
    pub nombre: String,
    pub apellido: String,
    pub ciudad: String,
    pub ocupacion: String,
    pub relato: String,
}

impl PersonaDraft {
    /// True when both required fields are present.
    ///
    /// Only presence is checked; a whitespace-only value counts as present.
    pub fn has_required_fields(&self) -> bool {
        !self.nombre.is_empty() && !self.apellido.is_empty()
    }

    /// Reset every field to the empty string.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
