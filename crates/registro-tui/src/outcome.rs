//! Per-operation results shown to the user.

use std::fmt;

/// The four network operations of the record view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperationKind {
    Load,
    Search,
    Create,
    Export,
}

impl OperationKind {
    fn failure_prefix(self) -> &'static str {
        match self {
            OperationKind::Load => "Error al cargar",
            OperationKind::Search => "Error en búsqueda",
            OperationKind::Create => "Error al guardar",
            OperationKind::Export => "Error al descargar",
        }
    }
}

/// Settled result of one operation kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub kind: OperationKind,
    pub success: bool,
    pub message: String,
}

impl Outcome {
    pub fn success(kind: OperationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            success: true,
            message: message.into(),
        }
    }

    /// Failure wrapping the underlying cause, e.g. `Error al cargar: HTTP 500`.
    pub fn failure(kind: OperationKind, cause: impl fmt::Display) -> Self {
        Self {
            kind,
            success: false,
            message: format!("{}: {cause}", kind.failure_prefix()),
        }
    }

    /// Create rejected before any request was issued.
    pub fn missing_required() -> Self {
        Self {
            kind: OperationKind::Create,
            success: false,
            message: "Nombre y apellido son requeridos".to_string(),
        }
    }

    pub fn created() -> Self {
        Self::success(OperationKind::Create, "Persona guardada exitosamente")
    }

    pub fn exported(path: impl fmt::Display) -> Self {
        Self::success(
            OperationKind::Export,
            format!("Excel descargado exitosamente ({path})"),
        )
    }

    /// Message with the success/failure marker.
    pub fn render(&self) -> String {
        let marker = if self.success { "✅" } else { "❌" };
        format!("{marker} {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::{OperationKind, Outcome};
    use pretty_assertions::assert_eq;

    #[test]
    fn failures_wrap_cause_with_kind_prefix() {
        assert_eq!(
            Outcome::failure(OperationKind::Search, "HTTP 502").render(),
            "❌ Error en búsqueda: HTTP 502"
        );
        assert_eq!(
            Outcome::failure(OperationKind::Export, "timed out").message,
            "Error al descargar: timed out"
        );
    }

    #[test]
    fn success_marker() {
        assert_eq!(
            Outcome::created().render(),
            "✅ Persona guardada exitosamente"
        );
    }
}
