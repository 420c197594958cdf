//! Wire types shared by the Registro client crates.
//!
//! The backend owns storage, ordering, and spreadsheet generation; these types
//! only mirror the JSON it exchanges with clients.

mod filter;
mod persona;

pub use filter::SearchFilter;
pub use persona::{Persona, PersonaDraft, PersonaId};

/// Collection endpoint: `GET` lists records, `POST` creates one.
pub const PERSONAS_PATH: &str = "/personas";
/// Filtered listing endpoint.
pub const SEARCH_PATH: &str = "/personas/buscar";
/// Spreadsheet export endpoint.
pub const EXPORT_PATH: &str = "/personas/descargar/excel";
/// File name used when saving the exported spreadsheet.
pub const EXPORT_FILE_NAME: &str = "registro-nacional.xlsx";
