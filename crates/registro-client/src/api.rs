//! Backend operations used by the record view.

use crate::ClientError;
use async_trait::async_trait;
use registro_protocol::{Persona, PersonaDraft, SearchFilter};

/// Operations exposed by the records backend.
///
/// Ordering of returned lists is the backend's responsibility (newest first);
/// implementations must return records exactly as received.
#[async_trait]
pub trait RecordsApi: Send + Sync {
    /// `GET /personas`.
    async fn list(&self) -> Result<Vec<Persona>, ClientError>;

    /// `GET /personas/buscar` with the non-empty filter fields as query.
    async fn search(&self, filter: &SearchFilter) -> Result<Vec<Persona>, ClientError>;

    /// `POST /personas` with the draft as JSON. Only the status is checked.
    async fn create(&self, draft: &PersonaDraft) -> Result<(), ClientError>;

    /// `GET /personas/descargar/excel`, returned as opaque bytes.
    async fn export_spreadsheet(&self) -> Result<Vec<u8>, ClientError>;
}
