//! HTTP access to the Registro backend.
//!
//! [`RecordsApi`] is the seam the TUI and CLI program against;
//! [`HttpRecordsClient`] is the reqwest implementation and [`ExportSink`]
//! decides where exported spreadsheets land.

mod api;
mod error;
mod export;
mod http;

pub use api::RecordsApi;
pub use error::ClientError;
pub use export::{DirectoryExportSink, ExportSink};
pub use http::HttpRecordsClient;
