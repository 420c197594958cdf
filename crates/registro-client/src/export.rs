//! Destinations for exported spreadsheets.

use crate::ClientError;
use async_trait::async_trait;
use log::info;
use registro_protocol::EXPORT_FILE_NAME;
use std::path::PathBuf;

/// Persists an exported spreadsheet and reports where it went.
#[async_trait]
pub trait ExportSink: Send + Sync {
    async fn save(&self, contents: &[u8]) -> Result<PathBuf, ClientError>;
}

/// Writes `registro-nacional.xlsx` into a fixed directory, replacing any
/// previous export.
#[derive(Debug, Clone)]
pub struct DirectoryExportSink {
    directory: PathBuf,
}

impl DirectoryExportSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Full path of the file this sink writes.
    pub fn target(&self) -> PathBuf {
        self.directory.join(EXPORT_FILE_NAME)
    }
}

#[async_trait]
impl ExportSink for DirectoryExportSink {
    async fn save(&self, contents: &[u8]) -> Result<PathBuf, ClientError> {
        tokio::fs::create_dir_all(&self.directory).await?;
        let target = self.target();
        tokio::fs::write(&target, contents).await?;
        info!(
            "spreadsheet saved (path={}, bytes={})",
            target.display(),
            contents.len()
        );
        Ok(target)
    }
}
