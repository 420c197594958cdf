//! Configuration schema for Registro.

use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Backend used when no layer overrides `api.base_url`.
pub const DEFAULT_BASE_URL: &str = "https://registronacional-production.up.railway.app/api";

/// Root config for the Registro client.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RegistroConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl RegistroConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> RegistroConfigBuilder {
        RegistroConfigBuilder::new()
    }
}

/// Builder for assembling a `RegistroConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct RegistroConfigBuilder {
    config: RegistroConfig,
}

impl RegistroConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: RegistroConfig::default(),
        }
    }

    /// Point the client at a different backend.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.api.base_url = base_url.into();
        self
    }

    /// Override the per-request timeout.
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.config.api.timeout_secs = timeout_secs;
        self
    }

    /// Save exported spreadsheets into this directory.
    pub fn export_directory(mut self, directory: impl Into<String>) -> Self {
        self.config.export.directory = Some(directory.into());
        self
    }

    /// Finalize and return the built `RegistroConfig`.
    pub fn build(self) -> RegistroConfig {
        self.config
    }
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    /// Base URL without a trailing slash, ready for path concatenation.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Spreadsheet export settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExportConfig {
    /// Target directory; falls back to the user's download directory.
    #[serde(default)]
    pub directory: Option<String>,
}

impl ExportConfig {
    /// Resolve the directory exported files are written to.
    pub fn resolve_directory(&self) -> PathBuf {
        if let Some(directory) = self.directory.as_ref() {
            return PathBuf::from(directory);
        }
        UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(|dir| dir.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
