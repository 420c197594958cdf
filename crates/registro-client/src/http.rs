//! reqwest-backed implementation of [`RecordsApi`].

use crate::{ClientError, RecordsApi};
use async_trait::async_trait;
use log::{debug, info, warn};
use registro_config::ApiConfig;
use registro_protocol::{
    EXPORT_PATH, PERSONAS_PATH, Persona, PersonaDraft, SEARCH_PATH, SearchFilter,
};
use reqwest::{Client, Response};

const MAX_LOGGED_BODY_CHARS: usize = 200;

/// HTTP client for the records backend.
#[derive(Debug, Clone)]
pub struct HttpRecordsClient {
    base_url: String,
    http_client: Client,
}

impl HttpRecordsClient {
    /// Build a client from API settings, applying the configured timeout.
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let http_client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self::with_client(config.normalized_base_url(), http_client))
    }

    /// Wrap an existing reqwest client.
    pub fn with_client(base_url: impl Into<String>, http_client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("records client ready (base_url={})", base_url);
        Self {
            base_url,
            http_client,
        }
    }

    /// Base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl RecordsApi for HttpRecordsClient {
    async fn list(&self) -> Result<Vec<Persona>, ClientError> {
        let url = self.url(PERSONAS_PATH);
        debug!("listing records (url={})", url);
        let response = self.http_client.get(&url).send().await?;
        decode_records(ensure_success(response).await?).await
    }

    async fn search(&self, filter: &SearchFilter) -> Result<Vec<Persona>, ClientError> {
        let url = self.url(SEARCH_PATH);
        let pairs = filter.query_pairs();
        debug!("searching records (url={}, params={})", url, pairs.len());
        let response = self.http_client.get(&url).query(&pairs).send().await?;
        decode_records(ensure_success(response).await?).await
    }

    async fn create(&self, draft: &PersonaDraft) -> Result<(), ClientError> {
        let url = self.url(PERSONAS_PATH);
        debug!("creating record (url={})", url);
        let response = self.http_client.post(&url).json(draft).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn export_spreadsheet(&self) -> Result<Vec<u8>, ClientError> {
        let url = self.url(EXPORT_PATH);
        debug!("downloading spreadsheet (url={})", url);
        let response = self.http_client.get(&url).send().await?;
        let bytes = ensure_success(response).await?.bytes().await?;
        debug!("spreadsheet downloaded (bytes={})", bytes.len());
        Ok(bytes.to_vec())
    }
}

/// Turn any non-2xx status into [`ClientError::Status`].
async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    warn!(
        "backend returned error status (status={}, body={})",
        status.as_u16(),
        body_excerpt(&body)
    );
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Leading part of an error body, cut on a char boundary.
fn body_excerpt(body: &str) -> &str {
    match body.char_indices().nth(MAX_LOGGED_BODY_CHARS) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

async fn decode_records(response: Response) -> Result<Vec<Persona>, ClientError> {
    let bytes = response.bytes().await?;
    let records: Vec<Persona> = serde_json::from_slice(&bytes)?;
    debug!("decoded records (count={})", records.len());
    Ok(records)
}
