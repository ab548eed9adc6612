//! Write-only archive of finished drinks.
//!
//! Every submission's full working state is stored as one JSON object keyed by
//! `<cocktail_name>_<YYYYMMDD_HHMMSS>.json`. Nothing is ever read back.

use async_trait::async_trait;
use chrono::{DateTime, Local};
use log::{debug, info};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use urlencoding::encode as urlencode;

use crate::config::{ArchiveBackend, ArchiveConfig};
use crate::error::MixologyError;
use crate::model::MixRecord;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store rejected '{key}' with status {status}")]
    Rejected { key: String, status: u16 },

    #[error("could not serialize record: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Object key for a drink archived at `at`.
///
/// Spaces become underscores. Path separators and control characters are
/// replaced too so the key stays a single path segment on one line.
pub fn archive_key(cocktail_name: &str, at: &DateTime<Local>) -> String {
    let name: String = cocktail_name
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            c if c.is_control() => '_',
            other => other,
        })
        .collect();
    format!("{}_{}.json", name, at.format("%Y%m%d_%H%M%S"))
}

pub fn record_key(record: &MixRecord) -> String {
    archive_key(&record.response.cocktail_name, &record.created_at)
}

/// Destination for archived records
#[async_trait]
pub trait ArchiveSink: Send + Sync {
    fn name(&self) -> &str;

    async fn archive(&self, record: &MixRecord) -> Result<(), ArchiveError>;
}

/// Stores records as files in a local directory
#[derive(Debug, Clone)]
pub struct LocalArchive {
    root_dir: PathBuf,
}

impl LocalArchive {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }
}

#[async_trait]
impl ArchiveSink for LocalArchive {
    fn name(&self) -> &str {
        "local"
    }

    async fn archive(&self, record: &MixRecord) -> Result<(), ArchiveError> {
        let body = serde_json::to_vec_pretty(record)?;
        fs::create_dir_all(&self.root_dir).await?;

        let path = self.root_dir.join(record_key(record));
        let mut file = fs::File::create(&path).await?;
        file.write_all(&body).await?;
        file.flush().await?;

        info!("Archived drink to {}", path.display());
        Ok(())
    }
}

/// PUTs records to an S3-compatible object store at `<endpoint>/<bucket>/<key>`
pub struct HttpArchive {
    client: Client,
    endpoint: String,
    bucket: String,
    token: Option<String>,
}

impl HttpArchive {
    pub fn new(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ArchiveError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
            token,
        })
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.bucket, urlencode(key))
    }
}

#[async_trait]
impl ArchiveSink for HttpArchive {
    fn name(&self) -> &str {
        "http"
    }

    async fn archive(&self, record: &MixRecord) -> Result<(), ArchiveError> {
        let key = record_key(record);
        let mut request = self
            .client
            .put(self.object_url(&key))
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(record)?);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ArchiveError::Rejected {
                key,
                status: response.status().as_u16(),
            });
        }

        info!("Archived drink to {}/{}", self.bucket, key);
        Ok(())
    }
}

/// Drops every record
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledArchive;

#[async_trait]
impl ArchiveSink for DisabledArchive {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn archive(&self, record: &MixRecord) -> Result<(), ArchiveError> {
        debug!("Archive disabled, skipping {}", record_key(record));
        Ok(())
    }
}

/// Build the sink selected by configuration
pub fn sink_from_config(
    config: &ArchiveConfig,
    timeout: Duration,
) -> Result<Box<dyn ArchiveSink>, MixologyError> {
    match config.backend {
        ArchiveBackend::Local => Ok(Box::new(LocalArchive::new(config.directory.clone()))),
        ArchiveBackend::Http => {
            let endpoint = config.endpoint.clone().ok_or_else(|| {
                MixologyError::BuilderError(
                    "archive.endpoint is required for the http archive backend".to_string(),
                )
            })?;
            Ok(Box::new(HttpArchive::new(
                endpoint,
                config.bucket.clone(),
                config.token.clone(),
                timeout,
            )?))
        }
        ArchiveBackend::Disabled => Ok(Box::new(DisabledArchive)),
    }
}
