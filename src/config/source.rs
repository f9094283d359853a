//! Fetchable configuration sources.
//!
//! A [`ConfigFetcher`] retrieves one JSON document by its page-relative path
//! (`/config.project.json`, `/config.default.json`). Each call is a single
//! attempt; the loader decides what a failure means.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// A successfully fetched and parsed document.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedDocument {
    /// Parsed JSON object
    pub value: Value,
    /// Resolved URL or file path
    pub location: String,
    /// SHA-256 of the raw bytes, hex encoded
    pub digest: String,
}

impl FetchedDocument {
    /// Parse raw bytes into a document. Only JSON objects are accepted.
    pub fn parse(location: impl Into<String>, bytes: &[u8]) -> Result<Self, FetchError> {
        let location = location.into();

        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let digest = hex::encode(hasher.finalize());

        let value: Value = serde_json::from_slice(bytes).map_err(|e| FetchError::Parse {
            location: location.clone(),
            reason: e.to_string(),
        })?;

        if !value.is_object() {
            return Err(FetchError::NotAnObject {
                location,
                found: mfe_schema::json_type_name(&value),
            });
        }

        Ok(Self {
            value,
            location,
            digest,
        })
    }
}

/// Why a document could not be fetched.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {location} failed: {reason}")]
    Network { location: String, reason: String },

    #[error("{location} returned HTTP {status}")]
    Status { location: String, status: u16 },

    #[error("{location} not found")]
    NotFound { location: String },

    #[error("failed to read {location}: {reason}")]
    Io { location: String, reason: String },

    #[error("malformed JSON in {location}: {reason}")]
    Parse { location: String, reason: String },

    #[error("{location} is not a JSON object (found {found})")]
    NotAnObject { location: String, found: &'static str },

    #[error("invalid location {path}: {reason}")]
    InvalidLocation { path: String, reason: String },
}

/// Retrieves configuration documents by page-relative path.
#[async_trait]
pub trait ConfigFetcher: Send + Sync {
    async fn fetch(&self, path: &str) -> Result<FetchedDocument, FetchError>;

    /// Human-readable description for logs
    fn describe(&self) -> String;
}

/// Fetches documents over HTTP relative to the hosting page's origin.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: Url,
    timeout: Option<Duration>,
}

impl HttpFetcher {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url).map_err(|e| FetchError::InvalidLocation {
            path: base_url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            client: Client::new(),
            base_url,
            timeout: None,
        })
    }

    /// Use a shared client (connection pool, proxy settings).
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Per-request timeout. Without one, the client's own network timeout applies.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a page-relative path the way a browser would.
    pub fn resolve(&self, path: &str) -> Result<Url, FetchError> {
        self.base_url.join(path).map_err(|e| FetchError::InvalidLocation {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl ConfigFetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<FetchedDocument, FetchError> {
        let url = self.resolve(path)?;
        let location = url.to_string();

        let mut request = self.client.get(url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| FetchError::Network {
            location: location.clone(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound { location });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                location,
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| FetchError::Network {
            location: location.clone(),
            reason: e.to_string(),
        })?;

        FetchedDocument::parse(location, &bytes)
    }

    fn describe(&self) -> String {
        format!("http {}", self.base_url)
    }
}

/// Reads documents from a local directory standing in for the page root.
#[derive(Debug, Clone)]
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, FetchError> {
        let relative = path.trim_start_matches('/');
        if relative.split('/').any(|part| part == "..") {
            return Err(FetchError::InvalidLocation {
                path: path.to_string(),
                reason: "path escapes the configuration root".to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ConfigFetcher for DirFetcher {
    async fn fetch(&self, path: &str) -> Result<FetchedDocument, FetchError> {
        let file = self.resolve(path)?;
        let location = file.display().to_string();

        let bytes = match tokio::fs::read(&file).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FetchError::NotFound { location });
            }
            Err(e) => {
                return Err(FetchError::Io {
                    location,
                    reason: e.to_string(),
                });
            }
        };

        FetchedDocument::parse(location, &bytes)
    }

    fn describe(&self) -> String {
        format!("dir {}", self.root.display())
    }
}

/// Serves documents from memory.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    documents: HashMap<String, Vec<u8>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a raw body for `path`. The body is parsed on every fetch, so
    /// malformed content behaves like a malformed remote file.
    pub fn with_body(mut self, path: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.documents.insert(path.into(), body.into());
        self
    }

    pub fn with_json(self, path: impl Into<String>, value: &Value) -> Self {
        self.with_body(path, value.to_string())
    }
}

#[async_trait]
impl ConfigFetcher for StaticFetcher {
    async fn fetch(&self, path: &str) -> Result<FetchedDocument, FetchError> {
        match self.documents.get(path) {
            Some(bytes) => FetchedDocument::parse(format!("static:{}", path), bytes),
            None => Err(FetchError::NotFound {
                location: format!("static:{}", path),
            }),
        }
    }

    fn describe(&self) -> String {
        format!("static ({} documents)", self.documents.len())
    }
}

/// A fetcher with nothing to fetch; only in-memory layers apply.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFetch;

#[async_trait]
impl ConfigFetcher for NoFetch {
    async fn fetch(&self, path: &str) -> Result<FetchedDocument, FetchError> {
        Err(FetchError::NotFound {
            location: path.to_string(),
        })
    }

    fn describe(&self) -> String {
        "none".to_string()
    }
}
