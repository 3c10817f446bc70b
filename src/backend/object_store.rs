use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::{Backend, BackendError};

#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("bucket '{bucket}' not found")]
    NoSuchBucket { bucket: String },

    #[error("object '{key}' not found")]
    NoSuchKey { key: String },

    #[error("{service} error ({status}): {message}")]
    Service {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("request cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub size: u64,
}

impl ObjectSummary {
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size,
        }
    }

    /// Zero-size objects and keys ending in `/` are folder placeholders.
    pub fn is_directory_marker(&self) -> bool {
        self.size == 0 || self.key.ends_with('/')
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListRequest<'a> {
    pub bucket: &'a str,
    /// Literal key prefix; empty lists the whole bucket.
    pub prefix: &'a str,
    pub continuation: Option<&'a str>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectPage {
    pub objects: Vec<ObjectSummary>,
    /// Continuation token; `None` once the listing is exhausted.
    pub next: Option<String>,
}

/// Minimal blob-store surface shared by S3, Google Cloud Storage and Azure blob.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn list_page(
        &self,
        request: ListRequest<'_>,
        cancel: &CancellationToken,
    ) -> Result<ObjectPage, ObjectStoreError>;

    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, ObjectStoreError>;
}

/// Splits `bucket/key...` into its bucket and the remaining key path.
///
/// Returns `None` unless both parts are non-empty.
pub fn split_bucket_path(path: &str) -> Option<(&str, &str)> {
    let (bucket, key) = path.split_once('/')?;
    if bucket.is_empty() || key.is_empty() {
        return None;
    }
    Some((bucket, key))
}

/// Reads one object, addressed as `bucket/key`.
pub struct ObjectStoreReader {
    store: Arc<dyn ObjectStore>,
    label: &'static str,
    path: String,
}

impl ObjectStoreReader {
    pub fn new(store: Arc<dyn ObjectStore>, label: &'static str, path: impl Into<String>) -> Self {
        Self {
            store,
            label,
            path: path.into(),
        }
    }
}

#[async_trait]
impl Backend for ObjectStoreReader {
    async fn read(&self, cancel: &CancellationToken) -> Result<Vec<u8>, BackendError> {
        let (bucket, key) =
            split_bucket_path(&self.path).ok_or_else(|| BackendError::InvalidPath {
                label: self.label,
                path: self.path.clone(),
            })?;

        if cancel.is_cancelled() {
            return Err(BackendError::Cancelled);
        }
        tracing::debug!(backend = self.label, bucket, key, "reading object");
        match self.store.get_object(bucket, key, cancel).await {
            Ok(bytes) => Ok(bytes),
            Err(ObjectStoreError::Cancelled) => Err(BackendError::Cancelled),
            Err(err) => Err(err.into()),
        }
    }
}
