use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use walkdir::WalkDir;

use super::glob::{Glob, has_meta, literal_prefix};
use crate::backend::{ListRequest, ObjectStore, ObjectStoreError};

#[derive(Debug, Error)]
pub enum EnumerateError {
    #[error("Unable to parse {label} path: {path}. Must be BUCKET_NAME/PREFIX")]
    InvalidPath { label: &'static str, path: String },

    #[error("no Terraform state was found in {path}, exiting")]
    NoStateFound { path: String },

    #[error(transparent)]
    Listing(#[from] ObjectStoreError),

    #[error("unable to walk {path}: {message}")]
    Io { path: String, message: String },

    #[error("state enumeration cancelled")]
    Cancelled,
}

/// Resolves a possibly-globbed path to the concrete state locations behind it.
#[async_trait]
pub trait StateEnumerator: Send + Sync {
    /// The path as configured, before resolution.
    fn origin(&self) -> &str;

    /// Matching locations in listing order; never empty on success.
    async fn enumerate(&self, cancel: &CancellationToken) -> Result<Vec<String>, EnumerateError>;
}

/// Lists an object store under the pattern's literal prefix and filters keys
/// through the full pattern.
pub struct ObjectStoreEnumerator {
    store: Arc<dyn ObjectStore>,
    label: &'static str,
    path: String,
}

impl ObjectStoreEnumerator {
    pub fn new(store: Arc<dyn ObjectStore>, label: &'static str, path: impl Into<String>) -> Self {
        Self {
            store,
            label,
            path: path.into(),
        }
    }
}

#[async_trait]
impl StateEnumerator for ObjectStoreEnumerator {
    fn origin(&self) -> &str {
        &self.path
    }

    async fn enumerate(&self, cancel: &CancellationToken) -> Result<Vec<String>, EnumerateError> {
        let Some((bucket, pattern)) = self.path.split_once('/') else {
            return Err(EnumerateError::InvalidPath {
                label: self.label,
                path: self.path.clone(),
            });
        };

        let prefix = literal_prefix(pattern);
        let glob = Glob::new(pattern);
        let mut continuation: Option<String> = None;
        let mut matches = Vec::new();

        loop {
            if cancel.is_cancelled() {
                return Err(EnumerateError::Cancelled);
            }
            let page = self
                .store
                .list_page(
                    ListRequest {
                        bucket,
                        prefix: &prefix,
                        continuation: continuation.as_deref(),
                    },
                    cancel,
                )
                .await
                .map_err(|err| match err {
                    ObjectStoreError::Cancelled => EnumerateError::Cancelled,
                    other => other.into(),
                })?;

            for object in page.objects {
                if object.is_directory_marker() || !glob.is_match(&object.key) {
                    continue;
                }
                matches.push(format!("{bucket}/{}", object.key));
            }

            match page.next {
                Some(next) => continuation = Some(next),
                None => break,
            }
        }

        if matches.is_empty() {
            return Err(EnumerateError::NoStateFound {
                path: self.path.clone(),
            });
        }
        tracing::debug!(
            backend = self.label,
            path = %self.path,
            count = matches.len(),
            "resolved state locations"
        );
        Ok(matches)
    }
}

/// Resolves a local path: a file is returned as-is, a directory is searched
/// for `*.tfstate` files, and a glob is matched against every file under its
/// literal prefix.
pub struct FileEnumerator {
    path: String,
}

impl FileEnumerator {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    fn resolve(path: &str) -> Result<Vec<String>, EnumerateError> {
        let io_err = |message: String| EnumerateError::Io {
            path: path.to_string(),
            message,
        };

        let pattern = if has_meta(path) {
            path.trim_start_matches("./").to_string()
        } else {
            let meta = std::fs::metadata(path).map_err(|e| io_err(e.to_string()))?;
            if meta.is_file() {
                return Ok(vec![path.to_string()]);
            }
            format!("{}/**/*.tfstate", path.trim_end_matches('/'))
        };

        let prefix = literal_prefix(&pattern);
        let root = if prefix.is_empty() { "." } else { prefix.as_str() };
        let glob = Glob::new(&pattern);

        let mut matches = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| io_err(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let candidate = normalize_path(entry.path());
            if glob.is_match(&candidate) {
                matches.push(candidate);
            }
        }
        Ok(matches)
    }
}

fn normalize_path(path: &Path) -> String {
    let s = path.to_string_lossy().replace('\\', "/");
    match s.strip_prefix("./") {
        Some(rest) => rest.to_string(),
        None => s,
    }
}

#[async_trait]
impl StateEnumerator for FileEnumerator {
    fn origin(&self) -> &str {
        &self.path
    }

    async fn enumerate(&self, cancel: &CancellationToken) -> Result<Vec<String>, EnumerateError> {
        if cancel.is_cancelled() {
            return Err(EnumerateError::Cancelled);
        }

        let path = self.path.clone();
        let matches = tokio::task::spawn_blocking(move || Self::resolve(&path))
            .await
            .map_err(|e| EnumerateError::Io {
                path: self.path.clone(),
                message: e.to_string(),
            })??;

        if matches.is_empty() {
            return Err(EnumerateError::NoStateFound {
                path: self.path.clone(),
            });
        }
        Ok(matches)
    }
}
