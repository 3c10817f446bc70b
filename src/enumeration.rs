pub mod runner;

pub use runner::{LiveInventory, ScanOptions, enumerate_all};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::resource::{Resource, ResourceType};

/// Error surfaced by a provider repository (the cloud SDK seam).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("access denied: {message}")]
    AccessDenied { message: String },

    #[error("{service} API error: {message}")]
    Api { service: String, message: String },

    #[error("request cancelled")]
    Cancelled,
}

impl RepositoryError {
    pub fn api(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            service: service.into(),
            message: message.into(),
        }
    }
}

/// A whole resource type failed to enumerate.
#[derive(Debug, Error)]
#[error("unable to list {resource_type}: {source}")]
pub struct ListingError {
    pub resource_type: ResourceType,
    #[source]
    pub source: RepositoryError,
}

impl ListingError {
    pub fn new(resource_type: ResourceType, source: RepositoryError) -> Self {
        Self {
            resource_type,
            source,
        }
    }
}

/// An item dropped during enumeration because its identifier could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    pub resource_type: ResourceType,
    pub name: String,
    pub reason: String,
}

/// Resources produced by one enumerator plus the items it had to drop.
#[derive(Debug, Default, PartialEq)]
pub struct Enumeration {
    pub resources: Vec<Resource>,
    pub skipped: Vec<SkippedItem>,
}

impl Enumeration {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            resources: Vec::with_capacity(capacity),
            skipped: Vec::new(),
        }
    }

    pub fn push(&mut self, resource: Resource) {
        self.resources.push(resource);
    }

    /// Records a dropped item and logs it; sibling items are unaffected.
    pub fn skip(
        &mut self,
        resource_type: ResourceType,
        name: impl Into<String>,
        reason: impl Into<String>,
    ) {
        let item = SkippedItem {
            resource_type,
            name: name.into(),
            reason: reason.into(),
        };
        tracing::warn!(
            resource_type = %item.resource_type,
            name = %item.name,
            reason = %item.reason,
            "skipping item"
        );
        self.skipped.push(item);
    }
}

/// Producer of every live instance of exactly one resource type.
#[async_trait]
pub trait Enumerator: Send + Sync {
    fn supported_type(&self) -> ResourceType;

    async fn enumerate(&self, cancel: &CancellationToken) -> Result<Enumeration, ListingError>;
}

/// Enumerators registered by activated remotes.
#[derive(Default)]
pub struct EnumeratorLibrary {
    enumerators: Vec<Arc<dyn Enumerator>>,
}

impl EnumeratorLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_enumerator(&mut self, enumerator: impl Enumerator + 'static) {
        self.enumerators.push(Arc::new(enumerator));
    }

    pub fn enumerators(&self) -> &[Arc<dyn Enumerator>] {
        &self.enumerators
    }

    pub fn supported_types(&self) -> Vec<ResourceType> {
        self.enumerators.iter().map(|e| e.supported_type()).collect()
    }

    pub fn len(&self) -> usize {
        self.enumerators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enumerators.is_empty()
    }
}

impl std::fmt::Debug for EnumeratorLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnumeratorLibrary")
            .field("types", &self.supported_types())
            .finish()
    }
}

/// Shared counter of completed enumerators.
#[derive(Debug, Default)]
pub struct Progress {
    done: AtomicUsize,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc(&self) {
        self.done.fetch_add(1, Ordering::Relaxed);
    }

    pub fn value(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }
}

/// Splits a slash-delimited provider identifier, requiring an exact segment count.
pub fn split_exact(name: &str, expected: usize) -> Result<Vec<&str>, String> {
    let segments: Vec<&str> = name.split('/').collect();
    if segments.len() != expected {
        return Err(format!(
            "expected {expected} path segments, found {}",
            segments.len()
        ));
    }
    Ok(segments)
}
