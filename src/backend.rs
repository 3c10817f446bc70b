pub mod file;
pub mod gcs;
pub mod http;
pub mod object_store;
pub mod tfcloud;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

pub use file::FileReader;
pub use gcs::GcsClient;
pub use http::HttpReader;
pub use object_store::{
    ListRequest, ObjectPage, ObjectStore, ObjectStoreError, ObjectStoreReader, ObjectSummary,
};
pub use tfcloud::{DEFAULT_TFC_ENDPOINT, TfCloudReader};

use crate::config::SupplierConfig;
use crate::state::{FileEnumerator, ObjectStoreEnumerator, StateEnumerator};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Unsupported backend '{0}'")]
    Unsupported(String),

    #[error("no {backend} client configured")]
    MissingClient { backend: BackendKind },

    #[error("Unable to parse {label} path: {path}. Must be BUCKET_NAME/PATH/TO/OBJECT")]
    InvalidPath { label: &'static str, path: String },

    #[error("invalid header '{name}'")]
    InvalidHeader { name: String },

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("error requesting terraform cloud backend state: {0}")]
    TfCloud(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error(transparent)]
    ObjectStore(#[from] ObjectStoreError),

    #[error("unable to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("read cancelled")]
    Cancelled,
}

/// Where a declared-state document is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    File,
    S3,
    Http,
    Https,
    TfCloud,
    Gs,
    AzureRm,
}

impl BackendKind {
    pub const ALL: [BackendKind; 7] = [
        Self::File,
        Self::S3,
        Self::Http,
        Self::Https,
        Self::TfCloud,
        Self::Gs,
        Self::AzureRm,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::File => "",
            Self::S3 => "s3",
            Self::Http => "http",
            Self::Https => "https",
            Self::TfCloud => "tfcloud",
            Self::Gs => "gs",
            Self::AzureRm => "azurerm",
        }
    }

    /// Name used in user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::S3 => "S3",
            Self::Http => "HTTP",
            Self::Https => "HTTPS",
            Self::TfCloud => "Terraform Cloud",
            Self::Gs => "GCS",
            Self::AzureRm => "Azure",
        }
    }

    /// Backend keys a user can name explicitly; the file backend is the implicit default.
    pub fn supported_backends() -> Vec<&'static str> {
        Self::ALL[1..].iter().map(|k| k.key()).collect()
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BackendKind {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key() == s)
            .ok_or_else(|| BackendError::Unsupported(s.to_string()))
    }
}

/// Per-run settings the backends draw from.
#[derive(Debug, Clone)]
pub struct Options {
    pub headers: IndexMap<String, String>,
    pub tfc_token: Option<String>,
    pub tfc_endpoint: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            headers: IndexMap::new(),
            tfc_token: None,
            tfc_endpoint: DEFAULT_TFC_ENDPOINT.to_string(),
        }
    }
}

/// Source of one declared-state document.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn read(&self, cancel: &CancellationToken) -> Result<Vec<u8>, BackendError>;
}

/// Object-store clients the caller supplies; GCS can also be built from a token.
#[derive(Clone, Default)]
pub struct ObjectStores {
    pub s3: Option<Arc<dyn ObjectStore>>,
    pub gs: Option<Arc<dyn ObjectStore>>,
    pub azurerm: Option<Arc<dyn ObjectStore>>,
}

impl ObjectStores {
    fn for_kind(&self, kind: BackendKind) -> Result<Arc<dyn ObjectStore>, BackendError> {
        let store = match kind {
            BackendKind::S3 => self.s3.as_ref(),
            BackendKind::Gs => self.gs.as_ref(),
            BackendKind::AzureRm => self.azurerm.as_ref(),
            _ => None,
        };
        store
            .cloned()
            .ok_or(BackendError::MissingClient { backend: kind })
    }
}

/// Builds readers and path enumerators for a [`SupplierConfig`].
pub struct BackendRegistry {
    stores: ObjectStores,
    http: reqwest::Client,
}

impl BackendRegistry {
    pub fn new(stores: ObjectStores) -> Self {
        Self {
            stores,
            http: reqwest::Client::new(),
        }
    }

    pub fn get_backend(
        &self,
        config: &SupplierConfig,
        options: &Options,
    ) -> Result<Box<dyn Backend>, BackendError> {
        let kind = config.backend;
        let path = config.path.as_str();

        let backend: Box<dyn Backend> = match kind {
            BackendKind::File => Box::new(FileReader::new(path)),
            BackendKind::Http | BackendKind::Https => Box::new(HttpReader::new(
                self.http.clone(),
                format!("{}://{}", kind.key(), path),
                &options.headers,
            )?),
            BackendKind::TfCloud => Box::new(TfCloudReader::new(
                self.http.clone(),
                path,
                &options.tfc_endpoint,
                options.tfc_token.clone(),
            )),
            BackendKind::S3 | BackendKind::Gs | BackendKind::AzureRm => Box::new(
                ObjectStoreReader::new(self.stores.for_kind(kind)?, kind.label(), path),
            ),
        };
        Ok(backend)
    }

    /// Returns `None` when `config.path` already names exactly one document.
    pub fn get_enumerator(
        &self,
        config: &SupplierConfig,
    ) -> Result<Option<Box<dyn StateEnumerator>>, BackendError> {
        let kind = config.backend;
        let enumerator: Box<dyn StateEnumerator> = match kind {
            BackendKind::File => Box::new(FileEnumerator::new(&config.path)),
            BackendKind::S3 | BackendKind::Gs | BackendKind::AzureRm => {
                Box::new(ObjectStoreEnumerator::new(
                    self.stores.for_kind(kind)?,
                    kind.label(),
                    &config.path,
                ))
            }
            BackendKind::Http | BackendKind::Https | BackendKind::TfCloud => return Ok(None),
        };
        Ok(Some(enumerator))
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new(ObjectStores::default())
    }
}
