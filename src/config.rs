use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::backend::{BackendError, BackendKind};

pub const SUPPORTED_SOURCES: &[&str] = &["tfstate"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to parse state source '{0}', expected <source>[+<backend>]://<path>")]
    InvalidFormat(String),

    #[error("Unsupported IaC source '{0}'")]
    UnsupportedSource(String),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("invalid header '{0}', expected KEY=VALUE")]
    InvalidHeader(String),
}

/// One declared-state source, e.g. `tfstate+s3://bucket/env/**/*.tfstate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierConfig {
    pub key: String,
    pub backend: BackendKind,
    pub path: String,
}

impl SupplierConfig {
    pub fn with_path(&self, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..self.clone()
        }
    }
}

impl FromStr for SupplierConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (scheme, path) = s
            .split_once("://")
            .filter(|(_, path)| !path.is_empty())
            .ok_or_else(|| ConfigError::InvalidFormat(s.to_string()))?;

        let (key, backend) = scheme.split_once('+').unwrap_or((scheme, ""));
        if !SUPPORTED_SOURCES.contains(&key) {
            return Err(ConfigError::UnsupportedSource(key.to_string()));
        }

        Ok(Self {
            key: key.to_string(),
            backend: backend.parse()?,
            path: path.to_string(),
        })
    }
}

impl fmt::Display for SupplierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.backend {
            BackendKind::File => write!(f, "{}://{}", self.key, self.path),
            other => write!(f, "{}+{}://{}", self.key, other.key(), self.path),
        }
    }
}

/// Parses a `KEY=VALUE` header flag.
pub fn parse_header(raw: &str) -> Result<(String, String), ConfigError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(ConfigError::InvalidHeader(raw.to_string())),
    }
}
