//! Terraform state parser.
//!
//! Parses tfstate v4 documents into factory-built resources.

use serde::Deserialize;
use thiserror::Error;

use crate::resource::{Attributes, Resource, ResourceFactory};

pub const SUPPORTED_STATE_VERSION: u64 = 4;

#[derive(Debug, Error)]
pub enum StateReadError {
    #[error("invalid state document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported state format version {0}, expected 4")]
    UnsupportedVersion(u64),
}

/// Turns one declared-state document into resources.
pub trait StateReader: Send + Sync {
    fn read_document(
        &self,
        source: &str,
        bytes: &[u8],
        factory: &dyn ResourceFactory,
    ) -> Result<Vec<Resource>, StateReadError>;
}

#[derive(Debug, Deserialize)]
struct StateFile {
    version: u64,
    #[serde(default)]
    resources: Vec<StateResource>,
}

#[derive(Debug, Deserialize)]
struct StateResource {
    mode: String,
    #[serde(rename = "type")]
    resource_type: String,
    name: String,
    #[serde(default)]
    instances: Vec<StateInstance>,
}

#[derive(Debug, Deserialize)]
struct StateInstance {
    #[serde(default)]
    attributes: serde_json::Map<String, serde_json::Value>,
}

/// Reads managed resources out of a format-version-4 state file.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerraformStateReader;

impl StateReader for TerraformStateReader {
    fn read_document(
        &self,
        source: &str,
        bytes: &[u8],
        factory: &dyn ResourceFactory,
    ) -> Result<Vec<Resource>, StateReadError> {
        let state: StateFile = serde_json::from_slice(bytes)?;
        if state.version != SUPPORTED_STATE_VERSION {
            return Err(StateReadError::UnsupportedVersion(state.version));
        }

        let mut resources = Vec::new();
        for res in state.resources.into_iter().filter(|r| r.mode == "managed") {
            for instance in res.instances {
                let Some(id) = instance
                    .attributes
                    .get("id")
                    .and_then(|v| v.as_str())
                    .map(String::from)
                else {
                    tracing::warn!(
                        source,
                        resource_type = %res.resource_type,
                        name = %res.name,
                        "skipping state instance without id"
                    );
                    continue;
                };
                resources.push(factory.create_abstract_resource(
                    &res.resource_type,
                    &id,
                    Attributes::from(instance.attributes),
                ));
            }
        }

        tracing::debug!(source, count = resources.len(), "read state document");
        Ok(resources)
    }
}
