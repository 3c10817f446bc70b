mod attributes;
pub mod aws;
pub mod azurerm;
pub mod factory;
pub mod github;
pub mod google;
mod json;
pub mod schema;

pub use attributes::Attributes;
pub use factory::{DriftscopeResourceFactory, ResourceFactory};
pub use json::normalize_json_string;
pub use schema::{AttributeSchema, ResourceSchema, SchemaRepository};

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;

/// Dispatch tag for a resource, e.g. `aws_s3_bucket`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ResourceType(String);

impl ResourceType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceType {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl PartialEq<str> for ResourceType {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ResourceType {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One cloud object, either enumerated from a provider or read from declared state.
///
/// Type and id are fixed at creation; only the attributes are mutable, and only
/// middleware and normalization are expected to touch them.
#[derive(Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Resource {
    resource_type: ResourceType,
    id: String,
    pub attributes: Attributes,
    #[serde(skip)]
    schema: Option<Arc<ResourceSchema>>,
}

impl Resource {
    pub(crate) fn new(
        resource_type: ResourceType,
        id: String,
        attributes: Attributes,
        schema: Option<Arc<ResourceSchema>>,
    ) -> Self {
        Self {
            resource_type,
            id,
            attributes,
            schema,
        }
    }

    pub fn resource_type(&self) -> &ResourceType {
        &self.resource_type
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn schema(&self) -> Option<&ResourceSchema> {
        self.schema.as_deref()
    }

    pub fn is(&self, resource_type: &str, id: &str) -> bool {
        self.resource_type == resource_type && self.id == id
    }

    /// Canonicalizes JSON-document attributes, then applies the type's normalize function.
    pub fn normalize(&mut self) {
        let Some(schema) = self.schema.clone() else {
            return;
        };

        for (name, attribute) in schema.attributes() {
            if !attribute.json_string {
                continue;
            }
            let Some(raw) = self.attributes.get_str(name) else {
                continue;
            };
            if let Ok(canonical) = normalize_json_string(raw) {
                self.attributes.insert(name.clone(), serde_json::Value::from(canonical));
            }
        }

        if let Some(normalize) = schema.normalize_func() {
            normalize(self);
        }
    }

    /// Small ordered display mapping, empty when the type registers no projection.
    pub fn human_readable_attributes(&self) -> IndexMap<String, String> {
        self.schema
            .as_ref()
            .and_then(|schema| schema.human_readable_func())
            .map(|project| project(self))
            .unwrap_or_default()
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.resource_type == other.resource_type
            && self.id == other.id
            && self.attributes == other.attributes
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("resource_type", &self.resource_type)
            .field("id", &self.id)
            .field("attributes", &self.attributes)
            .finish()
    }
}
