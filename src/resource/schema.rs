use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;

use super::{Resource, ResourceType};

pub type NormalizeFn = Arc<dyn Fn(&mut Resource) + Send + Sync>;
pub type HumanReadableFn = Arc<dyn Fn(&Resource) -> IndexMap<String, String> + Send + Sync>;

/// Per-attribute rule consulted during normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeSchema {
    /// The attribute holds an embedded JSON document that must be canonicalized.
    pub json_string: bool,
}

#[derive(Clone, Default)]
pub struct ResourceSchema {
    attributes: HashMap<String, AttributeSchema>,
    normalize: Option<NormalizeFn>,
    human_readable: Option<HumanReadableFn>,
}

impl ResourceSchema {
    pub fn attributes(&self) -> impl Iterator<Item = (&String, &AttributeSchema)> {
        self.attributes.iter()
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeSchema> {
        self.attributes.get(name)
    }

    pub fn normalize_func(&self) -> Option<&(dyn Fn(&mut Resource) + Send + Sync)> {
        self.normalize.as_deref()
    }

    pub fn human_readable_func(
        &self,
    ) -> Option<&(dyn Fn(&Resource) -> IndexMap<String, String> + Send + Sync)> {
        self.human_readable.as_deref()
    }
}

impl std::fmt::Debug for ResourceSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceSchema")
            .field("attributes", &self.attributes)
            .field("normalize", &self.normalize.is_some())
            .field("human_readable", &self.human_readable.is_some())
            .finish()
    }
}

/// Per-type normalize and display functions, populated when providers initialize.
///
/// The repository is filled mutably at startup, then frozen behind an `Arc` and
/// shared with the resource factory; each created resource links its type's schema.
#[derive(Debug, Default)]
pub struct SchemaRepository {
    schemas: HashMap<ResourceType, Arc<ResourceSchema>>,
}

impl SchemaRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository populated with every built-in provider's metadata.
    pub fn with_builtin_metadata() -> Self {
        let mut repository = Self::new();
        super::aws::init_metadata(&mut repository);
        super::google::init_metadata(&mut repository);
        super::azurerm::init_metadata(&mut repository);
        super::github::init_metadata(&mut repository);
        repository
    }

    pub fn get(&self, resource_type: &str) -> Option<Arc<ResourceSchema>> {
        self.schemas.get(&ResourceType::from(resource_type)).cloned()
    }

    pub fn set_normalize_func<F>(&mut self, resource_type: &str, func: F)
    where
        F: Fn(&mut Resource) + Send + Sync + 'static,
    {
        self.entry(resource_type).normalize = Some(Arc::new(func));
    }

    pub fn set_human_readable_attributes_func<F>(&mut self, resource_type: &str, func: F)
    where
        F: Fn(&Resource) -> IndexMap<String, String> + Send + Sync + 'static,
    {
        self.entry(resource_type).human_readable = Some(Arc::new(func));
    }

    /// Applies one mutation per attribute name to the type's attribute schemas.
    pub fn update_schema(
        &mut self,
        resource_type: &str,
        rules: &[(&str, fn(&mut AttributeSchema))],
    ) {
        let schema = self.entry(resource_type);
        for (name, rule) in rules {
            rule(schema.attributes.entry((*name).to_string()).or_default());
        }
    }

    fn entry(&mut self, resource_type: &str) -> &mut ResourceSchema {
        let schema = self
            .schemas
            .entry(ResourceType::from(resource_type))
            .or_default();
        Arc::make_mut(schema)
    }
}

/// Schema rule marking an attribute as an embedded JSON document.
pub fn json_string(attribute: &mut AttributeSchema) {
    attribute.json_string = true;
}
