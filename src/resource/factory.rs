use std::sync::Arc;

use super::{Attributes, Resource, ResourceType, SchemaRepository};

/// Sole constructor of [`Resource`] values.
///
/// Enumerators, state readers and middleware go through a factory so every
/// resource gets the same default-attribute sanitizing and schema linkage.
pub trait ResourceFactory: Send + Sync {
    fn create_abstract_resource(
        &self,
        resource_type: &str,
        id: &str,
        attributes: Attributes,
    ) -> Resource;
}

#[derive(Debug, Clone)]
pub struct DriftscopeResourceFactory {
    schemas: Arc<SchemaRepository>,
}

impl DriftscopeResourceFactory {
    pub fn new(schemas: Arc<SchemaRepository>) -> Self {
        Self { schemas }
    }

    pub fn schemas(&self) -> &Arc<SchemaRepository> {
        &self.schemas
    }
}

impl ResourceFactory for DriftscopeResourceFactory {
    fn create_abstract_resource(
        &self,
        resource_type: &str,
        id: &str,
        mut attributes: Attributes,
    ) -> Resource {
        attributes.sanitize_defaults();
        Resource::new(
            ResourceType::from(resource_type),
            id.to_string(),
            attributes,
            self.schemas.get(resource_type),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_factory_links_schema_when_known() {
        let factory = DriftscopeResourceFactory::new(Arc::new(SchemaRepository::with_builtin_metadata()));
        let known = factory.create_abstract_resource("aws_s3_bucket", "b", Attributes::new());
        let unknown = factory.create_abstract_resource("made_up_type", "x", Attributes::new());
        assert!(known.schema().is_some());
        assert!(unknown.schema().is_none());
    }

    #[test]
    fn test_factory_sanitizes_null_defaults() {
        let factory = DriftscopeResourceFactory::new(Arc::new(SchemaRepository::new()));
        let resource = factory.create_abstract_resource(
            "aws_instance",
            "i-123",
            Attributes::from_iter([("ami", json!("ami-1")), ("key_name", json!(null))]),
        );
        assert_eq!(resource.id(), "i-123");
        assert_eq!(resource.resource_type(), &"aws_instance");
        assert_eq!(resource.attributes.len(), 1);
    }
}
