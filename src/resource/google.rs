//! Google Cloud resource types and their display metadata.

use indexmap::IndexMap;

use super::{Resource, SchemaRepository};

pub const GOOGLE_COMPUTE_FIREWALL: &str = "google_compute_firewall";
pub const GOOGLE_COMPUTE_INSTANCE_GROUP: &str = "google_compute_instance_group";
pub const GOOGLE_COMPUTE_IMAGE: &str = "google_compute_image";
pub const GOOGLE_STORAGE_BUCKET: &str = "google_storage_bucket";
pub const GOOGLE_BIGQUERY_DATASET: &str = "google_bigquery_dataset";
pub const GOOGLE_BIGQUERY_TABLE: &str = "google_bigquery_table";

pub fn init_metadata(repository: &mut SchemaRepository) {
    repository.set_human_readable_attributes_func(GOOGLE_BIGQUERY_DATASET, |res| {
        let mut attrs = IndexMap::new();
        if let Some(name) = res.attributes.get_str("friendly_name") {
            attrs.insert("name".to_string(), name.to_string());
        }
        attrs
    });

    repository.set_human_readable_attributes_func(GOOGLE_COMPUTE_FIREWALL, name_and_project);
    repository.set_human_readable_attributes_func(GOOGLE_COMPUTE_INSTANCE_GROUP, name_and_project);
}

fn name_and_project(res: &Resource) -> IndexMap<String, String> {
    let mut attrs = IndexMap::new();
    if let Some(name) = res.attributes.get_str("name").filter(|v| !v.is_empty()) {
        attrs.insert("Name".to_string(), name.to_string());
    }
    if let Some(project) = res.attributes.get_str("project").filter(|v| !v.is_empty()) {
        attrs.insert("Project".to_string(), project.to_string());
    }
    attrs
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::resource::{Attributes, DriftscopeResourceFactory, ResourceFactory};

    fn factory() -> DriftscopeResourceFactory {
        let mut repository = SchemaRepository::new();
        init_metadata(&mut repository);
        DriftscopeResourceFactory::new(Arc::new(repository))
    }

    #[test]
    fn test_bigquery_dataset_display_uses_friendly_name() {
        let res = factory().create_abstract_resource(
            GOOGLE_BIGQUERY_DATASET,
            "projects/p/datasets/d",
            Attributes::from_iter([("friendly_name", "Sales")]),
        );
        let attrs = res.human_readable_attributes();
        assert_eq!(attrs.get("name").map(String::as_str), Some("Sales"));
    }

    #[test]
    fn test_bigquery_dataset_display_tolerates_missing_name() {
        let res = factory().create_abstract_resource(
            GOOGLE_BIGQUERY_DATASET,
            "projects/p/datasets/d",
            Attributes::new(),
        );
        assert!(res.human_readable_attributes().is_empty());
    }

    #[test]
    fn test_firewall_display_order() {
        let res = factory().create_abstract_resource(
            GOOGLE_COMPUTE_FIREWALL,
            "projects/p/global/firewalls/fw",
            Attributes::from_iter([("project", "p"), ("name", "fw")]),
        );
        let keys: Vec<_> = res.human_readable_attributes().into_keys().collect();
        assert_eq!(keys, vec!["Name", "Project"]);
    }
}
