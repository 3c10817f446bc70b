//! Azure resource types and their display metadata.

use indexmap::IndexMap;

use super::SchemaRepository;

pub const AZURERM_STORAGE_ACCOUNT: &str = "azurerm_storage_account";
pub const AZURERM_RESOURCE_GROUP: &str = "azurerm_resource_group";
pub const AZURERM_ROUTE: &str = "azurerm_route";
pub const AZURERM_POSTGRESQL_DATABASE: &str = "azurerm_postgresql_database";

pub fn init_metadata(repository: &mut SchemaRepository) {
    repository.set_human_readable_attributes_func(AZURERM_ROUTE, |res| {
        let mut attrs = IndexMap::new();
        if let Some(name) = res.attributes.get_str("name").filter(|v| !v.is_empty()) {
            attrs.insert("Name".to_string(), name.to_string());
        }
        if let Some(table) = res.attributes.get_str("route_table_name").filter(|v| !v.is_empty()) {
            attrs.insert("Table".to_string(), table.to_string());
        }
        attrs
    });

    repository.set_human_readable_attributes_func(AZURERM_POSTGRESQL_DATABASE, |res| {
        let mut attrs = IndexMap::new();
        if let Some(name) = res.attributes.get_str("name").filter(|v| !v.is_empty()) {
            attrs.insert("Name".to_string(), name.to_string());
        }
        attrs
    });

    repository.set_human_readable_attributes_func(AZURERM_RESOURCE_GROUP, |res| {
        let mut attrs = IndexMap::new();
        if let Some(name) = res.attributes.get_str("name").filter(|v| !v.is_empty()) {
            attrs.insert("Name".to_string(), name.to_string());
        }
        attrs
    });
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::resource::{Attributes, DriftscopeResourceFactory, ResourceFactory};

    #[test]
    fn test_route_display_skips_empty_fields() {
        let mut repository = SchemaRepository::new();
        init_metadata(&mut repository);
        let factory = DriftscopeResourceFactory::new(Arc::new(repository));

        let res = factory.create_abstract_resource(
            AZURERM_ROUTE,
            "/subscriptions/s/routeTables/t/routes/r",
            Attributes::from_iter([("name", "r"), ("route_table_name", "")]),
        );
        let attrs = res.human_readable_attributes();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs["Name"], "r");
    }
}
