//! GitHub resource types.

use indexmap::IndexMap;

use super::SchemaRepository;

pub const GITHUB_REPOSITORY: &str = "github_repository";
pub const GITHUB_TEAM: &str = "github_team";
pub const GITHUB_MEMBERSHIP: &str = "github_membership";

pub fn init_metadata(repository: &mut SchemaRepository) {
    repository.set_normalize_func(GITHUB_REPOSITORY, |res| {
        res.attributes.safe_delete(&["auto_init"]);
        res.attributes.safe_delete(&["etag"]);
    });

    repository.set_human_readable_attributes_func(GITHUB_TEAM, |res| {
        let mut attrs = IndexMap::new();
        if let Some(name) = res.attributes.get_str("name") {
            attrs.insert("Name".to_string(), name.to_string());
        }
        attrs
    });
}
