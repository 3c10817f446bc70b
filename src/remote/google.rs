mod enumerators;
pub mod repository;

use std::sync::Arc;

use enumerators::{ALL_KINDS, AssetEnumerator};
pub use enumerators::trim_resource_name;
pub use repository::{
    Asset, AssetPage, AssetRepository, AssetSearchClient, CachedAssetRepository,
};

use crate::enumeration::EnumeratorLibrary;
use crate::resource::ResourceFactory;

pub const REMOTE_NAME: &str = "gcp+tf";

/// Registers one asset-backed enumerator per supported Google resource type.
pub fn init(
    repository: &Arc<dyn AssetRepository>,
    factory: &Arc<dyn ResourceFactory>,
    library: &mut EnumeratorLibrary,
) {
    for kind in ALL_KINDS {
        library.add_enumerator(AssetEnumerator::new(
            kind,
            Arc::clone(repository),
            Arc::clone(factory),
        ));
    }
    tracing::debug!(remote = REMOTE_NAME, types = library.len(), "remote activated");
}
