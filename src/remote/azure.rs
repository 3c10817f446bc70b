mod enumerators;
pub mod repository;

use std::sync::Arc;

use enumerators::{
    PostgresqlDatabaseEnumerator, ResourceGroupEnumerator, RouteEnumerator,
    StorageAccountEnumerator,
};
pub use repository::AzureRepositories;

use crate::enumeration::EnumeratorLibrary;
use crate::resource::ResourceFactory;

pub const REMOTE_NAME: &str = "azure+tf";

pub fn init(
    repositories: &AzureRepositories,
    factory: &Arc<dyn ResourceFactory>,
    library: &mut EnumeratorLibrary,
) {
    let r = repositories.clone();

    library.add_enumerator(StorageAccountEnumerator::new(r.storage, Arc::clone(factory)));
    library.add_enumerator(ResourceGroupEnumerator::new(r.resources, Arc::clone(factory)));
    library.add_enumerator(RouteEnumerator::new(r.network, Arc::clone(factory)));
    library.add_enumerator(PostgresqlDatabaseEnumerator::new(
        r.postgresql,
        Arc::clone(factory),
    ));

    tracing::debug!(remote = REMOTE_NAME, types = library.len(), "remote activated");
}
