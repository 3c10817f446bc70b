use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::repository::{
    NetworkRepository, PostgresqlRepository, ResourcesRepository, StorageRepository,
};
use crate::enumeration::{Enumeration, Enumerator, ListingError, RepositoryError};
use crate::resource::azurerm::{
    AZURERM_POSTGRESQL_DATABASE, AZURERM_RESOURCE_GROUP, AZURERM_ROUTE, AZURERM_STORAGE_ACCOUNT,
};
use crate::resource::{Attributes, ResourceFactory, ResourceType};

pub struct StorageAccountEnumerator {
    repository: Arc<dyn StorageRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl StorageAccountEnumerator {
    pub fn new(repository: Arc<dyn StorageRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self {
            repository,
            factory,
        }
    }
}

#[async_trait]
impl Enumerator for StorageAccountEnumerator {
    fn supported_type(&self) -> ResourceType {
        ResourceType::from(AZURERM_STORAGE_ACCOUNT)
    }

    async fn enumerate(&self, cancel: &CancellationToken) -> Result<Enumeration, ListingError> {
        let accounts = self
            .repository
            .list_all_storage_accounts(cancel)
            .await
            .map_err(|err| ListingError::new(self.supported_type(), err))?;

        let mut results = Enumeration::with_capacity(accounts.len());
        for account in accounts {
            results.push(self.factory.create_abstract_resource(
                AZURERM_STORAGE_ACCOUNT,
                &account.id,
                Attributes::new(),
            ));
        }
        Ok(results)
    }
}

pub struct ResourceGroupEnumerator {
    repository: Arc<dyn ResourcesRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl ResourceGroupEnumerator {
    pub fn new(
        repository: Arc<dyn ResourcesRepository>,
        factory: Arc<dyn ResourceFactory>,
    ) -> Self {
        Self {
            repository,
            factory,
        }
    }
}

#[async_trait]
impl Enumerator for ResourceGroupEnumerator {
    fn supported_type(&self) -> ResourceType {
        ResourceType::from(AZURERM_RESOURCE_GROUP)
    }

    async fn enumerate(&self, cancel: &CancellationToken) -> Result<Enumeration, ListingError> {
        let groups = self
            .repository
            .list_all_resource_groups(cancel)
            .await
            .map_err(|err| ListingError::new(self.supported_type(), err))?;

        let mut results = Enumeration::with_capacity(groups.len());
        for group in groups {
            results.push(self.factory.create_abstract_resource(
                AZURERM_RESOURCE_GROUP,
                &group.id,
                Attributes::from_iter([("name", group.name)]),
            ));
        }
        Ok(results)
    }
}

pub struct RouteEnumerator {
    repository: Arc<dyn NetworkRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl RouteEnumerator {
    pub fn new(repository: Arc<dyn NetworkRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self {
            repository,
            factory,
        }
    }
}

#[async_trait]
impl Enumerator for RouteEnumerator {
    fn supported_type(&self) -> ResourceType {
        ResourceType::from(AZURERM_ROUTE)
    }

    async fn enumerate(&self, cancel: &CancellationToken) -> Result<Enumeration, ListingError> {
        let tables = self
            .repository
            .list_all_route_tables(cancel)
            .await
            .map_err(|err| ListingError::new(self.supported_type(), err))?;

        let mut results = Enumeration::default();
        for table in &tables {
            for route in &table.routes {
                results.push(self.factory.create_abstract_resource(
                    AZURERM_ROUTE,
                    &route.id,
                    Attributes::from_iter([
                        ("name", route.name.as_str()),
                        ("route_table_name", table.name.as_str()),
                    ]),
                ));
            }
        }
        Ok(results)
    }
}

/// Databases are listed per server; one failing server fails the whole type.
pub struct PostgresqlDatabaseEnumerator {
    repository: Arc<dyn PostgresqlRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl PostgresqlDatabaseEnumerator {
    pub fn new(
        repository: Arc<dyn PostgresqlRepository>,
        factory: Arc<dyn ResourceFactory>,
    ) -> Self {
        Self {
            repository,
            factory,
        }
    }
}

#[async_trait]
impl Enumerator for PostgresqlDatabaseEnumerator {
    fn supported_type(&self) -> ResourceType {
        ResourceType::from(AZURERM_POSTGRESQL_DATABASE)
    }

    async fn enumerate(&self, cancel: &CancellationToken) -> Result<Enumeration, ListingError> {
        let to_listing = |err| ListingError::new(self.supported_type(), err);

        let servers = self
            .repository
            .list_all_servers(cancel)
            .await
            .map_err(to_listing)?;

        let mut results = Enumeration::default();
        for server in &servers {
            if cancel.is_cancelled() {
                return Err(to_listing(RepositoryError::Cancelled));
            }
            let databases = self
                .repository
                .list_all_databases_by_server(server, cancel)
                .await
                .map_err(to_listing)?;

            for db in databases {
                results.push(self.factory.create_abstract_resource(
                    AZURERM_POSTGRESQL_DATABASE,
                    &db.id,
                    Attributes::from_iter([("name", db.name)]),
                ));
            }
        }
        Ok(results)
    }
}
