//! Read-only Azure Resource Manager seams.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::enumeration::RepositoryError;

#[derive(Debug, Clone, PartialEq)]
pub struct StorageAccount {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceGroup {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteTable {
    pub id: String,
    pub name: String,
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostgresqlServer {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostgresqlDatabase {
    pub id: String,
    pub name: String,
}

#[async_trait]
pub trait StorageRepository: Send + Sync {
    async fn list_all_storage_accounts(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<StorageAccount>, RepositoryError>;
}

#[async_trait]
pub trait ResourcesRepository: Send + Sync {
    async fn list_all_resource_groups(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<ResourceGroup>, RepositoryError>;
}

#[async_trait]
pub trait NetworkRepository: Send + Sync {
    /// Route tables with their routes inlined.
    async fn list_all_route_tables(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<RouteTable>, RepositoryError>;
}

#[async_trait]
pub trait PostgresqlRepository: Send + Sync {
    async fn list_all_servers(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<PostgresqlServer>, RepositoryError>;

    async fn list_all_databases_by_server(
        &self,
        server: &PostgresqlServer,
        cancel: &CancellationToken,
    ) -> Result<Vec<PostgresqlDatabase>, RepositoryError>;
}

#[derive(Clone)]
pub struct AzureRepositories {
    pub storage: Arc<dyn StorageRepository>,
    pub resources: Arc<dyn ResourcesRepository>,
    pub network: Arc<dyn NetworkRepository>,
    pub postgresql: Arc<dyn PostgresqlRepository>,
}
