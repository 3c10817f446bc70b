//! Read-only AWS API seams. Concrete implementations wrap the AWS SDK and live
//! outside this crate; [`CachedApiGatewayRepository`] shows the caching contract.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::cache::RunCache;
use crate::enumeration::RepositoryError;

#[derive(Debug, Clone, PartialEq)]
pub struct Ec2Instance {
    pub instance_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EcrRepositoryInfo {
    pub repository_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpApi {
    pub api_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RestApi {
    pub id: String,
    pub name: String,
    pub policy: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnsTopic {
    pub topic_arn: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KmsAlias {
    pub alias_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DbSubnetGroup {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledAction {
    pub scheduled_action_name: String,
    pub service_namespace: String,
    pub resource_id: String,
}

#[async_trait]
pub trait Ec2Repository: Send + Sync {
    async fn list_all_instances(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<Ec2Instance>, RepositoryError>;
}

#[async_trait]
pub trait EcrRepository: Send + Sync {
    async fn list_all_repositories(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<EcrRepositoryInfo>, RepositoryError>;
}

#[async_trait]
pub trait ApiGatewayV2Repository: Send + Sync {
    async fn list_all_apis(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<HttpApi>, RepositoryError>;
}

#[async_trait]
pub trait ApiGatewayRepository: Send + Sync {
    async fn list_all_rest_apis(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Arc<Vec<RestApi>>, RepositoryError>;
}

#[async_trait]
pub trait SnsRepository: Send + Sync {
    async fn list_all_topics(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<SnsTopic>, RepositoryError>;
}

#[async_trait]
pub trait S3Repository: Send + Sync {
    async fn list_all_buckets(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<S3Bucket>, RepositoryError>;
}

#[async_trait]
pub trait KmsRepository: Send + Sync {
    async fn list_all_aliases(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<KmsAlias>, RepositoryError>;
}

#[async_trait]
pub trait RdsRepository: Send + Sync {
    async fn list_all_db_subnet_groups(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<DbSubnetGroup>, RepositoryError>;
}

#[async_trait]
pub trait AppAutoScalingRepository: Send + Sync {
    /// Every service namespace the scheduled-action listing is scoped by.
    fn service_namespace_values(&self) -> Vec<String>;

    /// All scheduled actions of one namespace, every page drained.
    async fn describe_scheduled_actions(
        &self,
        namespace: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<ScheduledAction>, RepositoryError>;
}

/// Raw API Gateway listing, one call per run regardless of how many enumerators ask.
pub struct CachedApiGatewayRepository<C> {
    client: C,
    cache: Arc<RunCache>,
}

impl<C> CachedApiGatewayRepository<C> {
    pub fn new(client: C, cache: Arc<RunCache>) -> Self {
        Self { client, cache }
    }
}

/// Uncached SDK call the cached repository delegates to.
#[async_trait]
pub trait ApiGatewayClient: Send + Sync {
    async fn get_rest_apis(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<RestApi>, RepositoryError>;
}

#[async_trait]
impl<C: ApiGatewayClient> ApiGatewayRepository for CachedApiGatewayRepository<C> {
    async fn list_all_rest_apis(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Arc<Vec<RestApi>>, RepositoryError> {
        self.cache
            .get_or_try_init("apigateway.rest_apis", || self.client.get_rest_apis(cancel))
            .await
    }
}

/// Every AWS repository one activation needs.
#[derive(Clone)]
pub struct AwsRepositories {
    pub ec2: Arc<dyn Ec2Repository>,
    pub ecr: Arc<dyn EcrRepository>,
    pub apigateway: Arc<dyn ApiGatewayRepository>,
    pub apigatewayv2: Arc<dyn ApiGatewayV2Repository>,
    pub sns: Arc<dyn SnsRepository>,
    pub s3: Arc<dyn S3Repository>,
    pub kms: Arc<dyn KmsRepository>,
    pub rds: Arc<dyn RdsRepository>,
    pub appautoscaling: Arc<dyn AppAutoScalingRepository>,
}
