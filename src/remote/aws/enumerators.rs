use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::repository::{
    ApiGatewayRepository, ApiGatewayV2Repository, AppAutoScalingRepository, Ec2Repository,
    EcrRepository, KmsRepository, RdsRepository, S3Repository, SnsRepository,
};
use crate::enumeration::{Enumeration, Enumerator, ListingError, RepositoryError};
use crate::resource::aws::{
    AWS_API_GATEWAY_REST_API, AWS_API_GATEWAY_REST_API_POLICY, AWS_APIGATEWAYV2_API,
    AWS_APPAUTOSCALING_SCHEDULED_ACTION, AWS_DB_SUBNET_GROUP, AWS_ECR_REPOSITORY, AWS_INSTANCE,
    AWS_KMS_ALIAS, AWS_S3_BUCKET, AWS_SNS_TOPIC,
};
use crate::resource::{Attributes, ResourceFactory, ResourceType};

fn listing_error(resource_type: &str) -> impl FnOnce(RepositoryError) -> ListingError {
    let resource_type = ResourceType::from(resource_type);
    move |err| ListingError::new(resource_type, err)
}

pub struct Ec2InstanceEnumerator {
    repository: Arc<dyn Ec2Repository>,
    factory: Arc<dyn ResourceFactory>,
}

impl Ec2InstanceEnumerator {
    pub fn new(repository: Arc<dyn Ec2Repository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self {
            repository,
            factory,
        }
    }
}

#[async_trait]
impl Enumerator for Ec2InstanceEnumerator {
    fn supported_type(&self) -> ResourceType {
        ResourceType::from(AWS_INSTANCE)
    }

    async fn enumerate(&self, cancel: &CancellationToken) -> Result<Enumeration, ListingError> {
        let instances = self
            .repository
            .list_all_instances(cancel)
            .await
            .map_err(listing_error(AWS_INSTANCE))?;

        let mut results = Enumeration::with_capacity(instances.len());
        for instance in instances {
            results.push(self.factory.create_abstract_resource(
                AWS_INSTANCE,
                &instance.instance_id,
                Attributes::new(),
            ));
        }
        Ok(results)
    }
}

pub struct EcrRepositoryEnumerator {
    repository: Arc<dyn EcrRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl EcrRepositoryEnumerator {
    pub fn new(repository: Arc<dyn EcrRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self {
            repository,
            factory,
        }
    }
}

#[async_trait]
impl Enumerator for EcrRepositoryEnumerator {
    fn supported_type(&self) -> ResourceType {
        ResourceType::from(AWS_ECR_REPOSITORY)
    }

    async fn enumerate(&self, cancel: &CancellationToken) -> Result<Enumeration, ListingError> {
        let repos = self
            .repository
            .list_all_repositories(cancel)
            .await
            .map_err(listing_error(AWS_ECR_REPOSITORY))?;

        let mut results = Enumeration::with_capacity(repos.len());
        for repo in repos {
            results.push(self.factory.create_abstract_resource(
                AWS_ECR_REPOSITORY,
                &repo.repository_name,
                Attributes::new(),
            ));
        }
        Ok(results)
    }
}

pub struct ApiGatewayV2ApiEnumerator {
    repository: Arc<dyn ApiGatewayV2Repository>,
    factory: Arc<dyn ResourceFactory>,
}

impl ApiGatewayV2ApiEnumerator {
    pub fn new(
        repository: Arc<dyn ApiGatewayV2Repository>,
        factory: Arc<dyn ResourceFactory>,
    ) -> Self {
        Self {
            repository,
            factory,
        }
    }
}

#[async_trait]
impl Enumerator for ApiGatewayV2ApiEnumerator {
    fn supported_type(&self) -> ResourceType {
        ResourceType::from(AWS_APIGATEWAYV2_API)
    }

    async fn enumerate(&self, cancel: &CancellationToken) -> Result<Enumeration, ListingError> {
        let apis = self
            .repository
            .list_all_apis(cancel)
            .await
            .map_err(listing_error(AWS_APIGATEWAYV2_API))?;

        let mut results = Enumeration::with_capacity(apis.len());
        for api in apis {
            results.push(self.factory.create_abstract_resource(
                AWS_APIGATEWAYV2_API,
                &api.api_id,
                Attributes::new(),
            ));
        }
        Ok(results)
    }
}

pub struct ApiGatewayRestApiEnumerator {
    repository: Arc<dyn ApiGatewayRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl ApiGatewayRestApiEnumerator {
    pub fn new(
        repository: Arc<dyn ApiGatewayRepository>,
        factory: Arc<dyn ResourceFactory>,
    ) -> Self {
        Self {
            repository,
            factory,
        }
    }
}

#[async_trait]
impl Enumerator for ApiGatewayRestApiEnumerator {
    fn supported_type(&self) -> ResourceType {
        ResourceType::from(AWS_API_GATEWAY_REST_API)
    }

    async fn enumerate(&self, cancel: &CancellationToken) -> Result<Enumeration, ListingError> {
        let apis = self
            .repository
            .list_all_rest_apis(cancel)
            .await
            .map_err(listing_error(AWS_API_GATEWAY_REST_API))?;

        let mut results = Enumeration::with_capacity(apis.len());
        for api in apis.iter() {
            results.push(self.factory.create_abstract_resource(
                AWS_API_GATEWAY_REST_API,
                &api.id,
                Attributes::from_iter([("name", api.name.as_str())]),
            ));
        }
        Ok(results)
    }
}

/// Live-side policies are read off the rest API listing; an API without a
/// policy has no standalone policy resource.
pub struct ApiGatewayRestApiPolicyEnumerator {
    repository: Arc<dyn ApiGatewayRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl ApiGatewayRestApiPolicyEnumerator {
    pub fn new(
        repository: Arc<dyn ApiGatewayRepository>,
        factory: Arc<dyn ResourceFactory>,
    ) -> Self {
        Self {
            repository,
            factory,
        }
    }
}

#[async_trait]
impl Enumerator for ApiGatewayRestApiPolicyEnumerator {
    fn supported_type(&self) -> ResourceType {
        ResourceType::from(AWS_API_GATEWAY_REST_API_POLICY)
    }

    async fn enumerate(&self, cancel: &CancellationToken) -> Result<Enumeration, ListingError> {
        let apis = self
            .repository
            .list_all_rest_apis(cancel)
            .await
            .map_err(listing_error(AWS_API_GATEWAY_REST_API_POLICY))?;

        let mut results = Enumeration::default();
        for api in apis.iter() {
            let Some(policy) = api.policy.as_deref().filter(|p| !p.is_empty()) else {
                continue;
            };
            results.push(self.factory.create_abstract_resource(
                AWS_API_GATEWAY_REST_API_POLICY,
                &api.id,
                Attributes::from_iter([
                    ("id", api.id.as_str()),
                    ("rest_api_id", api.id.as_str()),
                    ("policy", policy),
                ]),
            ));
        }
        Ok(results)
    }
}

pub struct SnsTopicEnumerator {
    repository: Arc<dyn SnsRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl SnsTopicEnumerator {
    pub fn new(repository: Arc<dyn SnsRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self {
            repository,
            factory,
        }
    }
}

#[async_trait]
impl Enumerator for SnsTopicEnumerator {
    fn supported_type(&self) -> ResourceType {
        ResourceType::from(AWS_SNS_TOPIC)
    }

    async fn enumerate(&self, cancel: &CancellationToken) -> Result<Enumeration, ListingError> {
        let topics = self
            .repository
            .list_all_topics(cancel)
            .await
            .map_err(listing_error(AWS_SNS_TOPIC))?;

        let mut results = Enumeration::with_capacity(topics.len());
        for topic in topics {
            results.push(self.factory.create_abstract_resource(
                AWS_SNS_TOPIC,
                &topic.topic_arn,
                Attributes::from_iter([("topic_arn", topic.topic_arn.as_str())]),
            ));
        }
        Ok(results)
    }
}

pub struct S3BucketEnumerator {
    repository: Arc<dyn S3Repository>,
    factory: Arc<dyn ResourceFactory>,
}

impl S3BucketEnumerator {
    pub fn new(repository: Arc<dyn S3Repository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self {
            repository,
            factory,
        }
    }
}

#[async_trait]
impl Enumerator for S3BucketEnumerator {
    fn supported_type(&self) -> ResourceType {
        ResourceType::from(AWS_S3_BUCKET)
    }

    async fn enumerate(&self, cancel: &CancellationToken) -> Result<Enumeration, ListingError> {
        let buckets = self
            .repository
            .list_all_buckets(cancel)
            .await
            .map_err(listing_error(AWS_S3_BUCKET))?;

        let mut results = Enumeration::with_capacity(buckets.len());
        for bucket in buckets {
            results.push(self.factory.create_abstract_resource(
                AWS_S3_BUCKET,
                &bucket.name,
                Attributes::from_iter([("bucket", bucket.name.as_str())]),
            ));
        }
        Ok(results)
    }
}

pub struct KmsAliasEnumerator {
    repository: Arc<dyn KmsRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl KmsAliasEnumerator {
    pub fn new(repository: Arc<dyn KmsRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self {
            repository,
            factory,
        }
    }
}

#[async_trait]
impl Enumerator for KmsAliasEnumerator {
    fn supported_type(&self) -> ResourceType {
        ResourceType::from(AWS_KMS_ALIAS)
    }

    async fn enumerate(&self, cancel: &CancellationToken) -> Result<Enumeration, ListingError> {
        let aliases = self
            .repository
            .list_all_aliases(cancel)
            .await
            .map_err(listing_error(AWS_KMS_ALIAS))?;

        let mut results = Enumeration::with_capacity(aliases.len());
        for alias in aliases {
            results.push(self.factory.create_abstract_resource(
                AWS_KMS_ALIAS,
                &alias.alias_name,
                Attributes::new(),
            ));
        }
        Ok(results)
    }
}

pub struct DbSubnetGroupEnumerator {
    repository: Arc<dyn RdsRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl DbSubnetGroupEnumerator {
    pub fn new(repository: Arc<dyn RdsRepository>, factory: Arc<dyn ResourceFactory>) -> Self {
        Self {
            repository,
            factory,
        }
    }
}

#[async_trait]
impl Enumerator for DbSubnetGroupEnumerator {
    fn supported_type(&self) -> ResourceType {
        ResourceType::from(AWS_DB_SUBNET_GROUP)
    }

    async fn enumerate(&self, cancel: &CancellationToken) -> Result<Enumeration, ListingError> {
        let groups = self
            .repository
            .list_all_db_subnet_groups(cancel)
            .await
            .map_err(listing_error(AWS_DB_SUBNET_GROUP))?;

        let mut results = Enumeration::with_capacity(groups.len());
        for group in groups {
            results.push(self.factory.create_abstract_resource(
                AWS_DB_SUBNET_GROUP,
                &group.name,
                Attributes::new(),
            ));
        }
        Ok(results)
    }
}

/// Scheduled actions are listed per service namespace; any namespace failing
/// fails the whole type with no partial results.
pub struct AppAutoscalingScheduledActionEnumerator {
    repository: Arc<dyn AppAutoScalingRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl AppAutoscalingScheduledActionEnumerator {
    pub fn new(
        repository: Arc<dyn AppAutoScalingRepository>,
        factory: Arc<dyn ResourceFactory>,
    ) -> Self {
        Self {
            repository,
            factory,
        }
    }
}

#[async_trait]
impl Enumerator for AppAutoscalingScheduledActionEnumerator {
    fn supported_type(&self) -> ResourceType {
        ResourceType::from(AWS_APPAUTOSCALING_SCHEDULED_ACTION)
    }

    async fn enumerate(&self, cancel: &CancellationToken) -> Result<Enumeration, ListingError> {
        let mut results = Enumeration::default();

        for namespace in self.repository.service_namespace_values() {
            if cancel.is_cancelled() {
                return Err(ListingError::new(
                    self.supported_type(),
                    RepositoryError::Cancelled,
                ));
            }

            let actions = self
                .repository
                .describe_scheduled_actions(&namespace, cancel)
                .await
                .map_err(listing_error(AWS_APPAUTOSCALING_SCHEDULED_ACTION))?;

            for action in actions {
                let id = [
                    action.scheduled_action_name.as_str(),
                    action.service_namespace.as_str(),
                    action.resource_id.as_str(),
                ]
                .join("-");
                results.push(self.factory.create_abstract_resource(
                    AWS_APPAUTOSCALING_SCHEDULED_ACTION,
                    &id,
                    Attributes::new(),
                ));
            }
        }

        Ok(results)
    }
}
