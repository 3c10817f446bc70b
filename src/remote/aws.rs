mod enumerators;
pub mod repository;

use std::sync::Arc;

use enumerators::{
    ApiGatewayRestApiEnumerator, ApiGatewayRestApiPolicyEnumerator, ApiGatewayV2ApiEnumerator,
    AppAutoscalingScheduledActionEnumerator, DbSubnetGroupEnumerator, Ec2InstanceEnumerator,
    EcrRepositoryEnumerator, KmsAliasEnumerator, S3BucketEnumerator, SnsTopicEnumerator,
};
pub use repository::AwsRepositories;

use crate::enumeration::EnumeratorLibrary;
use crate::resource::ResourceFactory;

pub const REMOTE_NAME: &str = "aws+tf";

/// Registers one enumerator per supported AWS resource type.
pub fn init(
    repositories: &AwsRepositories,
    factory: &Arc<dyn ResourceFactory>,
    library: &mut EnumeratorLibrary,
) {
    let f = || Arc::clone(factory);
    let r = repositories.clone();

    library.add_enumerator(Ec2InstanceEnumerator::new(r.ec2, f()));
    library.add_enumerator(EcrRepositoryEnumerator::new(r.ecr, f()));
    library.add_enumerator(ApiGatewayV2ApiEnumerator::new(r.apigatewayv2, f()));
    library.add_enumerator(ApiGatewayRestApiEnumerator::new(
        Arc::clone(&r.apigateway),
        f(),
    ));
    library.add_enumerator(ApiGatewayRestApiPolicyEnumerator::new(r.apigateway, f()));
    library.add_enumerator(SnsTopicEnumerator::new(r.sns, f()));
    library.add_enumerator(S3BucketEnumerator::new(r.s3, f()));
    library.add_enumerator(KmsAliasEnumerator::new(r.kms, f()));
    library.add_enumerator(DbSubnetGroupEnumerator::new(r.rds, f()));
    library.add_enumerator(AppAutoscalingScheduledActionEnumerator::new(
        r.appautoscaling,
        f(),
    ));

    tracing::debug!(remote = REMOTE_NAME, types = library.len(), "remote activated");
}
