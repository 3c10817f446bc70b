//! AWS resource types and their normalization metadata.

use super::SchemaRepository;
use super::schema::json_string;

pub const AWS_INSTANCE: &str = "aws_instance";
pub const AWS_ECR_REPOSITORY: &str = "aws_ecr_repository";
pub const AWS_APIGATEWAYV2_API: &str = "aws_apigatewayv2_api";
pub const AWS_API_GATEWAY_REST_API: &str = "aws_api_gateway_rest_api";
pub const AWS_API_GATEWAY_REST_API_POLICY: &str = "aws_api_gateway_rest_api_policy";
pub const AWS_SNS_TOPIC: &str = "aws_sns_topic";
pub const AWS_SNS_TOPIC_POLICY: &str = "aws_sns_topic_policy";
pub const AWS_S3_BUCKET: &str = "aws_s3_bucket";
pub const AWS_S3_BUCKET_POLICY: &str = "aws_s3_bucket_policy";
pub const AWS_SQS_QUEUE: &str = "aws_sqs_queue";
pub const AWS_SQS_QUEUE_POLICY: &str = "aws_sqs_queue_policy";
pub const AWS_KMS_ALIAS: &str = "aws_kms_alias";
pub const AWS_DB_SUBNET_GROUP: &str = "aws_db_subnet_group";
pub const AWS_APPAUTOSCALING_SCHEDULED_ACTION: &str = "aws_appautoscaling_scheduled_action";

pub fn init_metadata(repository: &mut SchemaRepository) {
    repository.set_normalize_func(AWS_KMS_ALIAS, |res| {
        res.attributes.safe_delete(&["name"]);
        res.attributes.safe_delete(&["name_prefix"]);
    });

    repository.set_normalize_func(AWS_S3_BUCKET, |res| {
        res.attributes.safe_delete(&["force_destroy"]);
        res.attributes.safe_delete(&["bucket_prefix"]);
    });
    repository.update_schema(AWS_S3_BUCKET, &[("policy", json_string)]);

    repository.set_normalize_func(AWS_SNS_TOPIC_POLICY, |res| {
        res.attributes.safe_delete(&["owner"]);
    });
    repository.update_schema(AWS_SNS_TOPIC_POLICY, &[("policy", json_string)]);

    repository.set_normalize_func(AWS_DB_SUBNET_GROUP, |res| {
        res.attributes.safe_delete(&["name_prefix"]);
    });

    repository.update_schema(AWS_SNS_TOPIC, &[("policy", json_string)]);
    repository.update_schema(AWS_SQS_QUEUE, &[("policy", json_string)]);
    repository.update_schema(AWS_API_GATEWAY_REST_API, &[("policy", json_string)]);
    repository.update_schema(AWS_API_GATEWAY_REST_API_POLICY, &[("policy", json_string)]);
    repository.update_schema(AWS_S3_BUCKET_POLICY, &[("policy", json_string)]);
    repository.update_schema(AWS_SQS_QUEUE_POLICY, &[("policy", json_string)]);
}
