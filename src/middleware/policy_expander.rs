use std::sync::Arc;

use crate::resource::aws::{
    AWS_API_GATEWAY_REST_API, AWS_API_GATEWAY_REST_API_POLICY, AWS_S3_BUCKET,
    AWS_S3_BUCKET_POLICY, AWS_SNS_TOPIC, AWS_SNS_TOPIC_POLICY, AWS_SQS_QUEUE,
    AWS_SQS_QUEUE_POLICY,
};
use crate::resource::{Attributes, Resource, ResourceFactory, normalize_json_string};

use super::{Middleware, MiddlewareError};

const POLICY: &str = "policy";

/// A parent type that may embed a policy, and the standalone type it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyLink {
    pub parent: &'static str,
    pub child: &'static str,
    /// Child attribute holding the parent's id.
    pub parent_ref: &'static str,
    pub stage: &'static str,
}

impl PolicyLink {
    pub const REST_API: Self = Self {
        parent: AWS_API_GATEWAY_REST_API,
        child: AWS_API_GATEWAY_REST_API_POLICY,
        parent_ref: "rest_api_id",
        stage: "aws_api_gateway_rest_api_policy_expander",
    };

    pub const S3_BUCKET: Self = Self {
        parent: AWS_S3_BUCKET,
        child: AWS_S3_BUCKET_POLICY,
        parent_ref: "bucket",
        stage: "aws_s3_bucket_policy_expander",
    };

    pub const SNS_TOPIC: Self = Self {
        parent: AWS_SNS_TOPIC,
        child: AWS_SNS_TOPIC_POLICY,
        parent_ref: "arn",
        stage: "aws_sns_topic_policy_expander",
    };

    pub const SQS_QUEUE: Self = Self {
        parent: AWS_SQS_QUEUE,
        child: AWS_SQS_QUEUE_POLICY,
        parent_ref: "queue_url",
        stage: "aws_sqs_queue_policy_expander",
    };

    pub const ALL: [Self; 4] = [Self::REST_API, Self::S3_BUCKET, Self::SNS_TOPIC, Self::SQS_QUEUE];
}

/// Splits a policy embedded on a declared parent into its standalone resource.
///
/// The live side always reports the standalone form, so only the declared
/// inventory is rewritten. An empty-string policy is left alone: it means a
/// policy was declared empty, not that none was declared.
pub struct InlinePolicyExpander {
    link: PolicyLink,
    factory: Arc<dyn ResourceFactory>,
}

impl InlinePolicyExpander {
    pub fn new(link: PolicyLink, factory: Arc<dyn ResourceFactory>) -> Self {
        Self { link, factory }
    }

    fn has_standalone(&self, state: &[Resource], id: &str) -> bool {
        state.iter().any(|res| res.is(self.link.child, id))
    }
}

impl Middleware for InlinePolicyExpander {
    fn name(&self) -> &str {
        self.link.stage
    }

    fn execute(
        &self,
        _live: &mut Vec<Resource>,
        state: &mut Vec<Resource>,
    ) -> Result<(), MiddlewareError> {
        let mut created = Vec::new();

        for index in 0..state.len() {
            let parent = &state[index];
            if parent.resource_type() != self.link.parent {
                continue;
            }
            let Some(policy) = parent.attributes.get_str(POLICY) else {
                continue;
            };
            if policy.is_empty() {
                continue;
            }

            let id = parent.id().to_string();
            let exists = self.has_standalone(state, &id)
                || created.iter().any(|res: &Resource| res.id() == id);

            if !exists {
                let policy = normalize_json_string(policy).unwrap_or_else(|_| policy.to_string());
                let child = self.factory.create_abstract_resource(
                    self.link.child,
                    &id,
                    Attributes::from_iter([
                        ("id", id.as_str()),
                        (self.link.parent_ref, id.as_str()),
                        (POLICY, policy.as_str()),
                    ]),
                );
                tracing::debug!(
                    parent = self.link.parent,
                    id = %id,
                    "created {} from inline policy",
                    self.link.child
                );
                created.push(child);
            }

            state[index].attributes.safe_delete(&[POLICY]);
        }

        state.extend(created);
        Ok(())
    }
}
