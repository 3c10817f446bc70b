//! Reconciliation stages applied to the live and declared inventories before
//! they are compared.

mod normalizer;
mod policy_expander;

pub use normalizer::Normalizer;
pub use policy_expander::{InlinePolicyExpander, PolicyLink};

use std::sync::Arc;

use thiserror::Error;

use crate::resource::{Resource, ResourceFactory};

#[derive(Debug, Error)]
#[error("middleware '{stage}' failed: {message}")]
pub struct MiddlewareError {
    pub stage: String,
    pub message: String,
}

impl MiddlewareError {
    pub fn new(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            message: message.into(),
        }
    }
}

/// One pipeline stage. Running a stage twice must give the same result as once.
pub trait Middleware: Send + Sync {
    fn name(&self) -> &str;

    fn execute(
        &self,
        live: &mut Vec<Resource>,
        state: &mut Vec<Resource>,
    ) -> Result<(), MiddlewareError>;
}

/// Ordered list of stages, applied one after another.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Middleware>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy expanders for every linked type, then normalization.
    pub fn builtin(factory: Arc<dyn ResourceFactory>) -> Self {
        let mut pipeline = Self::new();
        for link in PolicyLink::ALL {
            pipeline = pipeline.add(InlinePolicyExpander::new(link, factory.clone()));
        }
        pipeline.add(Normalizer)
    }

    pub fn add(mut self, stage: impl Middleware + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Runs every stage in order and hands the pair back only if all succeeded.
    pub fn run(
        &self,
        mut live: Vec<Resource>,
        mut state: Vec<Resource>,
    ) -> Result<(Vec<Resource>, Vec<Resource>), MiddlewareError> {
        for stage in &self.stages {
            tracing::debug!(stage = stage.name(), "running middleware");
            stage.execute(&mut live, &mut state)?;
        }
        Ok((live, state))
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::resource::{Attributes, DriftscopeResourceFactory, SchemaRepository};

    fn factory() -> Arc<dyn ResourceFactory> {
        Arc::new(DriftscopeResourceFactory::new(Arc::new(
            SchemaRepository::with_builtin_metadata(),
        )))
    }

    struct Recording {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
        fail: bool,
    }

    impl Middleware for Recording {
        fn name(&self) -> &str {
            self.name
        }

        fn execute(
            &self,
            _live: &mut Vec<Resource>,
            state: &mut Vec<Resource>,
        ) -> Result<(), MiddlewareError> {
            self.log.lock().unwrap().push(self.name);
            if self.fail {
                return Err(MiddlewareError::new(self.name, "boom"));
            }
            state.clear();
            Ok(())
        }
    }

    #[test]
    fn test_builtin_stage_order() {
        let pipeline = Pipeline::builtin(factory());
        assert_eq!(
            pipeline.stage_names(),
            vec![
                "aws_api_gateway_rest_api_policy_expander",
                "aws_s3_bucket_policy_expander",
                "aws_sns_topic_policy_expander",
                "aws_sqs_queue_policy_expander",
                "normalizer",
            ]
        );
    }

    #[test]
    fn test_stages_run_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let stage = |name, fail| Recording {
            name,
            log: log.clone(),
            fail,
        };
        let pipeline = Pipeline::new()
            .add(stage("first", false))
            .add(stage("second", false));

        let state = vec![factory().create_abstract_resource("aws_instance", "i-1", Attributes::new())];
        let (_, state) = pipeline.run(Vec::new(), state).unwrap();

        assert!(state.is_empty());
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_failing_stage_aborts_pipeline() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let stage = |name, fail| Recording {
            name,
            log: log.clone(),
            fail,
        };
        let pipeline = Pipeline::new()
            .add(stage("broken", true))
            .add(stage("never", false));

        let err = pipeline.run(Vec::new(), Vec::new()).unwrap_err();

        assert_eq!(err.to_string(), "middleware 'broken' failed: boom");
        assert_eq!(*log.lock().unwrap(), vec!["broken"]);
    }

    #[test]
    fn test_builtin_pipeline_is_idempotent() {
        let factory = factory();
        let state = vec![
            factory.create_abstract_resource(
                "aws_s3_bucket",
                "logs",
                Attributes::from_iter([
                    ("bucket", "logs"),
                    ("force_destroy", "true"),
                    ("policy", "{\"Version\": \"2012-10-17\", \"Statement\": []}"),
                ]),
            ),
            factory.create_abstract_resource(
                "aws_sns_topic",
                "arn:aws:sns:us-east-1:1:t",
                Attributes::from_iter([("policy", "")]),
            ),
        ];
        let live = vec![factory.create_abstract_resource(
            "aws_kms_alias",
            "alias/app",
            Attributes::from_iter([("name", "alias/app")]),
        )];

        let pipeline = Pipeline::builtin(factory);
        let (live_once, state_once) = pipeline.run(live, state).unwrap();
        let (live_twice, state_twice) = pipeline
            .run(live_once.clone(), state_once.clone())
            .unwrap();

        assert_eq!(live_once, live_twice);
        assert_eq!(state_once, state_twice);
        assert_eq!(state_once.len(), 3);
        assert!(live_once[0].attributes.is_empty());
    }
}
