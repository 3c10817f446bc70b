use std::sync::Arc;

use driftscope::backend::{BackendRegistry, Options};
use driftscope::config::SupplierConfig;
use driftscope::{
    Alerter, DriftscopeResourceFactory, Pipeline, ResourceFactory, SchemaRepository,
    StateSupplier,
};
use tokio_util::sync::CancellationToken;

fn factory() -> Arc<dyn ResourceFactory> {
    Arc::new(DriftscopeResourceFactory::new(Arc::new(
        SchemaRepository::with_builtin_metadata(),
    )))
}

fn write_state(dir: &std::path::Path, name: &str, resources: serde_json::Value) {
    let doc = serde_json::json!({
        "version": 4,
        "terraform_version": "1.6.0",
        "serial": 1,
        "resources": resources
    });
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join(name), doc.to_string()).unwrap();
}

#[tokio::test]
async fn test_declared_inventory_is_expanded_and_normalized() {
    let root = tempfile::tempdir().unwrap();
    write_state(
        &root.path().join("prod"),
        "storage.tfstate",
        serde_json::json!([
            {
                "mode": "managed",
                "type": "aws_s3_bucket",
                "name": "logs",
                "instances": [{"attributes": {
                    "id": "logs",
                    "bucket": "logs",
                    "force_destroy": false,
                    "policy": "{\n  \"Version\": \"2012-10-17\",\n  \"Statement\": []\n}"
                }}]
            },
            {
                "mode": "managed",
                "type": "aws_sqs_queue",
                "name": "jobs",
                "instances": [{"attributes": {
                    "id": "https://sqs.us-east-1.amazonaws.com/1/jobs",
                    "policy": ""
                }}]
            }
        ]),
    );
    write_state(
        &root.path().join("dev"),
        "storage.tfstate",
        serde_json::json!([
            {
                "mode": "managed",
                "type": "aws_kms_alias",
                "name": "app",
                "instances": [{"attributes": {"id": "alias/app", "name": "alias/app"}}]
            }
        ]),
    );

    let pattern = root.path().join("*").join("*.tfstate");
    let source: SupplierConfig = format!("tfstate://{}", pattern.to_string_lossy())
        .parse()
        .unwrap();

    let factory = factory();
    let supplier = StateSupplier::new(BackendRegistry::default(), Options::default(), factory.clone());
    let alerter = Alerter::new();
    let state = supplier
        .resources(&[source], &alerter, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(state.len(), 3);
    assert!(alerter.is_empty());

    let (live, state) = Pipeline::builtin(factory).run(Vec::new(), state).unwrap();
    assert!(live.is_empty());

    let bucket = state.iter().find(|r| r.is("aws_s3_bucket", "logs")).unwrap();
    assert!(!bucket.attributes.contains_key("policy"));
    assert!(!bucket.attributes.contains_key("force_destroy"));

    let policy = state
        .iter()
        .find(|r| r.is("aws_s3_bucket_policy", "logs"))
        .unwrap();
    assert_eq!(policy.attributes.get_str("bucket"), Some("logs"));
    assert_eq!(
        policy.attributes.get_str("policy"),
        Some(r#"{"Statement":[],"Version":"2012-10-17"}"#)
    );

    let queue = state
        .iter()
        .find(|r| r.resource_type() == &"aws_sqs_queue")
        .unwrap();
    assert_eq!(queue.attributes.get_str("policy"), Some(""));
    assert!(!state.iter().any(|r| r.resource_type() == &"aws_sqs_queue_policy"));

    let alias = state.iter().find(|r| r.is("aws_kms_alias", "alias/app")).unwrap();
    assert!(!alias.attributes.contains_key("name"));
}

#[tokio::test]
async fn test_cancelled_run_reads_nothing() {
    let root = tempfile::tempdir().unwrap();
    write_state(root.path(), "terraform.tfstate", serde_json::json!([]));
    let source: SupplierConfig = format!(
        "tfstate://{}",
        root.path().join("terraform.tfstate").to_string_lossy()
    )
    .parse()
    .unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = StateSupplier::new(BackendRegistry::default(), Options::default(), factory())
        .resources(&[source], &Alerter::new(), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, driftscope::ScanError::Cancelled));
}
