use std::collections::HashSet;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::alerter::{Alert, Alerter};
use crate::backend::{BackendError, BackendRegistry, Options};
use crate::config::SupplierConfig;
use crate::error::ScanError;
use crate::resource::{Resource, ResourceFactory};
use crate::state::EnumerateError;
use crate::terraform::{StateReader, TerraformStateReader};

/// Turns the configured state sources into the declared inventory.
pub struct StateSupplier {
    backends: BackendRegistry,
    options: Options,
    reader: Box<dyn StateReader>,
    factory: Arc<dyn ResourceFactory>,
}

impl StateSupplier {
    pub fn new(backends: BackendRegistry, options: Options, factory: Arc<dyn ResourceFactory>) -> Self {
        Self {
            backends,
            options,
            reader: Box::new(TerraformStateReader),
            factory,
        }
    }

    pub fn with_reader(mut self, reader: impl StateReader + 'static) -> Self {
        self.reader = Box::new(reader);
        self
    }

    /// Resolves every source, reads each matching document, and deduplicates
    /// resources by (type, id) keeping the first occurrence.
    ///
    /// An unreadable document becomes an alert; the run fails only if no
    /// document at all could be read.
    pub async fn resources(
        &self,
        configs: &[SupplierConfig],
        alerter: &Alerter,
        cancel: &CancellationToken,
    ) -> Result<Vec<Resource>, ScanError> {
        let mut seen = HashSet::new();
        let mut resources = Vec::new();
        let mut documents_read = 0usize;

        for config in configs {
            let locations = match self.backends.get_enumerator(config)? {
                Some(enumerator) => match enumerator.enumerate(cancel).await {
                    Ok(locations) => locations,
                    Err(EnumerateError::Cancelled) => return Err(ScanError::Cancelled),
                    Err(err) => return Err(err.into()),
                },
                None => vec![config.path.clone()],
            };
            tracing::info!(source = %config, count = locations.len(), "resolved state source");

            for location in locations {
                if cancel.is_cancelled() {
                    return Err(ScanError::Cancelled);
                }
                let concrete = config.with_path(&location);
                let backend = self.backends.get_backend(&concrete, &self.options)?;

                let parsed = match backend.read(cancel).await {
                    Ok(bytes) => self
                        .reader
                        .read_document(&location, &bytes, self.factory.as_ref())
                        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
                    Err(BackendError::Cancelled) => {
                        return Err(ScanError::Cancelled);
                    }
                    Err(e) => Err(Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
                };

                match parsed {
                    Ok(document) => {
                        documents_read += 1;
                        for resource in document {
                            let key = (resource.resource_type().clone(), resource.id().to_string());
                            if seen.insert(key) {
                                resources.push(resource);
                            }
                        }
                    }
                    Err(err) => {
                        alerter.send_alert(location.as_str(), Alert::state_reading(&location, err.as_ref()));
                    }
                }
            }
        }

        if documents_read == 0 {
            return Err(ScanError::NoStateRead);
        }

        tracing::info!(
            documents = documents_read,
            count = resources.len(),
            "declared inventory read"
        );
        Ok(resources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{DriftscopeResourceFactory, SchemaRepository};

    fn factory() -> Arc<dyn ResourceFactory> {
        Arc::new(DriftscopeResourceFactory::new(Arc::new(
            SchemaRepository::with_builtin_metadata(),
        )))
    }

    fn supplier() -> StateSupplier {
        StateSupplier::new(BackendRegistry::default(), Options::default(), factory())
    }

    fn state(resources: &[(&str, &str)]) -> String {
        let resources: Vec<_> = resources
            .iter()
            .map(|(t, id)| {
                serde_json::json!({
                    "mode": "managed",
                    "type": t,
                    "name": "r",
                    "instances": [{"attributes": {"id": id}}]
                })
            })
            .collect();
        serde_json::json!({"version": 4, "resources": resources}).to_string()
    }

    fn source(path: &std::path::Path) -> SupplierConfig {
        format!("tfstate://{}", path.to_string_lossy().replace('\\', "/"))
            .parse()
            .unwrap()
    }

    #[tokio::test]
    async fn test_reads_and_deduplicates_across_documents() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("a.tfstate"),
            state(&[("aws_s3_bucket", "logs"), ("aws_instance", "i-1")]),
        )
        .unwrap();
        std::fs::write(dir.path().join("b.tfstate"), state(&[("aws_s3_bucket", "logs")])).unwrap();

        let alerter = Alerter::new();
        let resources = supplier()
            .resources(&[source(dir.path())], &alerter, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(resources.len(), 2);
        assert!(alerter.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_document_becomes_alert() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.tfstate"), state(&[("aws_instance", "i-1")])).unwrap();
        std::fs::write(dir.path().join("old.tfstate"), r#"{"version": 3}"#).unwrap();

        let alerter = Alerter::new();
        let resources = supplier()
            .resources(&[source(dir.path())], &alerter, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(resources.len(), 1);
        let alerts = alerter.alerts();
        assert_eq!(alerts.len(), 1);
        let (key, alerts) = alerts.first().unwrap();
        assert!(key.ends_with("old.tfstate"));
        assert!(alerts[0].message.starts_with(
            "Your analysis may be incomplete. There was an error reading state file"
        ));
        assert!(alerts[0].message.contains("unsupported state format version 3"));
    }

    #[tokio::test]
    async fn test_no_readable_document_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.tfstate"), "not json").unwrap();

        let alerter = Alerter::new();
        let err = supplier()
            .resources(&[source(dir.path())], &alerter, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ScanError::NoStateRead));
        assert_eq!(alerter.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_match_is_enumerate_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = source(&dir.path().join("*.tfstate"));

        let err = supplier()
            .resources(&[config], &Alerter::new(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ScanError::Enumerate(EnumerateError::NoStateFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_object_store_client_is_fatal() {
        let config: SupplierConfig = "tfstate+s3://bucket/prod.tfstate".parse().unwrap();
        let err = supplier()
            .resources(&[config], &Alerter::new(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::Backend(_)));
    }
}
