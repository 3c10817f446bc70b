use std::sync::Mutex;

use indexmap::IndexMap;

use crate::resource::ResourceType;

/// Identifies the resource an alert is about, when there is one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertResource {
    pub resource_type: ResourceType,
    pub id: String,
}

/// Non-fatal diagnostic collected during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    pub resource: Option<AlertResource>,
    /// The affected resources should be left out of drift calculation.
    pub ignore_resource: bool,
}

impl Alert {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            resource: None,
            ignore_resource: false,
        }
    }

    /// A whole resource type could not be listed.
    pub fn listing(resource_type: &ResourceType, error: &dyn std::error::Error) -> Self {
        Self {
            message: format!(
                "Ignoring {resource_type} from drift calculation: unable to list resources: {error}"
            ),
            resource: None,
            ignore_resource: true,
        }
    }

    /// One declared-state document could not be read or parsed.
    pub fn state_reading(key: &str, error: &dyn std::error::Error) -> Self {
        Self::new(format!(
            "Your analysis may be incomplete. There was an error reading state file '{key}': {error}"
        ))
    }

    pub fn with_resource(mut self, resource_type: ResourceType, id: impl Into<String>) -> Self {
        self.resource = Some(AlertResource {
            resource_type,
            id: id.into(),
        });
        self
    }
}

/// Run-scoped collector every concurrent enumerator may write to.
///
/// Alerts are grouped by key (usually a resource type); ordering between keys
/// follows first insertion and carries no meaning.
#[derive(Debug, Default)]
pub struct Alerter {
    alerts: Mutex<IndexMap<String, Vec<Alert>>>,
}

impl Alerter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send_alert(&self, key: impl Into<String>, alert: Alert) {
        let key = key.into();
        tracing::warn!(key = %key, message = %alert.message, "alert raised");
        self.lock().entry(key).or_default().push(alert);
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.lock().values().map(Vec::len).sum()
    }

    /// Snapshot of every alert collected so far.
    pub fn alerts(&self) -> IndexMap<String, Vec<Alert>> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, IndexMap<String, Vec<Alert>>> {
        // A poisoned lock still holds a consistent map: pushes cannot panic halfway.
        self.alerts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
