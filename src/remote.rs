pub mod aws;
pub mod azure;
pub mod github;
pub mod google;

use std::sync::Arc;

use thiserror::Error;

use crate::enumeration::EnumeratorLibrary;
use crate::resource::ResourceFactory;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("unsupported remote '{0}'")]
    Unsupported(String),

    #[error("no provider clients configured for remote '{remote}'")]
    MissingClients { remote: String },
}

/// Provider clients handed to activation. A remote whose clients are absent
/// cannot be activated.
#[derive(Clone, Default)]
pub struct ProviderClients {
    pub aws: Option<aws::AwsRepositories>,
    pub google: Option<Arc<dyn google::AssetRepository>>,
    pub azure: Option<azure::AzureRepositories>,
    pub github: Option<Arc<dyn github::GithubRepository>>,
}

pub type Activator = fn(
    &ProviderClients,
    &Arc<dyn ResourceFactory>,
    &mut EnumeratorLibrary,
) -> Result<(), RemoteError>;

fn missing(remote: &str) -> RemoteError {
    RemoteError::MissingClients {
        remote: remote.to_string(),
    }
}

fn activate_aws(
    clients: &ProviderClients,
    factory: &Arc<dyn ResourceFactory>,
    library: &mut EnumeratorLibrary,
) -> Result<(), RemoteError> {
    let repos = clients.aws.as_ref().ok_or_else(|| missing(aws::REMOTE_NAME))?;
    aws::init(repos, factory, library);
    Ok(())
}

fn activate_github(
    clients: &ProviderClients,
    factory: &Arc<dyn ResourceFactory>,
    library: &mut EnumeratorLibrary,
) -> Result<(), RemoteError> {
    let repo = clients
        .github
        .as_ref()
        .ok_or_else(|| missing(github::REMOTE_NAME))?;
    github::init(repo, factory, library);
    Ok(())
}

fn activate_google(
    clients: &ProviderClients,
    factory: &Arc<dyn ResourceFactory>,
    library: &mut EnumeratorLibrary,
) -> Result<(), RemoteError> {
    let repo = clients
        .google
        .as_ref()
        .ok_or_else(|| missing(google::REMOTE_NAME))?;
    google::init(repo, factory, library);
    Ok(())
}

fn activate_azure(
    clients: &ProviderClients,
    factory: &Arc<dyn ResourceFactory>,
    library: &mut EnumeratorLibrary,
) -> Result<(), RemoteError> {
    let repos = clients
        .azure
        .as_ref()
        .ok_or_else(|| missing(azure::REMOTE_NAME))?;
    azure::init(repos, factory, library);
    Ok(())
}

/// Closed list of remote names and what activating each one registers.
#[derive(Clone)]
pub struct RemoteRegistry {
    entries: Vec<(&'static str, Activator)>,
}

impl RemoteRegistry {
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                (aws::REMOTE_NAME, activate_aws as Activator),
                (github::REMOTE_NAME, activate_github),
                (google::REMOTE_NAME, activate_google),
                (azure::REMOTE_NAME, activate_azure),
            ],
        }
    }

    /// Adds or replaces a remote.
    pub fn with_remote(mut self, name: &'static str, activator: Activator) -> Self {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = activator,
            None => self.entries.push((name, activator)),
        }
        self
    }

    pub fn is_supported(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| *n == name)
    }

    pub fn supported_remotes(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(n, _)| *n).collect()
    }

    pub fn activate(
        &self,
        name: &str,
        clients: &ProviderClients,
        factory: &Arc<dyn ResourceFactory>,
        library: &mut EnumeratorLibrary,
    ) -> Result<(), RemoteError> {
        let (_, activator) = self
            .entries
            .iter()
            .find(|(n, _)| *n == name)
            .ok_or_else(|| RemoteError::Unsupported(name.to_string()))?;

        activator(clients, factory, library)
    }
}

impl std::fmt::Debug for RemoteRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.supported_remotes()).finish()
    }
}
