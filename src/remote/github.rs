//! GitHub organization resources.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::enumeration::{Enumeration, Enumerator, EnumeratorLibrary, ListingError, RepositoryError};
use crate::resource::github::{GITHUB_MEMBERSHIP, GITHUB_REPOSITORY, GITHUB_TEAM};
use crate::resource::{Attributes, ResourceFactory, ResourceType};

pub const REMOTE_NAME: &str = "github+tf";

#[derive(Debug, Clone, PartialEq)]
pub struct Repository {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Membership {
    pub organization: String,
    pub username: String,
}

impl Membership {
    /// Terraform's `<organization>:<username>` import id.
    pub fn id(&self) -> String {
        format!("{}:{}", self.organization, self.username)
    }
}

#[async_trait]
pub trait GithubRepository: Send + Sync {
    async fn list_repositories(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<Repository>, RepositoryError>;

    async fn list_teams(&self, cancel: &CancellationToken) -> Result<Vec<Team>, RepositoryError>;

    async fn list_memberships(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<Membership>, RepositoryError>;
}

/// The three GitHub types share one repository; `kind` picks the listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GithubKind {
    Repository,
    Team,
    Membership,
}

impl GithubKind {
    fn resource_type(self) -> &'static str {
        match self {
            Self::Repository => GITHUB_REPOSITORY,
            Self::Team => GITHUB_TEAM,
            Self::Membership => GITHUB_MEMBERSHIP,
        }
    }
}

struct GithubEnumerator {
    kind: GithubKind,
    repository: Arc<dyn GithubRepository>,
    factory: Arc<dyn ResourceFactory>,
}

#[async_trait]
impl Enumerator for GithubEnumerator {
    fn supported_type(&self) -> ResourceType {
        ResourceType::from(self.kind.resource_type())
    }

    async fn enumerate(&self, cancel: &CancellationToken) -> Result<Enumeration, ListingError> {
        let to_listing = |err| ListingError::new(self.supported_type(), err);
        let resource_type = self.kind.resource_type();

        let items: Vec<(String, Attributes)> = match self.kind {
            GithubKind::Repository => self
                .repository
                .list_repositories(cancel)
                .await
                .map_err(to_listing)?
                .into_iter()
                .map(|repo| (repo.name, Attributes::new()))
                .collect(),
            GithubKind::Team => self
                .repository
                .list_teams(cancel)
                .await
                .map_err(to_listing)?
                .into_iter()
                .map(|team| {
                    (
                        team.id.to_string(),
                        Attributes::from_iter([("name", team.name)]),
                    )
                })
                .collect(),
            GithubKind::Membership => self
                .repository
                .list_memberships(cancel)
                .await
                .map_err(to_listing)?
                .into_iter()
                .map(|m| (m.id(), Attributes::new()))
                .collect(),
        };

        let mut results = Enumeration::with_capacity(items.len());
        for (id, attributes) in items {
            results.push(
                self.factory
                    .create_abstract_resource(resource_type, &id, attributes),
            );
        }
        Ok(results)
    }
}

pub fn init(
    repository: &Arc<dyn GithubRepository>,
    factory: &Arc<dyn ResourceFactory>,
    library: &mut EnumeratorLibrary,
) {
    for kind in [GithubKind::Repository, GithubKind::Team, GithubKind::Membership] {
        library.add_enumerator(GithubEnumerator {
            kind,
            repository: Arc::clone(repository),
            factory: Arc::clone(factory),
        });
    }
    tracing::debug!(remote = REMOTE_NAME, types = library.len(), "remote activated");
}
