use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::cache::RunCache;
use crate::enumeration::RepositoryError;

pub const COMPUTE_FIREWALL_ASSET_TYPE: &str = "compute.googleapis.com/Firewall";
pub const COMPUTE_INSTANCE_GROUP_ASSET_TYPE: &str = "compute.googleapis.com/InstanceGroup";
pub const COMPUTE_IMAGE_ASSET_TYPE: &str = "compute.googleapis.com/Image";
pub const STORAGE_BUCKET_ASSET_TYPE: &str = "storage.googleapis.com/Bucket";
pub const BIGQUERY_DATASET_ASSET_TYPE: &str = "bigquery.googleapis.com/Dataset";
pub const BIGQUERY_TABLE_ASSET_TYPE: &str = "bigquery.googleapis.com/Table";

/// Every asset type the shared search asks for.
pub const SEARCHED_ASSET_TYPES: &[&str] = &[
    COMPUTE_FIREWALL_ASSET_TYPE,
    COMPUTE_INSTANCE_GROUP_ASSET_TYPE,
    COMPUTE_IMAGE_ASSET_TYPE,
    STORAGE_BUCKET_ASSET_TYPE,
    BIGQUERY_DATASET_ASSET_TYPE,
    BIGQUERY_TABLE_ASSET_TYPE,
];

/// One Cloud Asset search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Full resource name, e.g. `//compute.googleapis.com/projects/p/global/firewalls/fw`.
    pub name: String,
    pub asset_type: String,
    pub display_name: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetPage {
    pub assets: Vec<Asset>,
    pub next_page_token: Option<String>,
}

/// Uncached single-page asset search within one scope (`projects/<id>`, ...).
#[async_trait]
pub trait AssetSearchClient: Send + Sync {
    async fn search_page(
        &self,
        scope: &str,
        asset_types: &[&str],
        page_token: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<AssetPage, RepositoryError>;
}

#[async_trait]
pub trait AssetRepository: Send + Sync {
    /// Every asset of `asset_type` across all configured scopes.
    async fn search_all(
        &self,
        asset_type: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Asset>, RepositoryError>;
}

/// Runs one search across every scope per run and serves each asset type out
/// of the cached result.
pub struct CachedAssetRepository<C> {
    client: C,
    scopes: Vec<String>,
    cache: Arc<RunCache>,
}

impl<C: AssetSearchClient> CachedAssetRepository<C> {
    pub fn new(client: C, scopes: Vec<String>, cache: Arc<RunCache>) -> Self {
        Self {
            client,
            scopes,
            cache,
        }
    }

    async fn search_every_scope(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<Asset>, RepositoryError> {
        let mut assets = Vec::new();

        for scope in &self.scopes {
            let mut page_token: Option<String> = None;
            loop {
                if cancel.is_cancelled() {
                    return Err(RepositoryError::Cancelled);
                }
                let page = self
                    .client
                    .search_page(scope, SEARCHED_ASSET_TYPES, page_token.as_deref(), cancel)
                    .await?;
                tracing::debug!(scope = %scope, count = page.assets.len(), "fetched asset page");
                assets.extend(page.assets);

                match page.next_page_token.filter(|t| !t.is_empty()) {
                    Some(token) => page_token = Some(token),
                    None => break,
                }
            }
        }

        Ok(assets)
    }
}

#[async_trait]
impl<C: AssetSearchClient> AssetRepository for CachedAssetRepository<C> {
    async fn search_all(
        &self,
        asset_type: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Asset>, RepositoryError> {
        let all = self
            .cache
            .get_or_try_init("google.assets", || self.search_every_scope(cancel))
            .await?;

        Ok(all
            .iter()
            .filter(|asset| asset.asset_type == asset_type)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    fn asset(asset_type: &str, name: &str) -> Asset {
        Asset {
            name: name.to_string(),
            asset_type: asset_type.to_string(),
            display_name: String::new(),
            location: String::new(),
        }
    }

    /// Pages keyed by (scope, page token).
    #[derive(Default)]
    struct FakeSearch {
        pages: HashMap<(String, Option<String>), Result<AssetPage, String>>,
        calls: Mutex<Vec<(String, Option<String>)>>,
    }

    impl FakeSearch {
        fn page(mut self, scope: &str, token: Option<&str>, page: AssetPage) -> Self {
            self.pages
                .insert((scope.to_string(), token.map(String::from)), Ok(page));
            self
        }

        fn failing(mut self, scope: &str, token: Option<&str>) -> Self {
            self.pages.insert(
                (scope.to_string(), token.map(String::from)),
                Err("quota exceeded".to_string()),
            );
            self
        }
    }

    #[async_trait]
    impl AssetSearchClient for FakeSearch {
        async fn search_page(
            &self,
            scope: &str,
            _asset_types: &[&str],
            page_token: Option<&str>,
            _cancel: &CancellationToken,
        ) -> Result<AssetPage, RepositoryError> {
            let key = (scope.to_string(), page_token.map(String::from));
            self.calls.lock().unwrap().push(key.clone());
            match self.pages.get(&key) {
                Some(Ok(page)) => Ok(page.clone()),
                Some(Err(message)) => Err(RepositoryError::api("cloudasset", message.clone())),
                None => Ok(AssetPage::default()),
            }
        }
    }

    #[tokio::test]
    async fn test_search_drains_pages_across_scopes_once() {
        let client = FakeSearch::default()
            .page(
                "projects/a",
                None,
                AssetPage {
                    assets: vec![asset(STORAGE_BUCKET_ASSET_TYPE, "//storage.googleapis.com/b1")],
                    next_page_token: Some("p2".to_string()),
                },
            )
            .page(
                "projects/a",
                Some("p2"),
                AssetPage {
                    assets: vec![asset(
                        COMPUTE_IMAGE_ASSET_TYPE,
                        "//compute.googleapis.com/projects/a/global/images/i",
                    )],
                    next_page_token: None,
                },
            )
            .page(
                "projects/b",
                None,
                AssetPage {
                    assets: vec![asset(STORAGE_BUCKET_ASSET_TYPE, "//storage.googleapis.com/b2")],
                    next_page_token: Some(String::new()),
                },
            );
        let repo = CachedAssetRepository::new(
            client,
            vec!["projects/a".to_string(), "projects/b".to_string()],
            Arc::new(RunCache::new()),
        );
        let cancel = CancellationToken::new();

        let buckets = repo.search_all(STORAGE_BUCKET_ASSET_TYPE, &cancel).await.unwrap();
        let images = repo.search_all(COMPUTE_IMAGE_ASSET_TYPE, &cancel).await.unwrap();

        assert_eq!(buckets.len(), 2);
        assert_eq!(images.len(), 1);
        assert_eq!(repo.client.calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_search_failure_in_any_scope_fails_whole_search() {
        let client = FakeSearch::default()
            .page(
                "projects/a",
                None,
                AssetPage {
                    assets: vec![asset(STORAGE_BUCKET_ASSET_TYPE, "//storage.googleapis.com/b1")],
                    next_page_token: None,
                },
            )
            .failing("projects/b", None);
        let repo = CachedAssetRepository::new(
            client,
            vec!["projects/a".to_string(), "projects/b".to_string()],
            Arc::new(RunCache::new()),
        );

        let err = repo
            .search_all(STORAGE_BUCKET_ASSET_TYPE, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_search_stops_when_cancelled() {
        let repo = CachedAssetRepository::new(
            FakeSearch::default(),
            vec!["projects/a".to_string()],
            Arc::new(RunCache::new()),
        );
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = repo
            .search_all(STORAGE_BUCKET_ASSET_TYPE, &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::Cancelled));
        assert!(repo.client.calls.lock().unwrap().is_empty());
    }
}
