use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::repository::{
    Asset, AssetRepository, BIGQUERY_DATASET_ASSET_TYPE, BIGQUERY_TABLE_ASSET_TYPE,
    COMPUTE_FIREWALL_ASSET_TYPE, COMPUTE_IMAGE_ASSET_TYPE, COMPUTE_INSTANCE_GROUP_ASSET_TYPE,
    STORAGE_BUCKET_ASSET_TYPE,
};
use crate::enumeration::{Enumeration, Enumerator, ListingError, split_exact};
use crate::resource::google::{
    GOOGLE_BIGQUERY_DATASET, GOOGLE_BIGQUERY_TABLE, GOOGLE_COMPUTE_FIREWALL, GOOGLE_COMPUTE_IMAGE,
    GOOGLE_COMPUTE_INSTANCE_GROUP, GOOGLE_STORAGE_BUCKET,
};
use crate::resource::{Attributes, ResourceFactory, ResourceType};

/// How one Terraform type is carved out of the shared asset search.
#[derive(Clone, Copy)]
pub struct AssetKind {
    pub resource_type: &'static str,
    pub asset_type: &'static str,
    /// Exact number of `/`-separated segments of the full asset name.
    pub segments: usize,
    pub attributes: fn(&Asset, &[&str]) -> Attributes,
}

fn no_attributes(_: &Asset, _: &[&str]) -> Attributes {
    Attributes::new()
}

fn name_and_project(asset: &Asset, segments: &[&str]) -> Attributes {
    Attributes::from_iter([
        ("name", asset.display_name.as_str()),
        ("project", segments[4]),
    ])
}

pub const FIREWALL: AssetKind = AssetKind {
    resource_type: GOOGLE_COMPUTE_FIREWALL,
    asset_type: COMPUTE_FIREWALL_ASSET_TYPE,
    segments: 8,
    attributes: name_and_project,
};

pub const INSTANCE_GROUP: AssetKind = AssetKind {
    resource_type: GOOGLE_COMPUTE_INSTANCE_GROUP,
    asset_type: COMPUTE_INSTANCE_GROUP_ASSET_TYPE,
    segments: 9,
    attributes: |asset, segments| {
        let mut attrs = name_and_project(asset, segments);
        attrs.insert("zone", asset.location.as_str());
        attrs
    },
};

pub const STORAGE_BUCKET: AssetKind = AssetKind {
    resource_type: GOOGLE_STORAGE_BUCKET,
    asset_type: STORAGE_BUCKET_ASSET_TYPE,
    segments: 4,
    attributes: no_attributes,
};

pub const BIGQUERY_DATASET: AssetKind = AssetKind {
    resource_type: GOOGLE_BIGQUERY_DATASET,
    asset_type: BIGQUERY_DATASET_ASSET_TYPE,
    segments: 7,
    attributes: |asset, _| Attributes::from_iter([("friendly_name", asset.display_name.as_str())]),
};

pub const BIGQUERY_TABLE: AssetKind = AssetKind {
    resource_type: GOOGLE_BIGQUERY_TABLE,
    asset_type: BIGQUERY_TABLE_ASSET_TYPE,
    segments: 9,
    attributes: no_attributes,
};

pub const COMPUTE_IMAGE: AssetKind = AssetKind {
    resource_type: GOOGLE_COMPUTE_IMAGE,
    asset_type: COMPUTE_IMAGE_ASSET_TYPE,
    segments: 8,
    attributes: no_attributes,
};

pub const ALL_KINDS: [AssetKind; 6] = [
    FIREWALL,
    INSTANCE_GROUP,
    STORAGE_BUCKET,
    BIGQUERY_DATASET,
    BIGQUERY_TABLE,
    COMPUTE_IMAGE,
];

/// Strips the `//<service>.googleapis.com/` prefix off a full asset name.
pub fn trim_resource_name(name: &str) -> &str {
    let rest = name.trim_start_matches("//");
    match rest.split_once('/') {
        Some((_, path)) => path,
        None => rest,
    }
}

pub struct AssetEnumerator {
    kind: AssetKind,
    repository: Arc<dyn AssetRepository>,
    factory: Arc<dyn ResourceFactory>,
}

impl AssetEnumerator {
    pub fn new(
        kind: AssetKind,
        repository: Arc<dyn AssetRepository>,
        factory: Arc<dyn ResourceFactory>,
    ) -> Self {
        Self {
            kind,
            repository,
            factory,
        }
    }
}

#[async_trait]
impl Enumerator for AssetEnumerator {
    fn supported_type(&self) -> ResourceType {
        ResourceType::from(self.kind.resource_type)
    }

    async fn enumerate(&self, cancel: &CancellationToken) -> Result<Enumeration, ListingError> {
        let assets = self
            .repository
            .search_all(self.kind.asset_type, cancel)
            .await
            .map_err(|err| ListingError::new(self.supported_type(), err))?;

        let mut results = Enumeration::with_capacity(assets.len());
        for asset in &assets {
            let segments = match split_exact(&asset.name, self.kind.segments) {
                Ok(segments) => segments,
                Err(reason) => {
                    results.skip(self.supported_type(), asset.name.as_str(), reason);
                    continue;
                }
            };
            results.push(self.factory.create_abstract_resource(
                self.kind.resource_type,
                trim_resource_name(&asset.name),
                (self.kind.attributes)(asset, &segments),
            ));
        }
        Ok(results)
    }
}
