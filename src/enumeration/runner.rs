use futures::StreamExt;
use futures::stream;
use tokio_util::sync::CancellationToken;

use super::{EnumeratorLibrary, Progress, SkippedItem};
use crate::alerter::{Alert, Alerter};
use crate::error::ScanError;
use crate::resource::{Resource, ResourceType};

pub const DEFAULT_PARALLELISM: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Upper bound on enumerators running at once.
    pub parallelism: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            parallelism: DEFAULT_PARALLELISM,
        }
    }
}

/// Live side of the inventory pair.
#[derive(Debug, Default, PartialEq)]
pub struct LiveInventory {
    pub resources: Vec<Resource>,
    pub skipped: Vec<SkippedItem>,
    pub failed_types: Vec<ResourceType>,
}

/// Runs every registered enumerator through a bounded worker pool.
///
/// A failing type becomes an alert and the others carry on; the run only fails
/// when every type failed or the run was cancelled. No enumerator is dispatched
/// after `cancel` fires.
pub async fn enumerate_all(
    library: &EnumeratorLibrary,
    alerter: &Alerter,
    progress: &Progress,
    options: ScanOptions,
    cancel: &CancellationToken,
) -> Result<LiveInventory, ScanError> {
    let total = library.len();
    let parallelism = options.parallelism.clamp(1, total.max(1));
    tracing::info!(types = total, parallelism, "starting enumeration");

    let outcomes: Vec<_> = stream::iter(library.enumerators())
        .take_while(|_| futures::future::ready(!cancel.is_cancelled()))
        .map(|enumerator| async move {
            let resource_type = enumerator.supported_type();
            let outcome = enumerator.enumerate(cancel).await;
            progress.inc();
            tracing::debug!(
                resource_type = %resource_type,
                done = progress.value(),
                total,
                "enumerator finished"
            );
            (resource_type, outcome)
        })
        .buffer_unordered(parallelism)
        .collect()
        .await;

    if cancel.is_cancelled() {
        return Err(ScanError::Cancelled);
    }

    let mut inventory = LiveInventory::default();
    for (resource_type, outcome) in outcomes {
        match outcome {
            Ok(enumeration) => {
                inventory.resources.extend(enumeration.resources);
                inventory.skipped.extend(enumeration.skipped);
            }
            Err(err) => {
                alerter.send_alert(resource_type.as_str(), Alert::listing(&resource_type, &err));
                inventory.failed_types.push(resource_type);
            }
        }
    }

    if total > 0 && inventory.failed_types.len() == total {
        return Err(ScanError::NothingEnumerated);
    }

    inventory.resources.sort_by(|a, b| {
        (a.resource_type(), a.id()).cmp(&(b.resource_type(), b.id()))
    });
    inventory.failed_types.sort();

    tracing::info!(
        count = inventory.resources.len(),
        skipped = inventory.skipped.len(),
        failed = inventory.failed_types.len(),
        "enumeration complete"
    );

    Ok(inventory)
}
