// Release Use Cases: single release by the holder, bulk redistribution of an operator's items

use super::outcome::RedistributionReport;
use crate::domain::{metadata_keys, ItemPatch};
use crate::error::{AppError, Result};
use crate::port::{QueueQuery, StoragePort, TimeProvider};
use tracing::{debug, error, info};

/// Return an item to pending. Only the current holder may release it.
pub async fn release(
    storage: &dyn StoragePort,
    time_provider: &dyn TimeProvider,
    item_id: &str,
    operator_id: &str,
    reason: &str,
) -> Result<()> {
    let item = storage
        .get_item(item_id)
        .await?
        .ok_or_else(|| AppError::ItemNotFound(item_id.to_string()))?;

    if !item.is_assigned_to(operator_id) {
        return Err(AppError::NotAssignedToOperator {
            item_id: item.id,
            operator_id: operator_id.to_string(),
        });
    }

    let now = time_provider.now_millis();
    let patch = ItemPatch::release()
        .with_metadata(metadata_keys::LAST_RELEASE_REASON, reason)
        .with_metadata(metadata_keys::LAST_RELEASED_BY, operator_id)
        .with_metadata(metadata_keys::LAST_RELEASED_AT, now);

    storage.update_item(&item.id, item.version, &patch).await?;

    info!(
        item_id = %item.id,
        client_id = %item.client_id,
        operator_id = %operator_id,
        reason = %reason,
        "Item released"
    );
    Ok(())
}

/// Move every item held by `leaving_operator_id` back to pending.
///
/// Deliberately NOT tenant-scoped: an operator going away affects every client
/// they serve. Items are updated one at a time with no rollback:
/// - an item that changed since the scan (released, reassigned) is skipped
/// - any other failure aborts with [`AppError::BatchAborted`] carrying the
///   number of items already moved
pub async fn redistribute_workload(
    storage: &dyn StoragePort,
    time_provider: &dyn TimeProvider,
    leaving_operator_id: &str,
) -> Result<RedistributionReport> {
    let query = QueueQuery::assigned_across_clients(leaving_operator_id);
    let held = storage.query_queue(&query).await?.items;

    info!(
        operator_id = %leaving_operator_id,
        held = held.len(),
        "Redistributing operator workload"
    );

    let now = time_provider.now_millis();
    let mut redistributed_count = 0;

    for item in held {
        // Storage filtered on the assignee already; re-check before writing
        if !item.is_assigned_to(leaving_operator_id) {
            continue;
        }

        let patch = ItemPatch::release()
            .with_metadata(metadata_keys::REDISTRIBUTED_FROM, leaving_operator_id)
            .with_metadata(metadata_keys::REDISTRIBUTED_AT, now);

        match storage.update_item(&item.id, item.version, &patch).await {
            Ok(_) => {
                redistributed_count += 1;
                debug!(
                    item_id = %item.id,
                    client_id = %item.client_id,
                    "Item returned to pending"
                );
            }
            Err(e) if e.is_stale_write() => {
                debug!(item_id = %item.id, error = %e, "Item changed during redistribution, skipping");
            }
            Err(e) => {
                error!(
                    item_id = %item.id,
                    operator_id = %leaving_operator_id,
                    completed = redistributed_count,
                    error = %e,
                    "Redistribution aborted"
                );
                return Err(AppError::BatchAborted {
                    completed: redistributed_count,
                    item_id: item.id,
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        operator_id = %leaving_operator_id,
        redistributed_count = redistributed_count,
        "Redistribution complete"
    );

    Ok(RedistributionReport {
        redistributed_count,
    })
}
