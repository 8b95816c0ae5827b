// Claim Use Cases
// First writer wins: a lost conditional write is a failed claim, never retried here.

use super::outcome::{ClaimError, ClaimResult};
use crate::domain::{ItemPatch, ItemStatus, QueueItem};
use crate::error::Result;
use crate::port::{QueueQuery, StoragePort, TimeProvider};
use tracing::{debug, info, warn};

/// Claim the next pending item of a tenant.
///
/// Storage orders the single candidate like the queue listing; the first item
/// returned is the target. An empty queue is a plain `{success: false}`.
pub async fn claim_next(
    storage: &dyn StoragePort,
    time_provider: &dyn TimeProvider,
    client_id: &str,
    operator_id: &str,
) -> Result<ClaimResult> {
    let query = QueueQuery::for_client(client_id)
        .with_statuses([ItemStatus::Pending])
        .paginate(0, 1);

    let candidate = storage
        .query_queue(&query)
        .await?
        .items
        .into_iter()
        .find(|item| item.status == ItemStatus::Pending);

    let Some(candidate) = candidate else {
        debug!(client_id = %client_id, operator_id = %operator_id, "No pending items to claim");
        return Ok(ClaimResult::empty());
    };

    assign_to(storage, time_provider, &candidate, operator_id).await
}

/// Claim a specific item.
///
/// Re-claiming an item the operator already holds succeeds and re-stamps
/// `assigned_at`.
pub async fn claim_specific(
    storage: &dyn StoragePort,
    time_provider: &dyn TimeProvider,
    item_id: &str,
    operator_id: &str,
) -> Result<ClaimResult> {
    let Some(item) = storage.get_item(item_id).await? else {
        debug!(item_id = %item_id, operator_id = %operator_id, "Claim target not found");
        return Ok(ClaimResult::rejected(ClaimError::NotFound));
    };

    match item.status {
        ItemStatus::Resolved => {
            return Ok(ClaimResult::rejected(ClaimError::Resolved));
        }
        ItemStatus::Assigned if !item.is_assigned_to(operator_id) => {
            debug!(
                item_id = %item_id,
                operator_id = %operator_id,
                holder = ?item.assigned_to,
                "Claim refused: held by another operator"
            );
            return Ok(ClaimResult::rejected(ClaimError::AlreadyAssigned));
        }
        _ => {}
    }

    assign_to(storage, time_provider, &item, operator_id).await
}

/// Conditional write `pending|assigned(self) -> assigned(operator_id)` at the read revision
async fn assign_to(
    storage: &dyn StoragePort,
    time_provider: &dyn TimeProvider,
    item: &QueueItem,
    operator_id: &str,
) -> Result<ClaimResult> {
    let now = time_provider.now_millis();
    let patch = ItemPatch::assign(operator_id, now);

    match storage.update_item(&item.id, item.version, &patch).await {
        Ok(updated) => {
            info!(
                item_id = %updated.id,
                client_id = %updated.client_id,
                operator_id = %operator_id,
                priority = %updated.priority,
                "Item claimed"
            );
            Ok(ClaimResult::claimed(updated))
        }
        Err(e) if e.is_stale_write() => {
            warn!(
                item_id = %item.id,
                operator_id = %operator_id,
                error = %e,
                "Claim lost to a concurrent update"
            );
            Ok(ClaimResult::rejected(ClaimError::Concurrent(e.to_string())))
        }
        Err(e) => Err(e),
    }
}
