// Age-based priority promotion
// One level per pass; periodic re-invocation compounds over time.

use super::outcome::BoostReport;
use crate::application::constants::BOOST_REASON_AGE_THRESHOLD;
use crate::config::QueueConfig;
use crate::domain::{metadata_keys, ItemPatch, ItemStatus, Priority, QueueItem};
use crate::error::{AppError, Result};
use crate::port::{QueueQuery, StoragePort, TimeProvider};
use tracing::{debug, error, info};

/// Level `item` should be promoted to at `now_millis`, if any.
///
/// Age must strictly exceed the threshold of the item's current priority.
pub fn boost_target(item: &QueueItem, now_millis: i64, config: &QueueConfig) -> Option<Priority> {
    let threshold = config.boost_threshold_millis(item.priority)?;
    if item.age_millis(now_millis) > threshold {
        item.priority.promoted()
    } else {
        None
    }
}

/// Promote every pending item of a tenant that outwaited its threshold.
///
/// Same batch policy as redistribution: stale items are skipped, any other
/// failure aborts with the count of promotions already applied.
pub async fn apply_priority_boosts(
    storage: &dyn StoragePort,
    time_provider: &dyn TimeProvider,
    config: &QueueConfig,
    client_id: &str,
) -> Result<BoostReport> {
    let query = QueueQuery::for_client(client_id).with_statuses([ItemStatus::Pending]);
    let pending = storage.query_queue(&query).await?.items;

    let now = time_provider.now_millis();
    let mut boosted_count = 0;

    for item in pending {
        if item.status != ItemStatus::Pending {
            continue;
        }
        let Some(target) = boost_target(&item, now, config) else {
            continue;
        };

        let patch = ItemPatch::promote(target)
            .with_metadata(metadata_keys::BOOSTED_AT, now)
            .with_metadata(metadata_keys::PREVIOUS_PRIORITY, item.priority.as_str())
            .with_metadata(metadata_keys::BOOST_REASON, BOOST_REASON_AGE_THRESHOLD);

        match storage.update_item(&item.id, item.version, &patch).await {
            Ok(_) => {
                boosted_count += 1;
                info!(
                    item_id = %item.id,
                    client_id = %client_id,
                    from = %item.priority,
                    to = %target,
                    age_ms = item.age_millis(now),
                    "Priority boosted"
                );
            }
            Err(e) if e.is_stale_write() => {
                debug!(item_id = %item.id, error = %e, "Item changed before boost, skipping");
            }
            Err(e) => {
                error!(
                    item_id = %item.id,
                    client_id = %client_id,
                    completed = boosted_count,
                    error = %e,
                    "Priority boost pass aborted"
                );
                return Err(AppError::BatchAborted {
                    completed: boosted_count,
                    item_id: item.id,
                    reason: e.to_string(),
                });
            }
        }
    }

    debug!(client_id = %client_id, boosted_count = boosted_count, "Boost pass complete");
    Ok(BoostReport { boosted_count })
}
