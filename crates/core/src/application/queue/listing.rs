// Read-only queue views

use crate::config::QueueConfig;
use crate::domain::{ItemStatus, OperatorWorkload, QueueFilter, QueuePage, QueueStats};
use crate::error::Result;
use crate::port::{QueueQuery, StoragePort};
use tracing::debug;

/// List open items (pending + assigned) of a tenant.
///
/// The page is re-sorted in memory: ordering holds no matter what order the
/// storage side returns.
pub async fn get_queue(
    storage: &dyn StoragePort,
    config: &QueueConfig,
    client_id: &str,
    filter: QueueFilter,
) -> Result<QueuePage> {
    let limit = config.page_size(filter.limit)?;

    let query = QueueQuery::for_client(client_id)
        .with_statuses(ItemStatus::OPEN)
        .with_priorities(filter.priorities.iter().copied())
        .paginate(filter.offset, limit);

    let result = storage.query_queue(&query).await?;
    let page = QueuePage::from_unordered(result.items, result.total, filter.offset);

    debug!(
        client_id = %client_id,
        returned = page.items.len(),
        total = page.total,
        has_more = page.has_more,
        "Queue listed"
    );

    Ok(page)
}

pub async fn get_stats(storage: &dyn StoragePort, client_id: &str) -> Result<QueueStats> {
    let stats = storage.get_queue_stats(client_id).await?;
    Ok(stats.into())
}

// Kept as its own entry point so load shaping has one place to hook in
pub async fn get_operator_workload(
    storage: &dyn StoragePort,
    client_id: &str,
) -> Result<Vec<OperatorWorkload>> {
    storage.get_operator_workload(client_id).await
}
