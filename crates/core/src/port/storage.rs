// Storage Port (Interface)
// Sole point of concurrency control: every write is conditional on one item's revision.

use crate::domain::{
    ClientId, ItemPatch, ItemStatus, OperatorId, OperatorWorkload, Priority, QueueItem, QueueStats,
};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tenant scope of a listing query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryScope {
    Client(ClientId),
    /// Every tenant. Only reachable through [`QueueQuery::assigned_across_clients`].
    AllClients,
}

/// Filtered listing request
///
/// Tenant-scoped unless built with [`QueueQuery::assigned_across_clients`], the
/// single cross-tenant lookup (operator redistribution).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueQuery {
    scope: QueryScope,
    statuses: Vec<ItemStatus>,
    priorities: Vec<Priority>,
    assigned_to: Option<OperatorId>,
    limit: Option<usize>,
    offset: usize,
}

impl QueueQuery {
    pub fn for_client(client_id: impl Into<String>) -> Self {
        Self {
            scope: QueryScope::Client(client_id.into()),
            statuses: Vec::new(),
            priorities: Vec::new(),
            assigned_to: None,
            limit: None,
            offset: 0,
        }
    }

    /// Assigned items of one operator in every tenant
    pub fn assigned_across_clients(operator_id: impl Into<String>) -> Self {
        Self {
            scope: QueryScope::AllClients,
            statuses: vec![ItemStatus::Assigned],
            priorities: Vec::new(),
            assigned_to: Some(operator_id.into()),
            limit: None,
            offset: 0,
        }
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = ItemStatus>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    pub fn with_priorities(mut self, priorities: impl IntoIterator<Item = Priority>) -> Self {
        self.priorities = priorities.into_iter().collect();
        self
    }

    pub fn paginate(mut self, offset: usize, limit: usize) -> Self {
        self.offset = offset;
        self.limit = Some(limit);
        self
    }

    pub fn scope(&self) -> &QueryScope {
        &self.scope
    }

    pub fn statuses(&self) -> &[ItemStatus] {
        &self.statuses
    }

    pub fn priorities(&self) -> &[Priority] {
        &self.priorities
    }

    pub fn assigned_to(&self) -> Option<&str> {
        self.assigned_to.as_deref()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Whether `item` passes every filter (pagination aside)
    pub fn matches(&self, item: &QueueItem) -> bool {
        let in_scope = match &self.scope {
            QueryScope::Client(client_id) => item.client_id == *client_id,
            QueryScope::AllClients => true,
        };
        in_scope
            && (self.statuses.is_empty() || self.statuses.contains(&item.status))
            && (self.priorities.is_empty() || self.priorities.contains(&item.priority))
            && self
                .assigned_to
                .as_deref()
                .map_or(true, |op| item.assigned_to.as_deref() == Some(op))
    }
}

/// Listing result: one page plus the unpaginated match count
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPage {
    pub items: Vec<QueueItem>,
    pub total: u64,
}

/// Aggregate computed by the storage side
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorageStats {
    pub total: u64,
    pub by_priority: BTreeMap<Priority, u64>,
    pub by_status: BTreeMap<ItemStatus, u64>,
    pub avg_wait_time_ms: f64,
    pub oldest_item_age_ms: Option<i64>,
}

impl From<StorageStats> for QueueStats {
    fn from(stats: StorageStats) -> Self {
        Self {
            total: stats.total,
            by_priority: stats.by_priority,
            by_status: stats.by_status,
            avg_wait_time_ms: stats.avg_wait_time_ms,
            avg_wait_time_minutes: stats.avg_wait_time_ms / 60_000.0,
            oldest_item_age_ms: stats.oldest_item_age_ms,
        }
    }
}

/// Storage interface consumed by the queue coordinator
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoragePort: Send + Sync {
    /// Filtered listing. Items come back in queue order (urgent first, oldest first).
    async fn query_queue(&self, query: &QueueQuery) -> Result<QueryPage>;

    /// Find item by ID
    async fn get_item(&self, id: &str) -> Result<Option<QueueItem>>;

    /// Conditionally update one item
    ///
    /// Must fail with `AppError::Conflict` when the stored revision no longer
    /// equals `expected_version`, and with `AppError::ItemNotFound` when the
    /// item is gone. Returns the updated item.
    async fn update_item(
        &self,
        id: &str,
        expected_version: u64,
        patch: &ItemPatch,
    ) -> Result<QueueItem>;

    /// Aggregate counts and wait times for a tenant
    async fn get_queue_stats(&self, client_id: &str) -> Result<StorageStats>;

    /// Workload of every operator serving the tenant
    async fn get_operator_workload(&self, client_id: &str) -> Result<Vec<OperatorWorkload>>;

    /// Operators eligible to receive new work
    async fn get_available_operators(&self, client_id: &str) -> Result<Vec<OperatorWorkload>>;
}
