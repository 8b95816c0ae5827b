// Queue views: listing filter, page and aggregate stats

use crate::domain::item::{queue_order, ItemStatus, Priority, QueueItem};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Listing filter for the operator queue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueFilter {
    /// Restrict to these priorities (empty = all)
    pub priorities: Vec<Priority>,
    /// Page size (None = configured default)
    pub limit: Option<usize>,
    pub offset: usize,
}

impl QueueFilter {
    pub fn with_priorities(mut self, priorities: impl IntoIterator<Item = Priority>) -> Self {
        self.priorities = priorities.into_iter().collect();
        self
    }

    pub fn page(mut self, offset: usize, limit: usize) -> Self {
        self.offset = offset;
        self.limit = Some(limit);
        self
    }
}

/// One page of the operator queue, in queue order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuePage {
    pub items: Vec<QueueItem>,
    pub total: u64,
    pub has_more: bool,
}

impl QueuePage {
    /// Build a page from whatever order storage returned, re-sorting in memory
    pub fn from_unordered(mut items: Vec<QueueItem>, total: u64, offset: usize) -> Self {
        items.sort_by(queue_order);
        let has_more = has_more(offset, items.len(), total);
        Self {
            items,
            total,
            has_more,
        }
    }
}

/// True iff `offset + returned < total`
pub fn has_more(offset: usize, returned: usize, total: u64) -> bool {
    ((offset + returned) as u64) < total
}

/// Queue statistics for one tenant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueStats {
    pub total: u64,
    pub by_priority: BTreeMap<Priority, u64>,
    pub by_status: BTreeMap<ItemStatus, u64>,
    pub avg_wait_time_ms: f64,
    /// Derived: `avg_wait_time_ms / 60000`
    pub avg_wait_time_minutes: f64,
    pub oldest_item_age_ms: Option<i64>,
}
