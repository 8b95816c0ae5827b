// Queue Item Domain Model

use crate::domain::error::{DomainError, Result};
use crate::domain::metadata::Metadata;
use crate::domain::patch::{AssignmentChange, ItemPatch};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Queue item ID
pub type ItemId = String;

/// Tenant identifier (partitions every query except redistribution)
pub type ClientId = String;

/// Operator identifier
pub type OperatorId = String;

/// Originating conversation reference (opaque to the queue)
pub type ThreadId = String;

/// Item priority: `Urgent > High > Medium > Low`
///
/// `Ord` follows queue position, so `Urgent` sorts first. Use [`Priority::rank`]
/// when the numeric position is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    High,
    Medium,
    Low,
}

impl Priority {
    /// All levels in queue order
    pub const ALL: [Priority; 4] = [
        Priority::Urgent,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    /// Queue position (0 = served first)
    pub fn rank(self) -> u8 {
        match self {
            Priority::Urgent => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    /// Next level up the boost ladder. `Urgent` has nothing above it.
    pub fn promoted(self) -> Option<Priority> {
        match self {
            Priority::Urgent => None,
            Priority::High => Some(Priority::Urgent),
            Priority::Medium => Some(Priority::High),
            Priority::Low => Some(Priority::Medium),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "urgent" => Ok(Priority::Urgent),
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(DomainError::InvalidPriority(other.to_string())),
        }
    }
}

/// Item status. The queue only moves items between `Pending` and `Assigned`;
/// `Resolved` is entered by an external collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Pending,
    Assigned,
    Resolved,
}

impl ItemStatus {
    /// Statuses visible in the operator queue
    pub const OPEN: [ItemStatus; 2] = [ItemStatus::Pending, ItemStatus::Assigned];

    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Assigned => "assigned",
            ItemStatus::Resolved => "resolved",
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(ItemStatus::Pending),
            "assigned" => Ok(ItemStatus::Assigned),
            "resolved" => Ok(ItemStatus::Resolved),
            other => Err(DomainError::InvalidStatus(other.to_string())),
        }
    }
}

/// Queue Item Entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    pub id: ItemId,
    pub client_id: ClientId,
    pub thread_id: ThreadId,

    pub priority: Priority,
    pub status: ItemStatus,
    pub reason: String,

    // Set iff status == Assigned
    pub assigned_to: Option<OperatorId>,
    pub assigned_at: Option<i64>, // epoch ms

    pub created_at: i64, // epoch ms

    #[serde(default)]
    pub metadata: Metadata,

    /// Revision maintained by the storage port for conditional writes
    #[serde(default)]
    pub version: u64,
}

impl QueueItem {
    /// Create a new pending item
    ///
    /// # Arguments
    ///
    /// * `id` - Unique item ID (injected, not generated)
    /// * `client_id` - Owning tenant
    /// * `thread_id` - Originating conversation
    /// * `priority` - Initial priority decided upstream
    /// * `reason` - Escalation reason
    /// * `created_at` - Creation timestamp in epoch ms (injected, not system time)
    pub fn new(
        id: impl Into<String>,
        client_id: impl Into<String>,
        thread_id: impl Into<String>,
        priority: Priority,
        reason: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id: id.into(),
            client_id: client_id.into(),
            thread_id: thread_id.into(),
            priority,
            status: ItemStatus::Pending,
            reason: reason.into(),
            assigned_to: None,
            assigned_at: None,
            created_at,
            metadata: Metadata::new(),
            version: 0,
        }
    }

    /// Create a test item with a deterministic ID (item-1, item-2, ...).
    ///
    /// **Note**: This method should only be used in tests.
    pub fn new_test(client_id: impl Into<String>, priority: Priority, created_at: i64) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static TEST_COUNTER: AtomicU64 = AtomicU64::new(1);

        let counter = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        Self::new(
            format!("item-{}", counter),
            client_id,
            format!("thread-{}", counter),
            priority,
            "test escalation",
            created_at,
        )
    }

    pub fn is_assigned_to(&self, operator_id: &str) -> bool {
        self.status == ItemStatus::Assigned && self.assigned_to.as_deref() == Some(operator_id)
    }

    /// Time spent in the queue as of `now_millis`
    pub fn age_millis(&self, now_millis: i64) -> i64 {
        now_millis - self.created_at
    }

    /// Apply a storage patch, keeping `assigned_to` in lockstep with `status`.
    ///
    /// Resolved items are terminal for the queue and reject every patch.
    pub fn apply_patch(&mut self, patch: &ItemPatch) -> Result<()> {
        if self.status == ItemStatus::Resolved {
            return Err(DomainError::InvalidStateTransition {
                from: self.status.to_string(),
                to: patch.target_status(self.status).to_string(),
            });
        }

        match &patch.assignment {
            Some(AssignmentChange::Assign {
                operator_id,
                assigned_at,
            }) => {
                self.status = ItemStatus::Assigned;
                self.assigned_to = Some(operator_id.clone());
                self.assigned_at = Some(*assigned_at);
            }
            Some(AssignmentChange::Release) => {
                self.status = ItemStatus::Pending;
                self.assigned_to = None;
                self.assigned_at = None;
            }
            None => {}
        }

        if let Some(priority) = patch.priority {
            self.priority = priority;
        }

        self.metadata.merge(&patch.metadata);
        Ok(())
    }
}

/// Queue ordering: priority (urgent first), then oldest first
pub fn queue_order(a: &QueueItem, b: &QueueItem) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| a.created_at.cmp(&b.created_at))
}
