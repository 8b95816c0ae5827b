// Partial item update sent through the storage port

use crate::domain::item::{ItemStatus, OperatorId, Priority};
use crate::domain::metadata::Metadata;
use serde::{Deserialize, Serialize};

/// Assignment transition. Status and assignee always change together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssignmentChange {
    /// `status = assigned`, `assigned_to`/`assigned_at` set
    Assign {
        operator_id: OperatorId,
        assigned_at: i64,
    },
    /// `status = pending`, assignment fields cleared
    Release,
}

/// Fields to change on a single item.
///
/// `metadata` entries are merged key-by-key into the stored metadata; a patch
/// never replaces the map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPatch {
    pub assignment: Option<AssignmentChange>,
    pub priority: Option<Priority>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl ItemPatch {
    pub fn assign(operator_id: impl Into<String>, assigned_at: i64) -> Self {
        Self {
            assignment: Some(AssignmentChange::Assign {
                operator_id: operator_id.into(),
                assigned_at,
            }),
            ..Default::default()
        }
    }

    pub fn release() -> Self {
        Self {
            assignment: Some(AssignmentChange::Release),
            ..Default::default()
        }
    }

    pub fn promote(priority: Priority) -> Self {
        Self {
            priority: Some(priority),
            ..Default::default()
        }
    }

    /// Add an audit entry to merge into the item's metadata
    pub fn with_metadata(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key, value);
        self
    }

    /// Status the item ends up in when this patch is applied to `current`
    pub fn target_status(&self, current: ItemStatus) -> ItemStatus {
        match self.assignment {
            Some(AssignmentChange::Assign { .. }) => ItemStatus::Assigned,
            Some(AssignmentChange::Release) => ItemStatus::Pending,
            None => current,
        }
    }
}
