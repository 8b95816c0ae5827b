// Use case outcomes

use crate::domain::{OperatorId, QueueItem};
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Expected reasons a claim did not happen. Not exceptional: callers branch on them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimError {
    #[error("Item not found")]
    NotFound,

    #[error("Already assigned to another operator")]
    AlreadyAssigned,

    #[error("Item already resolved")]
    Resolved,

    /// Conditional write lost to another writer
    #[error("Concurrent modification: {0}")]
    Concurrent(String),
}

impl Serialize for ClaimError {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Structured claim outcome: `{success, item?, error?}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimResult {
    pub success: bool,
    pub item: Option<QueueItem>,
    pub error: Option<ClaimError>,
}

impl ClaimResult {
    pub fn claimed(item: QueueItem) -> Self {
        Self {
            success: true,
            item: Some(item),
            error: None,
        }
    }

    /// Nothing to claim. No item and no error.
    pub fn empty() -> Self {
        Self {
            success: false,
            item: None,
            error: None,
        }
    }

    pub fn rejected(error: ClaimError) -> Self {
        Self {
            success: false,
            item: None,
            error: Some(error),
        }
    }

    /// Error message, if the claim was rejected
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutoAssignment {
    pub assigned_to: OperatorId,
    pub item: QueueItem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RedistributionReport {
    /// Items actually moved back to pending
    pub redistributed_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoostReport {
    /// Items actually promoted
    pub boosted_count: usize,
}
