// Operator workload (read-mostly, owned by the storage side)

use crate::domain::item::OperatorId;
use serde::{Deserialize, Serialize};

/// Point-in-time workload of one operator. Never cached across calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorWorkload {
    pub operator_id: OperatorId,
    /// Items currently assigned
    pub current_load: u32,
    pub resolved_today: u32,
    /// Hard ceiling on `current_load`; `None` means unbounded
    pub max_capacity: Option<u32>,
}

impl OperatorWorkload {
    pub fn new(operator_id: impl Into<String>, current_load: u32) -> Self {
        Self {
            operator_id: operator_id.into(),
            current_load,
            resolved_today: 0,
            max_capacity: None,
        }
    }

    pub fn with_capacity(mut self, max_capacity: u32) -> Self {
        self.max_capacity = Some(max_capacity);
        self
    }

    /// Whether one more item fits under the capacity ceiling
    pub fn has_capacity(&self) -> bool {
        match self.max_capacity {
            Some(max) => self.current_load < max,
            None => true,
        }
    }
}
