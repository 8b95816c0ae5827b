// Central Error Type for the Application

use crate::domain::{ItemId, ItemStatus, OperatorId};
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    /// Release/ownership check failed: the caller does not hold the item
    #[error("Not assigned to you: item {item_id} is not held by operator {operator_id}")]
    NotAssignedToOperator {
        item_id: ItemId,
        operator_id: OperatorId,
    },

    #[error("No operators available for client {0}")]
    NoOperatorsAvailable(String),

    /// Conditional write rejected by the storage port
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid state: item {item_id} is {status}")]
    InvalidState { item_id: ItemId, status: ItemStatus },

    /// A multi-item operation stopped partway; `completed` counts applied updates only
    #[error("Batch aborted after {completed} updates at item {item_id}: {reason}")]
    BatchAborted {
        completed: usize,
        item_id: ItemId,
        reason: String,
    },
}

impl AppError {
    /// True when the storage port rejected a conditional write
    pub fn is_conflict(&self) -> bool {
        matches!(self, AppError::Conflict(_))
    }

    /// The item changed or disappeared after it was read
    pub fn is_stale_write(&self) -> bool {
        matches!(self, AppError::Conflict(_) | AppError::ItemNotFound(_))
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
