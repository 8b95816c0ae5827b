// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid item state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Invalid priority: {0}")]
    InvalidPriority(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
