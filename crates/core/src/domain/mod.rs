// Domain Layer - Pure business logic and entities

pub mod error;
pub mod item;
pub mod metadata;
pub mod operator;
pub mod patch;
pub mod queue;

// Re-exports
pub use error::DomainError;
pub use item::{queue_order, ClientId, ItemId, ItemStatus, OperatorId, Priority, QueueItem, ThreadId};
pub use metadata::{keys as metadata_keys, Metadata};
pub use operator::OperatorWorkload;
pub use patch::{AssignmentChange, ItemPatch};
pub use queue::{has_more, QueueFilter, QueuePage, QueueStats};
