// Port Layer - Interfaces for external dependencies

pub mod storage;
pub mod time_provider;

// Re-exports
pub use storage::{QueryPage, QueryScope, QueueQuery, StoragePort, StorageStats};
pub use time_provider::TimeProvider;
