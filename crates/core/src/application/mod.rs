// Application Layer - Use Cases and Business Logic

pub mod constants;
pub mod queue;
pub mod scheduler;
mod shutdown;

// Re-exports
pub use queue::{
    AutoAssignment, BoostReport, ClaimError, ClaimResult, QueueCoordinator, RedistributionReport,
};
pub use scheduler::BoostScheduler;
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
