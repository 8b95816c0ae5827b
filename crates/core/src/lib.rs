// Handoff Core - Domain Logic & Ports
// NO infrastructure dependencies (ADR-001: Hexagonal Architecture)

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

pub use application::QueueCoordinator;
pub use config::QueueConfig;
pub use error::{AppError, Result};
