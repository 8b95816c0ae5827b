// Handoff Infrastructure - In-memory Adapter
// Implements: StoragePort (conditional writes on a per-item revision)

mod roster;
mod storage;

pub use roster::OperatorProfile;
pub use storage::InMemoryStorage;
