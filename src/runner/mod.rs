//! Long-running orchestration: pacing, failure budgets, snapshot hand-off
//! and the fetch / decide-and-send loops.

pub mod budget;
pub mod cache;
pub mod cadence;
pub mod scheduler;

pub use budget::ErrorBudget;
pub use cache::{SnapshotCache, Status, StatusHandle};
pub use cadence::Cadence;
pub use scheduler::Scheduler;
