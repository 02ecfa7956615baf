//! Arena snapshots and the per-snapshot occupancy map.

pub mod grid;
pub mod model;

pub use grid::Occupancy;
pub use model::{ArenaState, Bomb, Mob, Unit};
