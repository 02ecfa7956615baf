//! Immutable arena snapshot types
//!
//! A snapshot is produced fresh from every successful fetch and never
//! mutated afterwards; the scheduler publishes each one by replacing the
//! previous `Arc`, so readers can never observe a partial update.

use crate::core::types::{Pos, UnitId};
use serde::Serialize;

/// One fully-formed view of the arena at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct ArenaState {
    /// Round identifier, used for logging round transitions.
    pub round: String,
    pub width: i32,
    pub height: i32,
    pub walls: Vec<Pos>,
    pub obstacles: Vec<Pos>,
    pub bombs: Vec<Bomb>,
    /// Friendly, controllable units.
    pub units: Vec<Unit>,
    pub enemies: Vec<Pos>,
    pub mobs: Vec<Mob>,
    pub raw_score: i64,
}

impl ArenaState {
    pub fn in_bounds(&self, p: Pos) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    /// Mobs that are currently hostile. Dormant mobs neither threaten nor
    /// block anything.
    pub fn active_mobs(&self) -> impl Iterator<Item = &Mob> {
        self.mobs.iter().filter(|m| !m.dormant)
    }

    /// Positions of every hostile entity: enemies plus awake mobs.
    pub fn hostile_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        self.enemies
            .iter()
            .copied()
            .chain(self.active_mobs().map(|m| m.pos))
    }

    pub fn living_units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| u.alive)
    }
}

/// A controllable unit as reported by the server.
#[derive(Debug, Clone, Serialize)]
pub struct Unit {
    pub id: UnitId,
    pub pos: Pos,
    pub alive: bool,
    /// Movement eligibility; a unit that cannot move always yields an empty
    /// action.
    pub can_move: bool,
    pub armor: i32,
    pub bombs_available: u32,
}

/// A placed bomb.
#[derive(Debug, Clone, Serialize)]
pub struct Bomb {
    pub pos: Pos,
    /// Maximum Manhattan reach of the blast cross.
    pub radius: i32,
    /// Remaining fuse in seconds, when the server reports it.
    pub fuse: Option<f32>,
}

/// A neutral monster. Dormant mobs (`safe_time > 0` on the wire) are inert.
#[derive(Debug, Clone, Serialize)]
pub struct Mob {
    pub id: String,
    pub pos: Pos,
    pub dormant: bool,
}

#[cfg(test)]
pub mod testutil {
    //! Builders for synthetic snapshots used across the test suite.

    use super::*;

    pub fn empty_arena(width: i32, height: i32) -> ArenaState {
        ArenaState {
            round: "test-round".into(),
            width,
            height,
            walls: Vec::new(),
            obstacles: Vec::new(),
            bombs: Vec::new(),
            units: Vec::new(),
            enemies: Vec::new(),
            mobs: Vec::new(),
            raw_score: 0,
        }
    }

    pub fn unit(id: &str, pos: Pos, bombs_available: u32) -> Unit {
        Unit {
            id: UnitId::new(id),
            pos,
            alive: true,
            can_move: true,
            armor: 1,
            bombs_available,
        }
    }

    pub fn bomb(pos: Pos, radius: i32, fuse: Option<f32>) -> Bomb {
        Bomb { pos, radius, fuse }
    }
}
