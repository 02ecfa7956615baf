//! Occupancy map rebuilt wholesale from each snapshot
//!
//! Answers "is this cell blocked" in O(1) and yields in-bounds cardinal
//! neighbors in the fixed search order. No incremental mutation: every
//! snapshot gets a fresh map, which rules out staleness from partial
//! updates.

use crate::core::types::Pos;
use crate::state::model::{ArenaState, Unit};
use ahash::AHashSet;

#[derive(Debug, Clone)]
pub struct Occupancy {
    width: i32,
    height: i32,
    blocked: AHashSet<Pos>,
}

impl Occupancy {
    /// Build the occupancy map a given unit plans against: walls, obstacles,
    /// bomb cells, awake mobs, and every other friendly unit. The unit's own
    /// cell stays free so zero-length plans remain representable.
    pub fn for_unit(state: &ArenaState, unit: &Unit) -> Self {
        let mut blocked: AHashSet<Pos> = AHashSet::with_capacity(
            state.walls.len() + state.obstacles.len() + state.bombs.len() + state.units.len(),
        );
        blocked.extend(state.walls.iter().copied());
        blocked.extend(state.obstacles.iter().copied());
        blocked.extend(state.bombs.iter().map(|b| b.pos));
        blocked.extend(state.active_mobs().map(|m| m.pos));
        blocked.extend(
            state
                .living_units()
                .filter(|u| u.id != unit.id)
                .map(|u| u.pos),
        );
        blocked.remove(&unit.pos);
        Self {
            width: state.width,
            height: state.height,
            blocked,
        }
    }

    /// Bare map with an explicit blocked set, mostly for tests and for
    /// hypothetical-bomb planning.
    pub fn new(width: i32, height: i32, blocked: AHashSet<Pos>) -> Self {
        Self {
            width,
            height,
            blocked,
        }
    }

    pub fn in_bounds(&self, p: Pos) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    /// Out-of-bounds cells count as blocked.
    pub fn is_blocked(&self, p: Pos) -> bool {
        !self.in_bounds(p) || self.blocked.contains(&p)
    }

    pub fn is_free(&self, p: Pos) -> bool {
        !self.is_blocked(p)
    }

    /// In-bounds, unblocked cardinal neighbors in the fixed search order.
    pub fn open_neighbors(&self, p: Pos) -> impl Iterator<Item = Pos> + '_ {
        p.neighbors4().into_iter().filter(|&n| self.is_free(n))
    }

    /// Derive a map with one additional blocked cell (a hypothetical bomb).
    pub fn with_blocked(&self, extra: Pos) -> Self {
        let mut blocked = self.blocked.clone();
        blocked.insert(extra);
        Self {
            width: self.width,
            height: self.height,
            blocked,
        }
    }
}
