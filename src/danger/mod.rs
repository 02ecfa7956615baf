//! Threat classification
//!
//! Pure functions over a snapshot: which cells are covered by a bomb's
//! blast cross, and whether a position is dangerous. No mutation, no I/O,
//! so every rule and every test can ask the same questions in isolation.

use crate::core::config::BotConfig;
use crate::core::types::Pos;
use crate::state::model::ArenaState;
use ahash::AHashSet;

/// Cells covered by one bomb: the origin plus four cardinal rays of up to
/// `radius` cells. A ray includes the first wall, obstacle, or other bomb it
/// reaches and stops there; cells behind a stopper are shielded.
pub fn blast_cross(
    origin: Pos,
    radius: i32,
    width: i32,
    height: i32,
    stoppers: &AHashSet<Pos>,
) -> AHashSet<Pos> {
    let mut out = AHashSet::new();
    let inside = |p: Pos| p.x >= 0 && p.x < width && p.y >= 0 && p.y < height;
    if inside(origin) {
        out.insert(origin);
    }
    for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
        for step in 1..=radius {
            let p = Pos::new(origin.x + dx * step, origin.y + dy * step);
            if !inside(p) {
                break;
            }
            out.insert(p);
            if stoppers.contains(&p) {
                break;
            }
        }
    }
    out
}

/// Per-snapshot danger verdicts: bomb coverage plus hostile adjacency.
///
/// Built once per decision cycle and shared by every unit's rules; a
/// hypothetical variant with one extra bomb backs the placement safety gate.
#[derive(Debug, Clone)]
pub struct Threat {
    width: i32,
    height: i32,
    /// Union of all blast crosses.
    danger: AHashSet<Pos>,
    /// Blast stoppers: walls, obstacles, and bomb cells.
    stoppers: AHashSet<Pos>,
    hostiles: Vec<Pos>,
    hostile_radius: i32,
}

impl Threat {
    pub fn of(state: &ArenaState, cfg: &BotConfig) -> Self {
        let mut stoppers: AHashSet<Pos> =
            AHashSet::with_capacity(state.walls.len() + state.obstacles.len() + state.bombs.len());
        stoppers.extend(state.walls.iter().copied());
        stoppers.extend(state.obstacles.iter().copied());
        stoppers.extend(state.bombs.iter().map(|b| b.pos));

        let mut danger = AHashSet::new();
        for bomb in &state.bombs {
            danger.extend(blast_cross(
                bomb.pos,
                bomb.radius,
                state.width,
                state.height,
                &stoppers,
            ));
        }

        Self {
            width: state.width,
            height: state.height,
            danger,
            stoppers,
            hostiles: state.hostile_cells().collect(),
            hostile_radius: cfg.hostile_radius,
        }
    }

    /// The classifier with one additional bomb assumed at `cell`. The new
    /// bomb also acts as a stopper for its own rays.
    pub fn with_hypothetical_bomb(&self, cell: Pos, radius: i32) -> Self {
        let mut next = self.clone();
        next.danger.extend(self.hypothetical_cross(cell, radius));
        next.stoppers.insert(cell);
        next
    }

    /// Blast cross of a bomb assumed at `cell`, against this snapshot's
    /// stoppers. Used to ask "would a bomb here reach that target".
    pub fn hypothetical_cross(&self, cell: Pos, radius: i32) -> AHashSet<Pos> {
        let mut stoppers = self.stoppers.clone();
        stoppers.insert(cell);
        blast_cross(cell, radius, self.width, self.height, &stoppers)
    }

    /// True if the position sits in any blast cross.
    pub fn in_blast(&self, pos: Pos) -> bool {
        self.danger.contains(&pos)
    }

    /// The danger verdict: blast coverage or a hostile within the adjacency
    /// threshold.
    pub fn is_in_danger(&self, pos: Pos) -> bool {
        self.in_blast(pos)
            || self
                .hostiles
                .iter()
                .any(|h| h.manhattan(pos) <= self.hostile_radius)
    }
}

/// Standalone verdict for a single position, independent of the decision
/// loop.
pub fn is_in_danger(pos: Pos, state: &ArenaState, cfg: &BotConfig) -> bool {
    Threat::of(state, cfg).is_in_danger(pos)
}
