//! Per-unit decision outcomes

use crate::core::types::{Pos, UnitId};

/// Transient per-unit decision output: a movement path (cells entered, in
/// order) and zero or more bomb placements. Rebuilt every cycle, discarded
/// after the command batch is sent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Action {
    pub path: Vec<Pos>,
    pub bombs: Vec<Pos>,
}

impl Action {
    /// Empty action: the unit holds position.
    pub fn hold() -> Self {
        Self::default()
    }

    pub fn walk(path: Vec<Pos>) -> Self {
        Self {
            path,
            bombs: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty() && self.bombs.is_empty()
    }
}

/// Which rule of the priority machine produced an action. The ordering of
/// the variants mirrors evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Unit is dead or not movement-eligible.
    Ineligible,
    /// Current position is dangerous; move to the nearest safe cell.
    Escape,
    /// No bombs left; hold (or drift toward allies).
    Recover,
    /// An awake mob is in hunting range.
    HuntMob,
    /// An enemy is in hunting range.
    HuntEnemy,
    /// A bomb about to detonate covers several obstacles; exploit it.
    Chain,
    /// Approach an obstacle and plant next to it.
    Farm,
    /// Nothing else applies; short walk to uncover map.
    Scout,
    /// Deliberate no-op, used by the idle strategy.
    Hold,
}

/// Tagged decision outcome for one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub rule: RuleKind,
    pub action: Action,
}

impl Decision {
    pub fn new(rule: RuleKind, action: Action) -> Self {
        Self { rule, action }
    }
}

/// A decision paired with the unit it is for, ready for assembly.
#[derive(Debug, Clone)]
pub struct UnitDecision {
    pub unit: UnitId,
    pub decision: Decision,
}
