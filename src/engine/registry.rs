//! Named strategy registry
//!
//! Strategies are resolved once at startup by name; there is no runtime
//! plug-in discovery. Alternate strategies exist mainly for field debugging:
//! `idle` parks the squad, `scout` keeps units moving without ever planting.

use crate::engine::plan::{Action, Decision, RuleKind};
use crate::engine::rules::{self, DecisionContext, PriorityStrategy, Strategy};
use crate::state::model::Unit;

/// Always holds position.
pub struct IdleStrategy;

impl Strategy for IdleStrategy {
    fn name(&self) -> &'static str {
        "idle"
    }

    fn decide_unit(&self, _unit: &Unit, _ctx: &DecisionContext) -> Decision {
        Decision::new(RuleKind::Hold, Action::hold())
    }
}

/// Walks and evades, never plants.
pub struct ScoutStrategy;

impl Strategy for ScoutStrategy {
    fn name(&self) -> &'static str {
        "scout"
    }

    fn decide_unit(&self, unit: &Unit, ctx: &DecisionContext) -> Decision {
        if let Some(action) = rules::ineligible(unit, ctx) {
            return Decision::new(RuleKind::Ineligible, action);
        }
        if let Some(action) = rules::escape(unit, ctx) {
            return Decision::new(RuleKind::Escape, action);
        }
        match rules::scout(unit, ctx) {
            Some(action) => Decision::new(RuleKind::Scout, action),
            None => Decision::new(RuleKind::Hold, Action::hold()),
        }
    }
}

type Factory = fn() -> Box<dyn Strategy>;

pub struct StrategyRegistry {
    factories: Vec<(&'static str, Factory)>,
}

impl StrategyRegistry {
    /// The built-in strategy set.
    pub fn builtin() -> Self {
        Self {
            factories: vec![
                ("priority", || Box::new(PriorityStrategy)),
                ("idle", || Box::new(IdleStrategy)),
                ("scout", || Box::new(ScoutStrategy)),
            ],
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.factories.iter().map(|(n, _)| *n).collect()
    }

    pub fn create(&self, name: &str) -> Option<Box<dyn Strategy>> {
        self.factories
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, f)| f())
    }
}
