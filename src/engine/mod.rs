//! The decision engine: one decision per unit per cycle.

pub mod assembler;
pub mod plan;
pub mod registry;
pub mod rules;

pub use plan::{Action, Decision, RuleKind, UnitDecision};
pub use registry::StrategyRegistry;
pub use rules::{DecisionContext, PriorityStrategy, Strategy};

use crate::core::config::BotConfig;
use crate::danger::Threat;
use crate::state::grid::Occupancy;
use crate::state::model::{ArenaState, Unit};
use rayon::prelude::*;
use std::sync::Arc;

/// Runs the configured strategy over every unit of a snapshot.
///
/// Decisions are pure functions of the snapshot (plus the cycle's target
/// assignment), so units can be decided in parallel; rayon is engaged once
/// the squad is large enough to pay for it.
pub struct Engine {
    cfg: Arc<BotConfig>,
    strategy: Box<dyn Strategy>,
}

impl Engine {
    pub fn new(cfg: Arc<BotConfig>, strategy: Box<dyn Strategy>) -> Self {
        Self { cfg, strategy }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn decide(&self, state: &ArenaState) -> Vec<UnitDecision> {
        let threat = Threat::of(state, &self.cfg);
        let targets = rules::assign_farm_targets(state, &self.cfg);

        let decide_one = |unit: &Unit| {
            let ctx = DecisionContext {
                state,
                cfg: &self.cfg,
                threat: &threat,
                grid: Occupancy::for_unit(state, unit),
                farm_target: targets.get(&unit.id).copied(),
            };
            UnitDecision {
                unit: unit.id.clone(),
                decision: self.strategy.decide_unit(unit, &ctx),
            }
        };

        if state.units.len() >= self.cfg.parallel_threshold {
            state.units.par_iter().map(decide_one).collect()
        } else {
            state.units.iter().map(decide_one).collect()
        }
    }
}
