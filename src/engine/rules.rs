//! The per-unit priority machine
//!
//! An explicit ordered list of predicate/action pairs, evaluated top to
//! bottom with first-match-wins semantics. Every rule is a pure function of
//! the unit and the current snapshot, so re-deciding an unchanged snapshot
//! yields the identical action and skipped cycles can never desynchronize
//! behavior.

use crate::core::config::BotConfig;
use crate::core::types::{Pos, UnitId};
use crate::danger::Threat;
use crate::engine::plan::{Action, Decision, RuleKind};
use crate::nav::{self, SearchCaps};
use crate::state::grid::Occupancy;
use crate::state::model::{ArenaState, Unit};
use ahash::{AHashMap, AHashSet};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Everything one unit's rules may look at during a cycle.
pub struct DecisionContext<'a> {
    pub state: &'a ArenaState,
    pub cfg: &'a BotConfig,
    pub threat: &'a Threat,
    /// Occupancy as seen by this unit (other units block, its own cell is
    /// free).
    pub grid: Occupancy,
    /// Obstacle assigned to this unit for the cycle, if any. Assignment is
    /// computed once per cycle so two units never farm the same target.
    pub farm_target: Option<Pos>,
}

impl DecisionContext<'_> {
    fn caps(&self) -> SearchCaps {
        SearchCaps::from(self.cfg)
    }
}

/// A decision policy resolved from the registry at startup.
pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn decide_unit(&self, unit: &Unit, ctx: &DecisionContext) -> Decision;
}

type Rule = fn(&Unit, &DecisionContext) -> Option<Action>;

/// Evaluation order of the machine. First rule returning an action wins.
const RULES: &[(RuleKind, Rule)] = &[
    (RuleKind::Ineligible, ineligible),
    (RuleKind::Escape, escape),
    (RuleKind::Recover, recover),
    (RuleKind::HuntMob, hunt_mob),
    (RuleKind::HuntEnemy, hunt_enemy),
    (RuleKind::Chain, chain),
    (RuleKind::Farm, farm),
    (RuleKind::Scout, scout),
];

/// The default priority strategy: the full rule cascade.
pub struct PriorityStrategy;

impl Strategy for PriorityStrategy {
    fn name(&self) -> &'static str {
        "priority"
    }

    fn decide_unit(&self, unit: &Unit, ctx: &DecisionContext) -> Decision {
        for (kind, rule) in RULES {
            if let Some(action) = rule(unit, ctx) {
                return Decision::new(*kind, action);
            }
        }
        // scout always matches, but the machine should not rely on that
        // silently
        Decision::new(RuleKind::Hold, Action::hold())
    }
}

// === rules, in evaluation order ===

pub(crate) fn ineligible(unit: &Unit, _ctx: &DecisionContext) -> Option<Action> {
    if !unit.alive || !unit.can_move {
        Some(Action::hold())
    } else {
        None
    }
}

pub(crate) fn escape(unit: &Unit, ctx: &DecisionContext) -> Option<Action> {
    if !ctx.threat.is_in_danger(unit.pos) {
        return None;
    }
    let safe = nav::nearest_matching(unit.pos, &ctx.grid, ctx.caps(), |p| {
        !ctx.threat.is_in_danger(p)
    });
    match safe {
        Some(path) => Some(Action::walk(path)),
        // no safe cell within the search bound: hold rather than move along
        // a partial, still-dangerous route
        None => Some(Action::hold()),
    }
}

fn recover(unit: &Unit, ctx: &DecisionContext) -> Option<Action> {
    if unit.bombs_available > 0 {
        return None;
    }
    if ctx.cfg.recover_drift {
        let allies: Vec<Pos> = ctx
            .state
            .living_units()
            .filter(|u| u.id != unit.id)
            .map(|u| u.pos)
            .collect();
        if !allies.is_empty() {
            let toward = nav::nearest_matching(unit.pos, &ctx.grid, ctx.caps(), |p| {
                allies.iter().any(|a| a.manhattan(p) <= 1)
            });
            if let Some(path) = toward {
                return Some(Action::walk(path));
            }
        }
    }
    Some(Action::hold())
}

fn hunt_mob(unit: &Unit, ctx: &DecisionContext) -> Option<Action> {
    let target = nearest_in_range(
        unit.pos,
        ctx.state.active_mobs().map(|m| m.pos),
        ctx.cfg.hunt_range,
    )?;
    engage(unit, ctx, target)
}

fn hunt_enemy(unit: &Unit, ctx: &DecisionContext) -> Option<Action> {
    let target = nearest_in_range(
        unit.pos,
        ctx.state.enemies.iter().copied(),
        ctx.cfg.hunt_range,
    )?;
    engage(unit, ctx, target)
}

fn chain(unit: &Unit, ctx: &DecisionContext) -> Option<Action> {
    let obstacles: AHashSet<Pos> = ctx.state.obstacles.iter().copied().collect();
    for bomb in &ctx.state.bombs {
        let Some(fuse) = bomb.fuse else { continue };
        if fuse > ctx.cfg.chain_fuse_window {
            continue;
        }
        let cross = ctx.threat.hypothetical_cross(bomb.pos, bomb.radius);
        let mut covered: Vec<Pos> = cross
            .iter()
            .copied()
            .filter(|p| obstacles.contains(p))
            .collect();
        if covered.len() < 2 {
            continue;
        }
        // exploit the imminent blast: farm the covered obstacle nearest us
        covered.sort_by_key(|p| (unit.pos.manhattan(*p), p.x, p.y));
        return farm_at(unit, ctx, covered[0]);
    }
    None
}

fn farm(unit: &Unit, ctx: &DecisionContext) -> Option<Action> {
    let target = ctx.farm_target?;
    farm_at(unit, ctx, target)
}

pub(crate) fn scout(unit: &Unit, ctx: &DecisionContext) -> Option<Action> {
    Some(Action::walk(scout_walk(unit, ctx)))
}

// === shared helpers ===

/// Bomb-placement safety gate. The single place that authorizes a
/// placement: assume a bomb at `bomb_cell`, then require a non-empty escape
/// route from the unit's position to a cell the classifier calls safe. No
/// rule plants a bomb without a route from this function.
fn verify_placement(unit: &Unit, bomb_cell: Pos, ctx: &DecisionContext) -> Option<Vec<Pos>> {
    let threat = ctx
        .threat
        .with_hypothetical_bomb(bomb_cell, ctx.cfg.default_bomb_radius);
    let grid = ctx.grid.with_blocked(bomb_cell);
    let escape = nav::nearest_matching(unit.pos, &grid, ctx.caps(), |p| !threat.is_in_danger(p))?;
    if escape.is_empty() {
        None
    } else {
        Some(escape)
    }
}

/// Close in on a hostile; plant on the spot when the blast would reach it
/// and the safety gate approves.
fn engage(unit: &Unit, ctx: &DecisionContext, target: Pos) -> Option<Action> {
    if unit.bombs_available > 0 {
        let cross = ctx
            .threat
            .hypothetical_cross(unit.pos, ctx.cfg.default_bomb_radius);
        if cross.contains(&target) {
            if let Some(escape) = verify_placement(unit, unit.pos, ctx) {
                return Some(Action {
                    path: escape,
                    bombs: vec![unit.pos],
                });
            }
        }
    }
    let stand = stand_cell(target, unit.pos, &ctx.grid)?;
    let path = nav::shortest_path(unit.pos, stand, &ctx.grid, ctx.caps())?;
    if path.is_empty() {
        return None; // already in position with nothing to plant
    }
    Some(Action::walk(path))
}

/// Farm a specific obstacle: plant when adjacent, otherwise approach.
fn farm_at(unit: &Unit, ctx: &DecisionContext, target: Pos) -> Option<Action> {
    if unit.pos.is_adjacent(target) {
        return match verify_placement(unit, target, ctx) {
            Some(escape) => Some(Action {
                path: escape,
                bombs: vec![target],
            }),
            // no verified escape from here: keep the claim but do not place
            // this cycle
            None => Some(Action::hold()),
        };
    }
    let stand = stand_cell(target, unit.pos, &ctx.grid)?;
    let path = nav::shortest_path(unit.pos, stand, &ctx.grid, ctx.caps())?;
    if path.is_empty() {
        None
    } else {
        Some(Action::walk(path))
    }
}

/// Free cardinal neighbor of `target` closest to `from`; ties break on
/// coordinates so the choice is deterministic.
fn stand_cell(target: Pos, from: Pos, grid: &Occupancy) -> Option<Pos> {
    target
        .neighbors4()
        .into_iter()
        .filter(|&p| grid.is_free(p))
        .min_by_key(|p| (from.manhattan(*p), p.x, p.y))
}

fn nearest_in_range(from: Pos, cells: impl Iterator<Item = Pos>, range: i32) -> Option<Pos> {
    cells
        .filter(|p| from.manhattan(*p) <= range)
        .min_by_key(|p| (from.manhattan(*p), p.x, p.y))
}

/// Short walk that avoids blocked cells, dangerous cells, revisits, and
/// immediate backtracking. Seeded from the unit id so the walk is a pure
/// function of (unit, snapshot).
fn scout_walk(unit: &Unit, ctx: &DecisionContext) -> Vec<Pos> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed_from_id(&unit.id));
    let mut order = [(1, 0), (-1, 0), (0, 1), (0, -1)];
    order.shuffle(&mut rng);

    let mut cur = unit.pos;
    let mut visited = AHashSet::from_iter([cur]);
    let mut path = Vec::new();
    for _ in 0..ctx.cfg.scout_steps {
        let step = order.iter().map(|&(dx, dy)| Pos::new(cur.x + dx, cur.y + dy)).find(|&p| {
            ctx.grid.is_free(p) && !visited.contains(&p) && !ctx.threat.is_in_danger(p)
        });
        let Some(next) = step else { break };
        visited.insert(next);
        path.push(next);
        cur = next;
    }
    path
}

/// Stable fold of the id bytes (FNV-1a); `DefaultHasher` is randomized per
/// process and would break cross-run reproducibility.
fn seed_from_id(id: &UnitId) -> u64 {
    id.0
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325u64, |h, b| {
            (h ^ u64::from(b)).wrapping_mul(0x0000_0100_0000_01b3)
        })
}

/// Deterministic per-cycle obstacle assignment: units in id order each claim
/// their best unclaimed obstacle, so no two units farm the same cell within
/// one cycle while each unit's decision stays a pure function of the
/// snapshot plus its assignment.
pub fn assign_farm_targets(state: &ArenaState, cfg: &BotConfig) -> AHashMap<UnitId, Pos> {
    let mut out = AHashMap::new();
    if state.obstacles.is_empty() {
        return out;
    }
    let mut units: Vec<&Unit> = state
        .units
        .iter()
        .filter(|u| u.alive && u.can_move && u.bombs_available > 0)
        .collect();
    units.sort_by(|a, b| a.id.cmp(&b.id));

    let mut claimed: AHashSet<Pos> = AHashSet::new();
    for unit in units {
        let pick = state
            .obstacles
            .iter()
            .copied()
            .filter(|t| !claimed.contains(t))
            .min_by_key(|t| target_rank(unit.pos, *t, state, cfg));
        if let Some(t) = pick {
            claimed.insert(t);
            out.insert(unit.id.clone(), t);
        }
    }
    out
}

/// Lower ranks are better. With clustering on, obstacles in denser clusters
/// win; distance and coordinates break remaining ties deterministically.
fn target_rank(from: Pos, target: Pos, state: &ArenaState, cfg: &BotConfig) -> (i64, i32, i32, i32) {
    let cluster = if cfg.cluster_targets {
        -(state
            .obstacles
            .iter()
            .filter(|o| o.manhattan(target) <= cfg.cluster_radius)
            .count() as i64)
    } else {
        0
    };
    (cluster, from.manhattan(target), target.x, target.y)
}
