//! Command assembly
//!
//! Pure transformation from per-unit decisions into the wire batch. This is
//! the last line of defense before the transport: paths are clipped to the
//! configured maximum and validated for step contiguity, bomb lists are
//! clamped to the unit's live bomb count, and every eligible unit appears in
//! the batch (empty arrays mean "no new orders", never "unit removed").

use crate::core::config::BotConfig;
use crate::core::types::Pos;
use crate::engine::plan::UnitDecision;
use crate::net::wire::UnitCommand;
use crate::state::model::ArenaState;
use ahash::AHashSet;

pub fn assemble(
    state: &ArenaState,
    decisions: &[UnitDecision],
    cfg: &BotConfig,
) -> Vec<UnitCommand> {
    // static terrain only: transient occupants (units, mobs) are arbitrated
    // by the server, not refused here
    let blocked: AHashSet<Pos> = state
        .walls
        .iter()
        .chain(state.obstacles.iter())
        .copied()
        .chain(state.bombs.iter().map(|b| b.pos))
        .collect();

    let mut commands = Vec::with_capacity(decisions.len());
    for d in decisions {
        let Some(unit) = state.units.iter().find(|u| u.id == d.unit) else {
            continue;
        };
        if !unit.alive || !unit.can_move {
            continue;
        }

        let path = clip_path(unit.pos, &d.decision.action.path, &blocked, cfg.max_path);
        let mut bombs = d.decision.action.bombs.clone();
        bombs.truncate(unit.bombs_available as usize);

        commands.push(UnitCommand {
            id: unit.id.clone(),
            path,
            bombs,
        });
    }
    commands
}

/// Truncate to the maximum length, then keep only the leading run of steps
/// that are each 4-adjacent to their predecessor and not blocked.
fn clip_path(start: Pos, path: &[Pos], blocked: &AHashSet<Pos>, max_path: usize) -> Vec<Pos> {
    let mut out = Vec::with_capacity(path.len().min(max_path));
    let mut cur = start;
    for &step in path.iter().take(max_path) {
        if !cur.is_adjacent(step) || blocked.contains(&step) {
            break;
        }
        out.push(step);
        cur = step;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::UnitId;
    use crate::engine::plan::{Action, Decision, RuleKind};
    use crate::state::model::testutil::{empty_arena, unit};

    fn decision(id: &str, action: Action) -> UnitDecision {
        UnitDecision {
            unit: UnitId::new(id),
            decision: Decision::new(RuleKind::Farm, action),
        }
    }

    #[test]
    fn test_path_is_clipped_to_max() {
        let mut st = empty_arena(50, 50);
        st.units.push(unit("a", Pos::new(0, 0), 1));
        let mut cfg = BotConfig::default();
        cfg.max_path = 4;
        let long: Vec<Pos> = (1..=10).map(|x| Pos::new(x, 0)).collect();
        let cmds = assemble(&st, &[decision("a", Action::walk(long))], &cfg);
        assert_eq!(cmds[0].path.len(), 4);
    }

    #[test]
    fn test_bombs_clamped_to_available() {
        let mut st = empty_arena(10, 10);
        st.units.push(unit("a", Pos::new(0, 0), 1));
        let action = Action {
            path: vec![Pos::new(1, 0)],
            bombs: vec![Pos::new(0, 0), Pos::new(1, 0)],
        };
        let cmds = assemble(&st, &[decision("a", action)], &BotConfig::default());
        assert_eq!(cmds[0].bombs.len(), 1);
    }

    #[test]
    fn test_discontiguous_path_is_cut() {
        let mut st = empty_arena(10, 10);
        st.units.push(unit("a", Pos::new(0, 0), 1));
        let action = Action::walk(vec![Pos::new(1, 0), Pos::new(3, 0), Pos::new(4, 0)]);
        let cmds = assemble(&st, &[decision("a", action)], &BotConfig::default());
        assert_eq!(cmds[0].path, vec![Pos::new(1, 0)]);
    }

    #[test]
    fn test_path_into_wall_is_cut() {
        let mut st = empty_arena(10, 10);
        st.walls.push(Pos::new(2, 0));
        st.units.push(unit("a", Pos::new(0, 0), 1));
        let action = Action::walk(vec![Pos::new(1, 0), Pos::new(2, 0), Pos::new(3, 0)]);
        let cmds = assemble(&st, &[decision("a", action)], &BotConfig::default());
        assert_eq!(cmds[0].path, vec![Pos::new(1, 0)]);
    }

    #[test]
    fn test_empty_action_still_emits_command() {
        let mut st = empty_arena(10, 10);
        st.units.push(unit("a", Pos::new(0, 0), 0));
        let cmds = assemble(&st, &[decision("a", Action::hold())], &BotConfig::default());
        assert_eq!(cmds.len(), 1);
        assert!(cmds[0].path.is_empty());
        assert!(cmds[0].bombs.is_empty());
    }

    #[test]
    fn test_dead_and_immobile_units_are_skipped() {
        let mut st = empty_arena(10, 10);
        let mut dead = unit("a", Pos::new(0, 0), 1);
        dead.alive = false;
        let mut stuck = unit("b", Pos::new(1, 1), 1);
        stuck.can_move = false;
        st.units.push(dead);
        st.units.push(stuck);
        let cmds = assemble(
            &st,
            &[
                decision("a", Action::walk(vec![Pos::new(1, 0)])),
                decision("b", Action::walk(vec![Pos::new(2, 1)])),
            ],
            &BotConfig::default(),
        );
        assert!(cmds.is_empty());
    }
}
