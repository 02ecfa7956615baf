//! Bounded breadth-first grid search
//!
//! Two operations over a 4-connected occupancy map: shortest path to a goal
//! cell, and nearest cell satisfying a predicate. Both are capped by a
//! node-expansion limit and a path-length limit; breaching either cap yields
//! not-found, never a partial path. Neighbors are expanded in the fixed
//! order defined by `Pos::neighbors4`, which makes every result (including
//! tie-breaks) deterministic for identical inputs.

use crate::core::config::BotConfig;
use crate::core::types::Pos;
use crate::state::grid::Occupancy;
use ahash::AHashMap;
use std::collections::VecDeque;

/// Search limits, taken from configuration.
#[derive(Debug, Clone, Copy)]
pub struct SearchCaps {
    /// Maximum nodes dequeued before the search gives up.
    pub max_nodes: usize,
    /// Maximum accepted path length in steps.
    pub max_len: usize,
}

impl From<&BotConfig> for SearchCaps {
    fn from(cfg: &BotConfig) -> Self {
        Self {
            max_nodes: cfg.max_nodes,
            max_len: cfg.max_path,
        }
    }
}

/// Shortest path from `start` to `goal`, as the sequence of cells entered
/// (exclusive of `start`). `Some(vec![])` means already there; `None` means
/// unreachable within the caps or the goal is blocked.
pub fn shortest_path(
    start: Pos,
    goal: Pos,
    grid: &Occupancy,
    caps: SearchCaps,
) -> Option<Vec<Pos>> {
    if start == goal {
        return Some(Vec::new());
    }
    if grid.is_blocked(goal) {
        return None;
    }
    bfs(start, grid, caps, |p| p == goal)
}

/// Nearest cell (by step count) satisfying `pred`, as the sequence of cells
/// entered. The predicate is tested on frontier cells in expansion order, so
/// identical inputs always choose the identical cell.
pub fn nearest_matching(
    start: Pos,
    grid: &Occupancy,
    caps: SearchCaps,
    pred: impl Fn(Pos) -> bool,
) -> Option<Vec<Pos>> {
    if pred(start) {
        return Some(Vec::new());
    }
    bfs(start, grid, caps, pred)
}

fn bfs(
    start: Pos,
    grid: &Occupancy,
    caps: SearchCaps,
    accept: impl Fn(Pos) -> bool,
) -> Option<Vec<Pos>> {
    let mut queue: VecDeque<Pos> = VecDeque::new();
    let mut parent: AHashMap<Pos, Pos> = AHashMap::new();
    queue.push_back(start);
    parent.insert(start, start);

    let mut expanded = 0usize;
    while let Some(cur) = queue.pop_front() {
        expanded += 1;
        if expanded > caps.max_nodes {
            return None;
        }
        for next in grid.open_neighbors(cur) {
            if parent.contains_key(&next) {
                continue;
            }
            parent.insert(next, cur);
            if accept(next) {
                return reconstruct(start, next, &parent, caps.max_len);
            }
            queue.push_back(next);
        }
    }
    None
}

fn reconstruct(
    start: Pos,
    end: Pos,
    parent: &AHashMap<Pos, Pos>,
    max_len: usize,
) -> Option<Vec<Pos>> {
    let mut path = vec![end];
    let mut cur = end;
    while cur != start {
        cur = parent[&cur];
        if cur != start {
            path.push(cur);
        }
        if path.len() > max_len {
            // too long for the transport; a truncated path would strand the
            // unit short of the goal, so report not-found instead
            return None;
        }
    }
    path.reverse();
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::AHashSet;

    fn open_grid(w: i32, h: i32) -> Occupancy {
        Occupancy::new(w, h, AHashSet::new())
    }

    fn caps() -> SearchCaps {
        SearchCaps {
            max_nodes: 5_000,
            max_len: 30,
        }
    }

    #[test]
    fn test_shortest_path_length_equals_manhattan_on_open_grid() {
        let grid = open_grid(20, 20);
        let path = shortest_path(Pos::new(2, 2), Pos::new(7, 5), &grid, caps()).unwrap();
        assert_eq!(path.len(), 8);
        assert_eq!(*path.last().unwrap(), Pos::new(7, 5));
    }

    #[test]
    fn test_path_steps_are_contiguous_and_free() {
        let blocked = AHashSet::from_iter([Pos::new(3, 2), Pos::new(3, 3), Pos::new(3, 4)]);
        let grid = Occupancy::new(10, 10, blocked);
        let path = shortest_path(Pos::new(2, 3), Pos::new(4, 3), &grid, caps()).unwrap();
        let mut cur = Pos::new(2, 3);
        for &step in &path {
            assert!(cur.is_adjacent(step));
            assert!(grid.is_free(step));
            cur = step;
        }
        assert_eq!(cur, Pos::new(4, 3));
    }

    #[test]
    fn test_start_equals_goal() {
        let grid = open_grid(5, 5);
        assert_eq!(
            shortest_path(Pos::new(1, 1), Pos::new(1, 1), &grid, caps()),
            Some(vec![])
        );
    }

    #[test]
    fn test_blocked_goal_is_not_found() {
        let grid = Occupancy::new(5, 5, AHashSet::from_iter([Pos::new(3, 3)]));
        assert_eq!(
            shortest_path(Pos::new(0, 0), Pos::new(3, 3), &grid, caps()),
            None
        );
    }

    #[test]
    fn test_walled_off_goal_is_not_found() {
        // goal enclosed on all four sides
        let blocked = AHashSet::from_iter([
            Pos::new(4, 3),
            Pos::new(2, 3),
            Pos::new(3, 4),
            Pos::new(3, 2),
        ]);
        let grid = Occupancy::new(8, 8, blocked);
        assert_eq!(
            shortest_path(Pos::new(0, 0), Pos::new(3, 3), &grid, caps()),
            None
        );
    }

    #[test]
    fn test_node_cap_yields_not_found() {
        let grid = open_grid(100, 100);
        let tight = SearchCaps {
            max_nodes: 10,
            max_len: 300,
        };
        assert_eq!(
            shortest_path(Pos::new(0, 0), Pos::new(99, 99), &grid, tight),
            None
        );
    }

    #[test]
    fn test_length_cap_yields_not_found_not_partial() {
        let grid = open_grid(50, 50);
        let short = SearchCaps {
            max_nodes: 50_000,
            max_len: 5,
        };
        assert_eq!(
            shortest_path(Pos::new(0, 0), Pos::new(20, 0), &grid, short),
            None
        );
    }

    #[test]
    fn test_nearest_matching_picks_closest() {
        let grid = open_grid(20, 20);
        let targets = AHashSet::from_iter([Pos::new(5, 2), Pos::new(2, 9)]);
        let path = nearest_matching(Pos::new(2, 2), &grid, caps(), |p| targets.contains(&p))
            .unwrap();
        assert_eq!(*path.last().unwrap(), Pos::new(5, 2));
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_nearest_matching_on_start() {
        let grid = open_grid(5, 5);
        assert_eq!(
            nearest_matching(Pos::new(2, 2), &grid, caps(), |p| p == Pos::new(2, 2)),
            Some(vec![])
        );
    }

    #[test]
    fn test_determinism_across_repeated_calls() {
        let blocked = AHashSet::from_iter([Pos::new(5, 5), Pos::new(6, 4)]);
        let grid = Occupancy::new(12, 12, blocked);
        let first = shortest_path(Pos::new(1, 1), Pos::new(9, 8), &grid, caps());
        for _ in 0..20 {
            assert_eq!(
                shortest_path(Pos::new(1, 1), Pos::new(9, 8), &grid, caps()),
                first
            );
        }
    }
}
