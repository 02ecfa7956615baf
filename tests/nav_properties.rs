//! Property tests for the bounded BFS.

use ahash::AHashSet;
use blazebot::core::types::Pos;
use blazebot::nav::{nearest_matching, shortest_path, SearchCaps};
use blazebot::state::grid::Occupancy;
use proptest::prelude::*;

fn caps() -> SearchCaps {
    SearchCaps {
        max_nodes: 5000,
        max_len: 64,
    }
}

prop_compose! {
    fn grid_and_cells()(
        width in 4i32..16,
        height in 4i32..16,
        blocked_seed in prop::collection::vec((0i32..16, 0i32..16), 0..24),
        sx in 0i32..16,
        sy in 0i32..16,
        gx in 0i32..16,
        gy in 0i32..16,
    ) -> (Occupancy, Pos, Pos) {
        let start = Pos::new(sx % width, sy % height);
        let goal = Pos::new(gx % width, gy % height);
        let blocked: AHashSet<Pos> = blocked_seed
            .into_iter()
            .map(|(x, y)| Pos::new(x % width, y % height))
            .filter(|&p| p != start && p != goal)
            .collect();
        (Occupancy::new(width, height, blocked), start, goal)
    }
}

proptest! {
    #[test]
    fn search_is_deterministic((grid, start, goal) in grid_and_cells()) {
        let first = shortest_path(start, goal, &grid, caps());
        for _ in 0..3 {
            prop_assert_eq!(shortest_path(start, goal, &grid, caps()), first.clone());
        }
    }

    #[test]
    fn returned_paths_are_walkable((grid, start, goal) in grid_and_cells()) {
        if let Some(path) = shortest_path(start, goal, &grid, caps()) {
            let mut cur = start;
            for &step in &path {
                prop_assert!(cur.is_adjacent(step));
                prop_assert!(grid.is_free(step));
                cur = step;
            }
            if start != goal {
                prop_assert_eq!(*path.last().unwrap(), goal);
            } else {
                prop_assert!(path.is_empty());
            }
        }
    }

    #[test]
    fn open_grid_paths_have_manhattan_length(
        width in 4i32..16,
        height in 4i32..16,
        sx in 0i32..16, sy in 0i32..16,
        gx in 0i32..16, gy in 0i32..16,
    ) {
        let start = Pos::new(sx % width, sy % height);
        let goal = Pos::new(gx % width, gy % height);
        let grid = Occupancy::new(width, height, AHashSet::new());
        let path = shortest_path(start, goal, &grid, caps());
        prop_assert_eq!(
            path.map(|p| p.len()),
            Some(start.manhattan(goal) as usize)
        );
    }

    #[test]
    fn length_cap_is_a_hard_bound((grid, start, goal) in grid_and_cells()) {
        let tight = SearchCaps { max_nodes: 5000, max_len: 3 };
        if let Some(path) = shortest_path(start, goal, &grid, tight) {
            prop_assert!(path.len() <= 3);
        }
    }

    #[test]
    fn nearest_matching_start_match_is_empty((grid, start, _goal) in grid_and_cells()) {
        let path = nearest_matching(start, &grid, caps(), |_| true);
        prop_assert_eq!(path, Some(vec![]));
    }
}

#[test]
fn exhausted_node_budget_reports_not_found() {
    let grid = Occupancy::new(12, 12, AHashSet::new());
    let tiny = SearchCaps {
        max_nodes: 2,
        max_len: 64,
    };
    assert_eq!(
        shortest_path(Pos::new(0, 0), Pos::new(11, 11), &grid, tiny),
        None
    );
}

#[test]
fn beyond_length_cap_is_not_found_not_partial() {
    let grid = Occupancy::new(20, 20, AHashSet::new());
    let short = SearchCaps {
        max_nodes: 5000,
        max_len: 4,
    };
    assert_eq!(
        shortest_path(Pos::new(0, 0), Pos::new(10, 0), &grid, short),
        None
    );
}
