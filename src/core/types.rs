//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// A grid cell position.
///
/// Serializes as a two-element `[x, y]` array to match the arena wire format.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another cell.
    pub fn manhattan(&self, other: Pos) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// The four cardinal neighbors in fixed order: +x, -x, +y, -y.
    ///
    /// The order is part of the pathfinder's determinism contract; every
    /// search visits neighbors in exactly this sequence.
    pub fn neighbors4(&self) -> [Pos; 4] {
        [
            Pos::new(self.x + 1, self.y),
            Pos::new(self.x - 1, self.y),
            Pos::new(self.x, self.y + 1),
            Pos::new(self.x, self.y - 1),
        ]
    }

    /// True if the other cell is a cardinal neighbor of this one.
    pub fn is_adjacent(&self, other: Pos) -> bool {
        self.manhattan(other) == 1
    }
}

impl From<(i32, i32)> for Pos {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<Pos> for (i32, i32) {
    fn from(p: Pos) -> Self {
        (p.x, p.y)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Server-assigned opaque unit identifier.
///
/// Units have no identity across snapshots beyond this id; reconciliation is
/// by id, never by reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub String);

impl UnitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manhattan_distance() {
        let a = Pos::new(10, 10);
        let b = Pos::new(13, 8);
        assert_eq!(a.manhattan(b), 5);
        assert_eq!(b.manhattan(a), 5);
        assert_eq!(a.manhattan(a), 0);
    }

    #[test]
    fn test_neighbor_order_is_fixed() {
        let p = Pos::new(3, 7);
        let n = p.neighbors4();
        assert_eq!(n[0], Pos::new(4, 7));
        assert_eq!(n[1], Pos::new(2, 7));
        assert_eq!(n[2], Pos::new(3, 8));
        assert_eq!(n[3], Pos::new(3, 6));
    }

    #[test]
    fn test_adjacency() {
        let p = Pos::new(0, 0);
        assert!(p.is_adjacent(Pos::new(1, 0)));
        assert!(p.is_adjacent(Pos::new(0, -1)));
        assert!(!p.is_adjacent(Pos::new(1, 1)));
        assert!(!p.is_adjacent(p));
    }

    #[test]
    fn test_pos_wire_shape() {
        let p = Pos::new(4, 9);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "[4,9]");
        let back: Pos = serde_json::from_str("[4,9]").unwrap();
        assert_eq!(back, p);
    }
}
