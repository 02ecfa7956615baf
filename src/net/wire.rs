//! Wire-level request and response shapes.
//!
//! The server's schema is looser than our snapshot types: bombs and enemies
//! arrive either as bare coordinate pairs or as objects, and several fields
//! are omitted outside of active rounds. Everything here decodes tolerantly
//! and then normalizes into [`ArenaState`] in one place.

use crate::core::types::{Pos, UnitId};
use crate::state::model::{ArenaState, Bomb, Mob, Unit};
use serde::{Deserialize, Serialize};

/// Body of `GET /arena`.
#[derive(Debug, Clone, Deserialize)]
pub struct ArenaResponse {
    #[serde(default)]
    pub round: String,
    pub map_size: (i32, i32),
    #[serde(default)]
    pub bombers: Vec<WireBomber>,
    #[serde(default)]
    pub arena: WireArena,
    #[serde(default)]
    pub enemies: Vec<WireEnemy>,
    #[serde(default)]
    pub mobs: Vec<WireMob>,
    #[serde(default)]
    pub raw_score: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireBomber {
    pub id: UnitId,
    pub pos: Pos,
    #[serde(default = "default_true")]
    pub alive: bool,
    #[serde(default = "default_true")]
    pub can_move: bool,
    #[serde(default)]
    pub armor: i32,
    #[serde(default)]
    pub bombs_available: u32,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireArena {
    #[serde(default)]
    pub walls: Vec<Pos>,
    #[serde(default)]
    pub obstacles: Vec<Pos>,
    #[serde(default)]
    pub bombs: Vec<WireBomb>,
}

/// A placed bomb on the wire: either `{"pos": [x, y], "range": r, "timer": t}`
/// or a bare `[x, y]` pair.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireBomb {
    Detailed {
        pos: Pos,
        #[serde(default)]
        range: Option<i32>,
        #[serde(default)]
        timer: Option<f32>,
    },
    Bare(Pos),
}

/// Enemies appear as objects with a `pos` field or as bare pairs.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireEnemy {
    Tagged {
        pos: Pos,
    },
    Bare(Pos),
}

impl WireEnemy {
    fn pos(&self) -> Pos {
        match *self {
            WireEnemy::Tagged { pos } | WireEnemy::Bare(pos) => pos,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireMob {
    pub id: String,
    pub pos: Pos,
    /// Seconds until the mob wakes up; positive means dormant.
    #[serde(default)]
    pub safe_time: i32,
}

impl ArenaResponse {
    /// Normalizes the wire shape into a snapshot. Bombs without an explicit
    /// range fall back to `default_radius`.
    pub fn into_state(self, default_radius: i32) -> ArenaState {
        let (width, height) = self.map_size;
        ArenaState {
            round: self.round,
            width,
            height,
            walls: self.arena.walls,
            obstacles: self.arena.obstacles,
            bombs: self
                .arena
                .bombs
                .into_iter()
                .map(|b| match b {
                    WireBomb::Detailed { pos, range, timer } => Bomb {
                        pos,
                        radius: range.unwrap_or(default_radius),
                        fuse: timer,
                    },
                    WireBomb::Bare(pos) => Bomb {
                        pos,
                        radius: default_radius,
                        fuse: None,
                    },
                })
                .collect(),
            units: self
                .bombers
                .into_iter()
                .map(|b| Unit {
                    id: b.id,
                    pos: b.pos,
                    alive: b.alive,
                    can_move: b.can_move,
                    armor: b.armor,
                    bombs_available: b.bombs_available,
                })
                .collect(),
            enemies: self.enemies.iter().map(WireEnemy::pos).collect(),
            mobs: self
                .mobs
                .into_iter()
                .map(|m| Mob {
                    id: m.id,
                    pos: m.pos,
                    dormant: m.safe_time > 0,
                })
                .collect(),
            raw_score: self.raw_score,
        }
    }
}

/// Body of `POST /move`.
#[derive(Debug, Clone, Serialize)]
pub struct MoveRequest {
    pub bombers: Vec<UnitCommand>,
}

/// One unit's order for the next tick. `path` lists the cells to step
/// through in order, excluding the current cell; `bombs` lists placement
/// cells. Both may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitCommand {
    pub id: UnitId,
    pub path: Vec<Pos>,
    pub bombs: Vec<Pos>,
}

/// Body of the `POST /move` reply. The server reports per-command problems
/// here instead of failing the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoveResponse {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "player": "team",
        "round": "round-7",
        "map_size": [40, 30],
        "bombers": [
            {"id": "u1", "alive": true, "pos": [4, 9], "armor": 1,
             "bombs_available": 2, "can_move": true}
        ],
        "arena": {
            "walls": [[0, 0], [1, 0]],
            "obstacles": [[5, 9]],
            "bombs": [
                {"pos": [7, 7], "range": 2, "timer": 1.5},
                [8, 8]
            ]
        },
        "enemies": [{"pos": [12, 12]}, [13, 13]],
        "mobs": [
            {"id": "m1", "type": "ghoul", "pos": [6, 6], "safe_time": 5},
            {"id": "m2", "type": "ghoul", "pos": [9, 9], "safe_time": 0}
        ],
        "raw_score": 420
    }"#;

    #[test]
    fn test_decodes_full_payload() {
        let resp: ArenaResponse = serde_json::from_str(SAMPLE).unwrap();
        let st = resp.into_state(3);
        assert_eq!(st.round, "round-7");
        assert_eq!((st.width, st.height), (40, 30));
        assert_eq!(st.units.len(), 1);
        assert_eq!(st.units[0].pos, Pos::new(4, 9));
        assert_eq!(st.units[0].bombs_available, 2);
        assert_eq!(st.walls.len(), 2);
        assert_eq!(st.obstacles, vec![Pos::new(5, 9)]);
        assert_eq!(st.raw_score, 420);
    }

    #[test]
    fn test_bombs_decode_both_shapes() {
        let resp: ArenaResponse = serde_json::from_str(SAMPLE).unwrap();
        let st = resp.into_state(3);
        assert_eq!(st.bombs.len(), 2);
        assert_eq!(st.bombs[0].pos, Pos::new(7, 7));
        assert_eq!(st.bombs[0].radius, 2);
        assert_eq!(st.bombs[0].fuse, Some(1.5));
        assert_eq!(st.bombs[1].pos, Pos::new(8, 8));
        assert_eq!(st.bombs[1].radius, 3);
        assert_eq!(st.bombs[1].fuse, None);
    }

    #[test]
    fn test_enemies_decode_both_shapes() {
        let resp: ArenaResponse = serde_json::from_str(SAMPLE).unwrap();
        let st = resp.into_state(3);
        assert_eq!(st.enemies, vec![Pos::new(12, 12), Pos::new(13, 13)]);
    }

    #[test]
    fn test_mob_safe_time_maps_to_dormant() {
        let resp: ArenaResponse = serde_json::from_str(SAMPLE).unwrap();
        let st = resp.into_state(3);
        assert!(st.mobs[0].dormant);
        assert!(!st.mobs[1].dormant);
    }

    #[test]
    fn test_missing_optional_sections_default() {
        let resp: ArenaResponse =
            serde_json::from_str(r#"{"map_size": [10, 10]}"#).unwrap();
        let st = resp.into_state(3);
        assert!(st.units.is_empty());
        assert!(st.bombs.is_empty());
        assert!(st.mobs.is_empty());
        assert_eq!(st.raw_score, 0);
    }

    #[test]
    fn test_move_request_wire_shape() {
        let req = MoveRequest {
            bombers: vec![UnitCommand {
                id: UnitId::new("u1"),
                path: vec![Pos::new(4, 10)],
                bombs: vec![Pos::new(5, 9)],
            }],
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "bombers": [{"id": "u1", "path": [[4, 10]], "bombs": [[5, 9]]}]
            })
        );
    }
}
