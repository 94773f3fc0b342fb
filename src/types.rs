//! various types that are useful for driving a battlesnake agent through a fixture
use crate::model::{GameState, TestCase};
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Maps the string ids used in fixtures to the dense `SnakeId`s used by the grid.
/// Build it once per game state with [build_snake_id_map].
pub type SnakeIDMap = FxHashMap<String, SnakeId>;

/// A vector with which to do positional math
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vector {
    /// x offset
    pub x: i64,
    /// y offset
    pub y: i64,
}

/// Represents a direction a snake can move in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[allow(missing_docs)]
    Up,
    #[allow(missing_docs)]
    Down,
    #[allow(missing_docs)]
    Left,
    #[allow(missing_docs)]
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

impl Direction {
    /// convert this direction to a vector. (0, 0) is the top left of the board, so
    /// going up decreases y.
    pub fn to_vector(self) -> Vector {
        match self {
            Direction::Left => Vector { x: -1, y: 0 },
            Direction::Right => Vector { x: 1, y: 0 },
            Direction::Up => Vector { x: 0, y: -1 },
            Direction::Down => Vector { x: 0, y: 1 },
        }
    }

    /// create a Direction from a unit vector, None for anything else
    pub fn from_vector(vector: Vector) -> Option<Self> {
        match vector {
            Vector { x: -1, y: 0 } => Some(Self::Left),
            Vector { x: 1, y: 0 } => Some(Self::Right),
            Vector { x: 0, y: -1 } => Some(Self::Up),
            Vector { x: 0, y: 1 } => Some(Self::Down),
            _ => None,
        }
    }

    /// returns all possible directions
    pub fn all() -> [Direction; 4] {
        [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ]
    }

    /// checks if a given direction is not opposite this one. e.g. Up is not opposite to Left, but is opposite to Down
    pub fn is_not_opposite(&self, other: &Direction) -> bool {
        !matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    /// the direction after turning the board 90 degrees clockwise
    pub fn rotated(self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    /// the direction after flipping the board over its vertical axis
    pub fn mirrored(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            other => other,
        }
    }
}

/// token to represent a snake within a single game state
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct SnakeId(pub usize);

impl SnakeId {
    /// the id that "you" always has
    pub const YOU: SnakeId = SnakeId(0);

    /// convert this snake ID to a usize
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

/// builds a snake ID map for a given state, mapping snakes to
/// integers. The snake in "you" is always ID 0, enemies follow in
/// the order they are listed.
pub fn build_snake_id_map(state: &GameState) -> SnakeIDMap {
    state
        .all_snakes()
        .enumerate()
        .map(|(i, s)| (s.id.clone(), SnakeId(i)))
        .collect()
}

/// Errors an agent can produce while being asked for a move
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// the agent did not answer within the configured timeout
    #[error("agent did not answer within {0:?}")]
    Timeout(Duration),

    /// the request or the response was broken
    #[error("agent transport failed: {0}")]
    Transport(String),

    /// a scripted agent was asked for more moves than it has
    #[error("scripted agent has no move left for turn {0}")]
    Exhausted(usize),
}

/// The agent under test. Given the current board it decides where "you" goes next.
pub trait AgentClient {
    /// ask the agent for its move on the given state
    fn choose_move(
        &self,
        state: &GameState,
    ) -> impl Future<Output = Result<Direction, AgentError>> + Send;
}

/// Errors from saving test cases
#[derive(Debug, Clone, Copy, thiserror::Error)]
pub enum StoreError {
    /// test cases need a non-empty key to be stored under
    #[error("test case key must not be empty")]
    EmptyKey,
}

/// Somewhere test cases can be written to, keyed by `TestCase::key`
pub trait TestCaseStore {
    /// persist a test case, replacing any earlier one with the same key
    fn save_test_case(&mut self, tc: &TestCase) -> Result<(), StoreError>;
}

/// Instruments to be used while running a test case
pub trait RunInstruments: std::fmt::Debug {
    /// called with the wall time of every answered agent call
    fn observe_agent_call(&self, duration: Duration);
}

/// Instruments that throw every observation away
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopInstruments;

impl RunInstruments for NoopInstruments {
    fn observe_agent_call(&self, _duration: Duration) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{from_ascii, Coord, Snake};

    #[test]
    fn test_direction_from_vector() {
        for dir in Direction::all() {
            assert_eq!(Direction::from_vector(dir.to_vector()), Some(dir));
        }
        assert_eq!(Direction::from_vector(Vector { x: 1, y: 1 }), None);
    }

    #[test]
    fn test_rotate_and_mirror_close() {
        for dir in Direction::all() {
            assert_eq!(dir.rotated().rotated().rotated().rotated(), dir);
            assert_eq!(dir.mirrored().mirrored(), dir);
            assert!(!dir.is_not_opposite(&dir.rotated().rotated()));
        }
        assert_eq!(Direction::Up.mirrored(), Direction::Up);
        assert_eq!(Direction::Left.mirrored(), Direction::Right);
    }

    #[test]
    fn test_direction_serializes_lowercase() {
        let s = serde_json::to_string(&Direction::Left).unwrap();
        assert_eq!(s, "\"left\"");
        let d: Direction = serde_json::from_str("\"down\"").unwrap();
        assert_eq!(d, Direction::Down);
    }

    #[test]
    fn test_snake_id_map() {
        let state = from_ascii(
            "
            a _ 0
            _ _ <
            b _ _",
        )
        .unwrap();
        let map = build_snake_id_map(&state);
        assert_eq!(map.get("0"), Some(&SnakeId::YOU));
        assert_eq!(map.get("a"), Some(&SnakeId(1)));
        assert_eq!(map.get("b"), Some(&SnakeId(2)));
    }

    #[test]
    fn test_snake_id_map_does_not_wrap() {
        let mut state = from_ascii("0").unwrap();
        state.enemies = (1..=300)
            .map(|i| Snake::new(format!("e{}", i), vec![Coord::new(i, 1)]))
            .collect();
        let map = build_snake_id_map(&state);
        assert_eq!(map.len(), 301);
        assert_eq!(map.get("e256"), Some(&SnakeId(256)));
        assert_eq!(map.get("e300"), Some(&SnakeId(300)));
        assert_eq!(map.values().filter(|sid| **sid == SnakeId::YOU).count(), 1);
    }
}
