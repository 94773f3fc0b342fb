//! types describing a board, the snakes on it and the test cases built from it
mod codec;

use crate::types::{Direction, Vector};
use fxhash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

pub use codec::{from_ascii, to_ascii, BoardError};

/// A cell on the board. `(0, 0)` is the top left, x grows to the right and y grows downward
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    #[allow(missing_docs)]
    pub x: i32,
    #[allow(missing_docs)]
    pub y: i32,
}

impl Coord {
    #[allow(missing_docs)]
    pub fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    /// the coord offset by the given vector
    pub fn add_vec(&self, v: Vector) -> Coord {
        Coord {
            x: (self.x as i64 + v.x) as i32,
            y: (self.y as i64 + v.y) as i32,
        }
    }

    /// the neighbouring coord in the given direction, whether or not it is on the board
    pub fn step(&self, direction: Direction) -> Coord {
        self.add_vec(direction.to_vector())
    }
}

/// Dimensions of a board, both always greater than zero
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    #[allow(missing_docs)]
    pub width: u32,
    #[allow(missing_docs)]
    pub height: u32,
}

/// A snake, body ordered from head to tail
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    #[allow(missing_docs)]
    pub id: String,
    #[allow(missing_docs)]
    pub body: VecDeque<Coord>,
    #[allow(missing_docs)]
    pub health: i32,
    #[allow(missing_docs)]
    pub dead: bool,
}

impl Snake {
    /// a live snake with full health
    pub fn new(id: impl Into<String>, body: Vec<Coord>) -> Self {
        Snake {
            id: id.into(),
            body: body.into(),
            health: 100,
            dead: false,
        }
    }

    /// the head of this snake, None only for a malformed empty body
    pub fn head(&self) -> Option<Coord> {
        self.body.front().copied()
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Everything the agent gets to see on a turn
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    #[allow(missing_docs)]
    pub you: Snake,
    #[allow(missing_docs)]
    pub enemies: Vec<Snake>,
    #[allow(missing_docs)]
    pub board_size: Size,
    #[allow(missing_docs)]
    pub food: FxHashSet<Coord>,
}

impl GameState {
    /// you first, then the enemies in the order they are listed
    pub fn all_snakes(&self) -> impl Iterator<Item = &Snake> {
        std::iter::once(&self.you).chain(self.enemies.iter())
    }

    /// mutable version of [GameState::all_snakes]
    pub fn all_snakes_mut(&mut self) -> impl Iterator<Item = &mut Snake> {
        std::iter::once(&mut self.you).chain(self.enemies.iter_mut())
    }

    /// find a snake by its string id
    pub fn snake(&self, id: &str) -> Option<&Snake> {
        self.all_snakes().find(|s| s.id == id)
    }

    /// the string ids of every snake, you first
    pub fn snake_ids(&self) -> Vec<String> {
        self.all_snakes().map(|s| s.id.clone()).collect()
    }

    /// whether the coord lies outside the board
    pub fn off_board(&self, coord: Coord) -> bool {
        coord.x < 0
            || coord.x >= self.board_size.width as i32
            || coord.y < 0
            || coord.y >= self.board_size.height as i32
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        write!(f, "{}", to_ascii(self))?;
        for snake in self.all_snakes() {
            write!(
                f,
                "({} health: {} length: {}{}) ",
                snake.id,
                snake.health,
                snake.len(),
                if snake.dead { " dead" } else { "" }
            )?;
        }
        Ok(())
    }
}

/// The direction each snake takes on one step, keyed by snake id
pub type Turn = FxHashMap<String, Direction>;

/// One acceptable playthrough, a turn per step
pub type Sequence = Vec<Turn>;

/// A start state plus every way of playing it that counts as passing
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    #[allow(missing_docs)]
    pub key: String,
    #[allow(missing_docs)]
    pub start_state: GameState,
    #[allow(missing_docs)]
    pub acceptable_sequences: Vec<Sequence>,
}

impl TestCase {
    /// whether at least one sequence has a turn in it
    pub fn has_playable_sequence(&self) -> bool {
        self.acceptable_sequences.iter().any(|s| !s.is_empty())
    }
}

/// Outcome of running one test case
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestResult {
    #[allow(missing_docs)]
    pub passed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_off_board() {
        let state = from_ascii("_ _ 0\n_ _ _").unwrap();
        assert!(!state.off_board(Coord::new(0, 0)));
        assert!(!state.off_board(Coord::new(2, 1)));
        assert!(state.off_board(Coord::new(3, 0)));
        assert!(state.off_board(Coord::new(0, 2)));
        assert!(state.off_board(Coord::new(-1, 0)));
    }

    #[test]
    fn test_step_uses_screen_coordinates() {
        let c = Coord::new(1, 1);
        assert_eq!(c.step(Direction::Up), Coord::new(1, 0));
        assert_eq!(c.step(Direction::Down), Coord::new(1, 2));
        assert_eq!(c.step(Direction::Left), Coord::new(0, 1));
        assert_eq!(c.step(Direction::Right), Coord::new(2, 1));
    }

    #[test]
    fn test_test_case_json_shape() {
        let json = r#"{
            "key": "dodge",
            "startState": {
                "you": {"id": "0", "body": [{"x": 1, "y": 1}, {"x": 0, "y": 1}], "health": 100, "dead": false},
                "enemies": [],
                "boardSize": {"width": 2, "height": 2},
                "food": [{"x": 0, "y": 0}]
            },
            "acceptableSequences": [[{"0": "up"}, {"0": "left"}]]
        }"#;
        let tc: TestCase = serde_json::from_str(json).unwrap();
        assert_eq!(tc.key, "dodge");
        assert_eq!(tc.start_state.you.head(), Some(Coord::new(1, 1)));
        assert!(tc.start_state.food.contains(&Coord::new(0, 0)));
        assert_eq!(tc.acceptable_sequences[0][1]["0"], Direction::Left);
        assert!(tc.has_playable_sequence());
        assert_eq!(tc.start_state, from_ascii("* _\n> 0").unwrap());
    }

    #[test]
    fn test_display_includes_board_and_snakes() {
        let state = from_ascii("_ _\n> 0").unwrap();
        let rendered = format!("{}", state);
        assert!(rendered.contains("> 0"));
        assert!(rendered.contains("(0 health: 100 length: 2)"));
    }
}
