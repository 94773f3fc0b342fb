//! reading and writing boards in the ascii fixture notation
//!
//! ```plain
//! _ v < _
//! _ 0 * _
//! > > 1 _
//! ```
//! `_` is an empty cell, `*` is food, any other single character (other than
//! the markers below) is the head of the snake with that id. A body segment is
//! drawn as an arrow pointing at the segment closer to the head, so the body of
//! `0` above is `(1, 1), (1, 0), (2, 0)`.
use fxhash::{FxHashMap, FxHashSet};
use itertools::Itertools;
use tracing::instrument;

use super::{Coord, GameState, Size, Snake};
use crate::types::Direction;

const EMPTY: char = '_';
const FOOD: char = '*';
const MARKERS: [char; 4] = ['^', 'v', '<', '>'];
const YOU_ID: char = '0';

/// Everything that can be wrong with an ascii board
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// no non-blank rows
    #[error("board must have at least one row")]
    Empty,

    /// a row is shorter than the widest row
    #[error("all rows in board must be the same width, row {row} has {found} cells but the board is {width} wide")]
    NotRectangular {
        #[allow(missing_docs)]
        row: usize,
        #[allow(missing_docs)]
        width: usize,
        #[allow(missing_docs)]
        found: usize,
    },

    /// no snake with id `0`
    #[error("must have a snake with ID 0")]
    MissingYou,

    /// two heads drawn with the same id
    #[error("snake {id} has more than one head")]
    DuplicateSnake {
        #[allow(missing_docs)]
        id: char,
    },
}

/// the marker that leads from a cell to the neighbour in `direction`, in the order
/// neighbours are tried when walking a body
const BODY_LINKS: [(Direction, char); 4] = [
    (Direction::Up, 'v'),
    (Direction::Down, '^'),
    (Direction::Left, '>'),
    (Direction::Right, '<'),
];

struct Grid {
    rows: Vec<Vec<char>>,
}

impl Grid {
    fn get(&self, coord: Coord) -> Option<char> {
        if coord.x < 0 || coord.y < 0 {
            return None;
        }
        self.rows
            .get(coord.y as usize)
            .and_then(|row| row.get(coord.x as usize))
            .copied()
    }

    fn body_from(&self, head: Coord) -> Vec<Coord> {
        let mut body = vec![head];
        let mut seen: FxHashSet<Coord> = std::iter::once(head).collect();
        let mut current = head;
        loop {
            let next = BODY_LINKS.iter().find_map(|(dir, marker)| {
                let neighbour = current.step(*dir);
                (self.get(neighbour) == Some(*marker)).then_some(neighbour)
            });
            match next {
                // a marker cycle would otherwise walk forever
                Some(n) if seen.insert(n) => {
                    body.push(n);
                    current = n;
                }
                _ => return body,
            }
        }
    }
}

/// Parse an ascii board in to a game state. All snakes start with 100 health,
/// the snake `0` is you and every other snake is an enemy. Enemies with digit ids
/// come first in ascending order, the rest follow in the order their heads appear
/// reading the board row by row.
#[instrument(level = "trace", skip_all)]
pub fn from_ascii(ascii: &str) -> Result<GameState, BoardError> {
    let rows = ascii
        .lines()
        .map(|l| {
            l.chars()
                .filter(|c| !c.is_whitespace())
                .flat_map(char::to_lowercase)
                .collect_vec()
        })
        .filter(|l| !l.is_empty())
        .collect_vec();

    let width = rows.iter().map(Vec::len).max().ok_or(BoardError::Empty)?;
    if let Some((row, r)) = rows.iter().find_position(|r| r.len() != width) {
        return Err(BoardError::NotRectangular {
            row,
            width,
            found: r.len(),
        });
    }
    let height = rows.len();
    let grid = Grid { rows };

    let mut snakes: FxHashMap<char, Snake> = FxHashMap::default();
    let mut order = vec![];
    let mut food = FxHashSet::default();
    for (y, row) in grid.rows.iter().enumerate() {
        for (x, &ch) in row.iter().enumerate() {
            let coord = Coord::new(x as i32, y as i32);
            match ch {
                EMPTY => {}
                FOOD => {
                    food.insert(coord);
                }
                c if MARKERS.contains(&c) => {}
                id => {
                    if snakes.contains_key(&id) {
                        return Err(BoardError::DuplicateSnake { id });
                    }
                    snakes.insert(id, Snake::new(id.to_string(), grid.body_from(coord)));
                    order.push(id);
                }
            }
        }
    }

    order.sort_by_key(|id| (!id.is_ascii_digit(), id.to_digit(10)));
    let you = snakes
        .remove(&YOU_ID)
        .ok_or(BoardError::MissingYou)?;
    let enemies = order
        .into_iter()
        .filter_map(|id| snakes.remove(&id))
        .collect();

    Ok(GameState {
        you,
        enemies,
        board_size: Size {
            width: width as u32,
            height: height as u32,
        },
        food,
    })
}

fn marker_towards(from: Coord, to: Coord) -> Option<char> {
    let dir = Direction::from_vector(crate::types::Vector {
        x: (to.x - from.x) as i64,
        y: (to.y - from.y) as i64,
    })?;
    Some(match dir {
        Direction::Up => '^',
        Direction::Down => 'v',
        Direction::Left => '<',
        Direction::Right => '>',
    })
}

/// Render a game state in the notation [from_ascii] reads. Dead snakes and
/// anything off the board are left out, segments that are not next to the
/// segment before them are drawn as `?`.
pub fn to_ascii(state: &GameState) -> String {
    let width = state.board_size.width as usize;
    let height = state.board_size.height as usize;
    let mut rows = vec![vec![EMPTY; width]; height];
    let mut put = |coord: Coord, ch: char| {
        if !state.off_board(coord) {
            rows[coord.y as usize][coord.x as usize] = ch;
        }
    };

    for f in state.food.iter() {
        put(*f, FOOD);
    }
    for snake in state.all_snakes().filter(|s| !s.dead) {
        for (prev, part) in snake.body.iter().tuple_windows() {
            put(*part, marker_towards(*part, *prev).unwrap_or('?'));
        }
        if let Some(head) = snake.head() {
            put(head, snake.id.chars().next().unwrap_or('?'));
        }
    }

    rows.into_iter()
        .map(|r| r.into_iter().join(" ") + "\n")
        .collect()
}
