//! An index over a game state giving constant time cell lookup, plus the
//! movement and collision rules that advance it one turn at a time.
//!
//! The cache owns its own copy of the state so a run can mutate it freely
//! without touching the test case it was built from. Every mutation goes through
//! the cache, which keeps the cells in step with the snake bodies and food.
mod simulator;

use std::borrow::Cow;

use crate::model::{Coord, GameState, Snake};
use crate::types::{build_snake_id_map, SnakeIDMap, SnakeId};

pub use simulator::advance;

/// Everything sitting on one square of the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// where this cell is
    pub coord: Coord,
    /// one entry per body segment on this cell, so a snake overlapping itself
    /// shows up more than once
    pub snakes: Vec<SnakeId>,
    /// the food on this cell, if any
    pub food: Option<Coord>,
}

impl Cell {
    /// a cell with nothing on it
    pub fn empty(coord: Coord) -> Self {
        Cell {
            coord,
            snakes: vec![],
            food: None,
        }
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.snakes.is_empty() && self.food.is_none()
    }
}

/// Cell index over a private copy of a [GameState]
#[derive(Debug, Clone)]
pub struct GridCache {
    state: GameState,
    cells: Vec<Cell>,
    ids: SnakeIDMap,
}

impl GridCache {
    /// copy the state and index every live snake segment and every food
    pub fn new(state: &GameState) -> Self {
        let state = state.clone();
        let ids = build_snake_id_map(&state);
        let cells = index_cells(&state);
        GridCache { state, cells, ids }
    }

    /// the current state, as the agent should see it
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// give up the cache and keep the state
    pub fn into_state(self) -> GameState {
        self.state
    }

    /// the cell at `coord`. Coords off the board get a fresh empty cell
    pub fn cell(&self, coord: Coord) -> Cow<'_, Cell> {
        match self.cell_index(coord) {
            Some(i) => Cow::Borrowed(&self.cells[i]),
            None => Cow::Owned(Cell::empty(coord)),
        }
    }

    /// resolve the string id used in turns to the id used in cells
    pub fn snake_id(&self, id: &str) -> Option<SnakeId> {
        self.ids.get(id).copied()
    }

    /// every snake id in visiting order, you first
    pub fn snake_ids(&self) -> impl Iterator<Item = SnakeId> {
        (0..=self.state.enemies.len()).map(SnakeId)
    }

    /// look a snake up by id
    pub fn snake(&self, sid: SnakeId) -> Option<&Snake> {
        match sid.as_usize() {
            0 => Some(&self.state.you),
            n => self.state.enemies.get(n - 1),
        }
    }

    fn snake_mut(&mut self, sid: SnakeId) -> Option<&mut Snake> {
        match sid.as_usize() {
            0 => Some(&mut self.state.you),
            n => self.state.enemies.get_mut(n - 1),
        }
    }

    /// whether the given snake's head is on `coord`
    pub fn is_head(&self, sid: SnakeId, coord: Coord) -> bool {
        self.snake(sid).and_then(Snake::head) == Some(coord)
    }

    fn cell_index(&self, coord: Coord) -> Option<usize> {
        if self.state.off_board(coord) {
            None
        } else {
            Some(coord.y as usize * self.state.board_size.width as usize + coord.x as usize)
        }
    }

    fn cell_mut(&mut self, coord: Coord) -> Option<&mut Cell> {
        let i = self.cell_index(coord)?;
        self.cells.get_mut(i)
    }

    /// eat the food at `coord`, from both the board and the cells
    pub(crate) fn remove_food(&mut self, coord: Coord) {
        self.state.food.remove(&coord);
        if let Some(cell) = self.cell_mut(coord) {
            cell.food = None;
        }
    }

    /// put a new head on the front of the snake
    pub(crate) fn push_head(&mut self, sid: SnakeId, coord: Coord) {
        if let Some(snake) = self.snake_mut(sid) {
            snake.body.push_front(coord);
            if let Some(cell) = self.cell_mut(coord) {
                cell.snakes.push(sid);
            }
        }
    }

    /// drop the last segment of the snake
    pub(crate) fn pop_tail(&mut self, sid: SnakeId) {
        let removed = self.snake_mut(sid).and_then(|s| s.body.pop_back());
        if let Some(coord) = removed {
            self.vacate(sid, coord);
        }
    }

    fn vacate(&mut self, sid: SnakeId, coord: Coord) {
        if let Some(cell) = self.cell_mut(coord) {
            if let Some(i) = cell.snakes.iter().position(|s| *s == sid) {
                cell.snakes.remove(i);
            }
        }
    }

    /// Mark a snake dead and take all of its segments off the cells. Killing a
    /// dead snake does nothing. Returns whether the snake was alive.
    pub(crate) fn kill(&mut self, sid: SnakeId) -> bool {
        let body = match self.snake_mut(sid) {
            Some(snake) if !snake.dead => {
                snake.dead = true;
                snake.body.clone()
            }
            _ => return false,
        };
        for part in body {
            self.vacate(sid, part);
        }
        true
    }

    /// Checks the cells against an index freshly built from the state. Segment
    /// order within a cell is ignored.
    pub fn is_consistent(&self) -> bool {
        let fresh = index_cells(&self.state);
        fresh.len() == self.cells.len()
            && fresh.iter().zip(self.cells.iter()).all(|(a, b)| {
                let mut a_snakes = a.snakes.clone();
                let mut b_snakes = b.snakes.clone();
                a_snakes.sort();
                b_snakes.sort();
                a.coord == b.coord && a.food == b.food && a_snakes == b_snakes
            })
    }
}

fn index_cells(state: &GameState) -> Vec<Cell> {
    let width = state.board_size.width as i32;
    let height = state.board_size.height as i32;
    let mut cells = (0..height)
        .flat_map(|y| (0..width).map(move |x| Cell::empty(Coord::new(x, y))))
        .collect::<Vec<_>>();
    let index = |c: &Coord| (c.y * width + c.x) as usize;

    for f in state.food.iter().filter(|f| !state.off_board(**f)) {
        cells[index(f)].food = Some(*f);
    }
    for (i, snake) in state.all_snakes().enumerate().filter(|(_, s)| !s.dead) {
        for part in snake.body.iter().filter(|p| !state.off_board(**p)) {
            cells[index(part)].snakes.push(SnakeId(i));
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::from_ascii;

    fn fixture() -> GridCache {
        let state = from_ascii(
            "
            * _ v
            > v 0
            _ v _
            _ > a",
        )
        .unwrap();
        GridCache::new(&state)
    }

    #[test]
    fn test_indexes_snakes_and_food() {
        let cache = fixture();
        assert_eq!(cache.cell(Coord::new(0, 0)).food, Some(Coord::new(0, 0)));
        assert_eq!(cache.cell(Coord::new(2, 0)).snakes, vec![SnakeId(0)]);
        assert_eq!(cache.cell(Coord::new(1, 2)).snakes, vec![SnakeId(1)]);
        assert!(cache.cell(Coord::new(0, 2)).is_empty());
        assert!(cache.is_head(SnakeId(1), Coord::new(2, 3)));
        assert!(cache.is_consistent());
    }

    #[test]
    fn test_off_board_lookup_is_empty() {
        let cache = fixture();
        for coord in [
            Coord::new(-1, 1),
            Coord::new(3, 0),
            Coord::new(0, 4),
            Coord::new(0, -1),
        ] {
            let cell = cache.cell(coord);
            assert_eq!(cell.coord, coord);
            assert!(cell.is_empty());
        }
    }

    #[test]
    fn test_snake_lookup() {
        let cache = fixture();
        assert_eq!(cache.snake_id("a"), Some(SnakeId(1)));
        assert_eq!(cache.snake_id("z"), None);
        assert_eq!(cache.snake(SnakeId(1)).map(|s| s.id.as_str()), Some("a"));
        assert!(cache.snake(SnakeId(2)).is_none());
        assert_eq!(cache.snake_ids().collect::<Vec<_>>(), vec![SnakeId(0), SnakeId(1)]);
    }

    #[test]
    fn test_copy_does_not_alias() {
        let state = from_ascii("_ _\n> 0").unwrap();
        let mut cache = GridCache::new(&state);
        cache.pop_tail(SnakeId::YOU);
        assert_eq!(state.you.len(), 2);
        assert_eq!(cache.state().you.len(), 1);
        assert!(cache.cell(Coord::new(0, 1)).snakes.is_empty());
        assert!(cache.is_consistent());
    }

    #[test]
    fn test_kill_is_idempotent() {
        let mut cache = fixture();
        assert!(cache.kill(SnakeId(1)));
        assert!(!cache.kill(SnakeId(1)));
        assert!(cache.snake(SnakeId(1)).map(|s| s.dead).unwrap_or(false));
        assert!(cache.cell(Coord::new(2, 3)).snakes.is_empty());
        assert!(cache.is_consistent());
    }

    #[test]
    fn test_remove_food() {
        let mut cache = fixture();
        cache.remove_food(Coord::new(0, 0));
        assert!(cache.state().food.is_empty());
        assert_eq!(cache.cell(Coord::new(0, 0)).food, None);
        assert!(cache.is_consistent());
    }
}
