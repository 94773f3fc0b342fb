//! Multiplying one test case in to eight by rotating and mirroring the board.
//!
//! A fixture that only passes in one orientation usually means the agent has a
//! bias towards some direction, so every fixture is run in all eight.

use crate::model::{Coord, GameState, Size, TestCase};
use crate::types::Direction;

/// Rotates the board and every move in the sequences 90 degrees clockwise.
/// A `W x H` board becomes `H x W`.
pub fn rotate(tc: &TestCase) -> TestCase {
    let size = tc.start_state.board_size;
    transform(
        tc,
        |c| Coord::new(size.height as i32 - c.y - 1, c.x),
        Size {
            width: size.height,
            height: size.width,
        },
        Direction::rotated,
    )
}

/// Flips the board and every move in the sequences over the vertical axis, so
/// whatever was on the left pointing right is now on the right pointing left.
pub fn mirror(tc: &TestCase) -> TestCase {
    let size = tc.start_state.board_size;
    transform(
        tc,
        |c| Coord::new(size.width as i32 - c.x - 1, c.y),
        size,
        Direction::mirrored,
    )
}

/// The eight orientations of a test case: the four rotations of the input
/// followed by the four rotations of its mirror image. The first entry is the
/// test case itself.
pub fn variations(tc: &TestCase) -> [TestCase; 8] {
    let r90 = rotate(tc);
    let r180 = rotate(&r90);
    let r270 = rotate(&r180);
    let m0 = mirror(tc);
    let m90 = rotate(&m0);
    let m180 = rotate(&m90);
    let m270 = rotate(&m180);
    [tc.clone(), r90, r180, r270, m0, m90, m180, m270]
}

fn transform(
    tc: &TestCase,
    coord: impl Fn(Coord) -> Coord,
    size: Size,
    direction: impl Fn(Direction) -> Direction,
) -> TestCase {
    let mut state: GameState = tc.start_state.clone();
    for snake in state.all_snakes_mut() {
        for part in snake.body.iter_mut() {
            *part = coord(*part);
        }
    }
    state.food = state.food.iter().map(|f| coord(*f)).collect();
    state.board_size = size;

    let acceptable_sequences = tc
        .acceptable_sequences
        .iter()
        .map(|seq| {
            seq.iter()
                .map(|turn| {
                    turn.iter()
                        .map(|(id, d)| (id.clone(), direction(*d)))
                        .collect()
                })
                .collect()
        })
        .collect();

    TestCase {
        key: tc.key.clone(),
        start_state: state,
        acceptable_sequences,
    }
}
