use tracing::{instrument, trace, warn};

use super::GridCache;
use crate::model::Turn;
use crate::types::{Direction, SnakeId};

/// Moves every live snake named in the turn, then eliminates snakes.
///
/// Snakes are moved and checked in id order (you, then the enemies as listed),
/// which decides who gets a contested food and which collisions are still visible
/// once earlier snakes have been taken off the board.
///
/// There is no edge of the board: a head that leaves it is not indexed and the
/// snake carries on. Head to head contact does not compare lengths, the snake
/// checked first removes the other one.
#[instrument(level = "debug", skip_all)]
pub fn advance(cache: &mut GridCache, turn: &Turn) {
    for id in turn.keys() {
        if cache.snake_id(id).is_none() {
            warn!(snake = %id, "turn names a snake that is not on the board, ignoring it");
        }
    }

    let ids = cache.snake_ids().collect::<Vec<_>>();
    for sid in ids.iter() {
        let direction = match cache.snake(*sid) {
            Some(snake) if !snake.dead => turn.get(&snake.id).copied(),
            _ => None,
        };
        if let Some(direction) = direction {
            move_snake(cache, *sid, direction);
        }
    }

    for sid in ids {
        eliminate(cache, sid);
    }
    debug_assert!(cache.is_consistent());
}

fn move_snake(cache: &mut GridCache, sid: SnakeId, direction: Direction) {
    let head = match cache.snake(sid).and_then(|s| s.head()) {
        Some(head) => head,
        None => return,
    };
    let next = head.step(direction);
    let eaten = cache.cell(next).food;

    cache.push_head(sid, next);
    match eaten {
        Some(food) => {
            trace!(snake = sid.0, ?food, "ate");
            cache.remove_food(food);
        }
        None => cache.pop_tail(sid),
    }
}

/// Walks the body of `sid`. Any of its cells holding another snake's body kills it,
/// any of its cells holding another snake's head kills that other snake.
fn eliminate(cache: &mut GridCache, sid: SnakeId) {
    let body = match cache.snake(sid) {
        Some(snake) if !snake.dead => snake.body.clone(),
        _ => return,
    };

    for part in body {
        let others = cache
            .cell(part)
            .snakes
            .iter()
            .copied()
            .filter(|other| *other != sid)
            .collect::<Vec<_>>();

        if others.iter().any(|other| !cache.is_head(*other, part)) {
            trace!(snake = sid.0, ?part, "ran in to another snake's body");
            cache.kill(sid);
            return;
        }

        for other in others {
            if cache.is_head(other, part) && cache.kill(other) {
                trace!(snake = other.0, killed_by = sid.0, ?part, "head was run over");
            }
        }
    }
}
