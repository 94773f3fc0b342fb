//! agents that can stand in for a real snake
use std::future::{ready, Future};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rand::rngs::SmallRng;
use rand::seq::IteratorRandom;
use rand::SeedableRng;

use crate::model::GameState;
use crate::types::{AgentClient, AgentError, Direction, Vector};

/// Answers with a fixed list of moves, one per call
#[derive(Debug)]
pub struct ScriptedAgent {
    moves: Vec<Direction>,
    turn: AtomicUsize,
}

impl ScriptedAgent {
    #[allow(missing_docs)]
    pub fn new(moves: Vec<Direction>) -> Self {
        ScriptedAgent {
            moves,
            turn: AtomicUsize::new(0),
        }
    }

    /// how many times the agent has been asked for a move
    pub fn calls(&self) -> usize {
        self.turn.load(Ordering::SeqCst)
    }
}

impl AgentClient for ScriptedAgent {
    fn choose_move(
        &self,
        _state: &GameState,
    ) -> impl Future<Output = Result<Direction, AgentError>> + Send {
        let turn = self.turn.fetch_add(1, Ordering::SeqCst);
        ready(self.moves.get(turn).copied().ok_or(AgentError::Exhausted(turn)))
    }
}

/// Picks a random move that stays on the board and off every snake, or any
/// move that does not turn back on its own neck if there is no such move.
#[derive(Debug)]
pub struct RandomReasonableAgent {
    rng: Mutex<SmallRng>,
}

impl RandomReasonableAgent {
    /// an agent whose choices are reproducible for a given seed
    pub fn seeded(seed: u64) -> Self {
        RandomReasonableAgent {
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }

    fn pick(&self, state: &GameState) -> Result<Direction, AgentError> {
        let head = state
            .you
            .head()
            .ok_or_else(|| AgentError::Transport("you have no body".to_string()))?;
        // the way you came in, if the neck is next to the head
        let last_move = state.you.body.get(1).and_then(|neck| {
            Direction::from_vector(Vector {
                x: (head.x - neck.x) as i64,
                y: (head.y - neck.y) as i64,
            })
        });
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| AgentError::Transport("rng lock poisoned".to_string()))?;

        let reasonable = Direction::all().into_iter().filter(|d| {
            let next = head.step(*d);
            !state.off_board(next)
                && !state
                    .all_snakes()
                    .filter(|s| !s.dead)
                    .any(|s| s.body.contains(&next))
        });
        let chosen = reasonable.choose(&mut *rng).or_else(|| {
            Direction::all()
                .into_iter()
                .filter(|d| last_move.map_or(true, |last| last.is_not_opposite(d)))
                .choose(&mut *rng)
        });
        Ok(chosen.unwrap_or(Direction::Up))
    }
}

impl AgentClient for RandomReasonableAgent {
    fn choose_move(
        &self,
        state: &GameState,
    ) -> impl Future<Output = Result<Direction, AgentError>> + Send {
        ready(self.pick(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conformance::{run_test, RunConfig};
    use crate::model::{from_ascii, TestCase};

    #[tokio::test]
    async fn test_scripted_agent_runs_out() {
        let state = from_ascii("0").unwrap();
        let agent = ScriptedAgent::new(vec![Direction::Left]);
        assert_eq!(agent.choose_move(&state).await.unwrap(), Direction::Left);
        assert!(matches!(
            agent.choose_move(&state).await,
            Err(AgentError::Exhausted(1))
        ));
        assert_eq!(agent.calls(), 2);
    }

    #[tokio::test]
    async fn test_random_agent_avoids_walls_and_snakes() {
        // only down is free: up is the wall, left is the neck, right is a
        let state = from_ascii("> 0 a\n_ _ _").unwrap();
        let agent = RandomReasonableAgent::seeded(7);
        for _ in 0..20 {
            assert_eq!(agent.choose_move(&state).await.unwrap(), Direction::Down);
        }
    }

    #[tokio::test]
    async fn test_random_agent_never_turns_back_when_trapped() {
        let state = from_ascii("> 0 a").unwrap();
        let agent = RandomReasonableAgent::seeded(3);
        for _ in 0..20 {
            assert_ne!(agent.choose_move(&state).await.unwrap(), Direction::Left);
        }
    }

    #[tokio::test]
    async fn test_random_agent_trapped_going_up_never_picks_down() {
        // came up from below, every neighbour is a wall or a snake
        let state = from_ascii("a 0 b\n_ ^ _").unwrap();
        let agent = RandomReasonableAgent::seeded(11);
        for _ in 0..20 {
            assert_ne!(agent.choose_move(&state).await.unwrap(), Direction::Down);
        }
    }

    #[tokio::test]
    async fn test_random_runs_always_finish() {
        let tc = TestCase {
            key: "open".to_string(),
            start_state: from_ascii("_ _ _ _\n_ _ _ _\n_ _ _ _\n0 < < _").unwrap(),
            acceptable_sequences: vec![
                vec![
                    [("0".to_string(), Direction::Up)].into_iter().collect(),
                    [("0".to_string(), Direction::Up)].into_iter().collect(),
                    [("0".to_string(), Direction::Right)].into_iter().collect(),
                ],
                vec![[("0".to_string(), Direction::Up)].into_iter().collect()],
            ],
        };
        for seed in 0..16 {
            let agent = RandomReasonableAgent::seeded(seed);
            let res = run_test(&tc, &agent, RunConfig::default()).await.unwrap();
            // up is the only reasonable opening, and it completes the short sequence
            assert!(res.passed);
        }
    }
}
