#![deny(
    warnings,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs
)]
//! Conformance testing for [battlesnake](https://docs.battlesnake.com/) agents.
//! A test case is a start board plus every sequence of moves that counts as playing
//! it correctly. The agent is asked for one move per turn, the board is simulated
//! forward, and the run passes once the agent has played one of the sequences all
//! the way through.
//!
//! Boards are written by hand in a small ascii notation and every fixture is run in
//! all eight rotations and mirror images, which shakes out agents that quietly
//! prefer one direction.
//! ```
//! # use battlesnake_conformance::{conformance::{run_test, RunConfig}, agent::ScriptedAgent};
//! # use battlesnake_conformance::{model::{from_ascii, TestCase}, types::Direction};
//! # #[tokio::main]
//! # async fn main() {
//! let tc = TestCase {
//!     key: "dodge".to_string(),
//!     start_state: from_ascii("_ _\n> 0").unwrap(),
//!     acceptable_sequences: vec![vec![
//!         [("0".to_string(), Direction::Up)].into_iter().collect(),
//!         [("0".to_string(), Direction::Left)].into_iter().collect(),
//!     ]],
//! };
//! let agent = ScriptedAgent::new(vec![Direction::Up, Direction::Left]);
//! let result = run_test(&tc, &agent, RunConfig::default()).await.unwrap();
//! assert!(result.passed);
//! # }
//! ```

use conformance::Fixture;
use model::TestCase;

pub mod agent;
pub mod conformance;
pub mod grid;
pub mod model;
pub mod store;
pub mod types;
pub mod variations;

/// Loads a test case from its json form
pub fn test_case_fixture(json: &str) -> Result<TestCase, serde_json::Error> {
    serde_json::from_str(json)
}

/// Loads a hand written fixture (ascii board plus sequences) from json
pub fn fixture_from_json(json: &str) -> Result<Fixture, serde_json::Error> {
    serde_json::from_str(json)
}
