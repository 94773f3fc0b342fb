//! Driving an agent through a test case one turn at a time.
//!
//! A run starts with every acceptable sequence still viable. Each turn the agent is
//! shown the current board and asked for a move, and any sequence that would have
//! moved differently at that step is dropped. The run fails once nothing is
//! viable and passes as soon as a viable sequence has been played to its end.
//! While it is still undecided the board is advanced, so the agent always sees
//! the consequence of its previous move.
mod fixture;

use std::fmt;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::grid::{self, GridCache};
use crate::model::{BoardError, Sequence, TestCase, TestResult};
use crate::types::{AgentClient, AgentError, Direction, NoopInstruments, RunInstruments};
use crate::variations::variations;

pub use fixture::Fixture;

/// battlesnake's default move timeout
const DEFAULT_AGENT_TIMEOUT_MS: u64 = 500;

/// Settings for a run
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct RunConfig {
    /// how long the agent gets to answer each turn before the run errors out
    pub agent_timeout_ms: u64,
}

impl RunConfig {
    #[allow(missing_docs)]
    pub fn agent_timeout(&self) -> Duration {
        Duration::from_millis(self.agent_timeout_ms)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            agent_timeout_ms: DEFAULT_AGENT_TIMEOUT_MS,
        }
    }
}

/// Where a run is at
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// still asking the agent for moves
    Pending,
    /// the agent made a move no acceptable sequence allows
    Fail,
    /// the agent played an acceptable sequence to the end
    Success,
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Pending => write!(f, "pending"),
            TestStatus::Fail => write!(f, "fail"),
            TestStatus::Success => write!(f, "success"),
        }
    }
}

/// Reasons a run could not produce a result
#[derive(Debug, thiserror::Error)]
pub enum ConformanceError {
    /// there is nothing to check the agent against
    #[error("test case {key}: must have at least one sequence of non-zero length")]
    NoAcceptableSequences {
        #[allow(missing_docs)]
        key: String,
    },

    /// the fixture's ascii board could not be read
    #[error("test case {key}: bad board")]
    Board {
        #[allow(missing_docs)]
        key: String,
        #[allow(missing_docs)]
        #[source]
        source: BoardError,
    },

    /// a sequence moves a snake that is not on the board
    #[error("test case {key}: step {step} of a sequence moves unknown snake {id}")]
    UnknownSnake {
        #[allow(missing_docs)]
        key: String,
        #[allow(missing_docs)]
        step: usize,
        #[allow(missing_docs)]
        id: String,
    },

    /// advance was called on a run that already has a verdict
    #[error("test case {key}: cannot advance past step {step}, the run has already reached {status}")]
    AlreadyFinished {
        #[allow(missing_docs)]
        key: String,
        #[allow(missing_docs)]
        step: usize,
        #[allow(missing_docs)]
        status: TestStatus,
    },

    /// asking the agent for a move failed, the run cannot continue
    #[error("test case {key}: agent failed at step {step}")]
    Agent {
        #[allow(missing_docs)]
        key: String,
        #[allow(missing_docs)]
        step: usize,
        #[allow(missing_docs)]
        #[source]
        source: AgentError,
    },

    /// advance was called again after the agent failed
    #[error("test case {key}: run was aborted at step {step} and cannot continue")]
    Aborted {
        #[allow(missing_docs)]
        key: String,
        #[allow(missing_docs)]
        step: usize,
    },
}

/// A single run of one test case against one agent
pub struct TestContext<'a, C> {
    tc: &'a TestCase,
    client: &'a C,
    config: RunConfig,
    instruments: &'a (dyn RunInstruments + Sync),
    cache: GridCache,
    step: usize,
    status: TestStatus,
    aborted: bool,
    viable_sequences: Vec<&'a Sequence>,
}

impl<'a, C> fmt::Debug for TestContext<'a, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestContext")
            .field("key", &self.tc.key)
            .field("step", &self.step)
            .field("status", &self.status)
            .field("viable_sequences", &self.viable_sequences.len())
            .finish()
    }
}

impl<'a, C: AgentClient> TestContext<'a, C> {
    /// Set up a run. Fails if no sequence has a move in it, or if any sequence
    /// moves a snake the start state does not have.
    pub fn new(
        tc: &'a TestCase,
        client: &'a C,
        config: RunConfig,
    ) -> Result<Self, ConformanceError> {
        if !tc.has_playable_sequence() {
            return Err(ConformanceError::NoAcceptableSequences {
                key: tc.key.clone(),
            });
        }
        for seq in tc.acceptable_sequences.iter() {
            for (step, turn) in seq.iter().enumerate() {
                if let Some(id) = turn.keys().find(|id| tc.start_state.snake(id).is_none()) {
                    return Err(ConformanceError::UnknownSnake {
                        key: tc.key.clone(),
                        step,
                        id: id.clone(),
                    });
                }
            }
        }

        Ok(TestContext {
            tc,
            client,
            config,
            instruments: &NoopInstruments,
            cache: GridCache::new(&tc.start_state),
            step: 0,
            status: TestStatus::Pending,
            aborted: false,
            viable_sequences: tc.acceptable_sequences.iter().collect(),
        })
    }

    /// report agent call timings to the given instruments
    pub fn with_instruments(mut self, instruments: &'a (dyn RunInstruments + Sync)) -> Self {
        self.instruments = instruments;
        self
    }

    /// Ask the agent for one move and narrow the viable sequences by it.
    #[instrument(level = "debug", skip_all, fields(key = %self.tc.key, step = self.step))]
    pub async fn advance(&mut self) -> Result<TestStatus, ConformanceError> {
        if self.aborted {
            return Err(ConformanceError::Aborted {
                key: self.tc.key.clone(),
                step: self.step,
            });
        }
        if self.is_done() {
            return Err(ConformanceError::AlreadyFinished {
                key: self.tc.key.clone(),
                step: self.step,
                status: self.status,
            });
        }

        let chosen = match self.ask_agent().await {
            Ok(direction) => direction,
            Err(source) => {
                self.aborted = true;
                return Err(ConformanceError::Agent {
                    key: self.tc.key.clone(),
                    step: self.step,
                    source,
                });
            }
        };

        let step = self.step;
        self.step += 1;
        let you_id = self.cache.state().you.id.clone();
        self.viable_sequences
            .retain(|seq| seq.get(step).and_then(|turn| turn.get(&you_id)) == Some(&chosen));
        debug!(%chosen, viable = self.viable_sequences.len(), "agent moved");

        if self.viable_sequences.is_empty() {
            self.status = TestStatus::Fail;
        } else if self.viable_sequences.iter().any(|seq| seq.len() == self.step) {
            self.status = TestStatus::Success;
        } else {
            // every viable sequence agrees on you, the first one decides the enemies
            let mut turn = self.viable_sequences[0][step].clone();
            turn.insert(you_id, chosen);
            grid::advance(&mut self.cache, &turn);
        }
        Ok(self.status)
    }

    async fn ask_agent(&self) -> Result<Direction, AgentError> {
        let timeout = self.config.agent_timeout();
        let started = Instant::now();
        let answer = tokio::time::timeout(timeout, self.client.choose_move(self.cache.state()))
            .await
            .map_err(|_| AgentError::Timeout(timeout))??;
        self.instruments.observe_agent_call(started.elapsed());
        Ok(answer)
    }

    /// whether the run has a verdict
    pub fn is_done(&self) -> bool {
        self.status != TestStatus::Pending
    }

    #[allow(missing_docs)]
    pub fn status(&self) -> TestStatus {
        self.status
    }

    /// how many moves the agent has made so far
    pub fn step(&self) -> usize {
        self.step
    }

    /// the board the agent will be shown next
    pub fn state(&self) -> &crate::model::GameState {
        self.cache.state()
    }

    /// sequences still consistent with every move the agent has made
    pub fn viable_sequences(&self) -> &[&'a Sequence] {
        &self.viable_sequences
    }

    /// drive the run until it has a verdict
    pub async fn run(mut self) -> Result<TestResult, ConformanceError> {
        while !self.is_done() {
            self.advance().await?;
        }
        let passed = self.status == TestStatus::Success;
        info!(key = %self.tc.key, steps = self.step, passed, "test case finished");
        Ok(TestResult { passed })
    }
}

/// Run one test case against the agent.
#[instrument(level = "debug", skip_all, fields(key = %tc.key))]
pub async fn run_test<C: AgentClient>(
    tc: &TestCase,
    client: &C,
    config: RunConfig,
) -> Result<TestResult, ConformanceError> {
    TestContext::new(tc, client, config)?.run().await
}

/// Run all eight rotations and mirrors of a test case side by side, each on its
/// own board. Results are in the order of [crate::variations::variations].
pub async fn run_variations<C: AgentClient>(
    tc: &TestCase,
    client: &C,
    config: RunConfig,
) -> Vec<Result<TestResult, ConformanceError>> {
    let cases = variations(tc);
    join_all(cases.iter().map(|case| run_test(case, client, config))).await
}
