use serde::{Deserialize, Serialize};

use super::ConformanceError;
use crate::model::{from_ascii, Sequence, TestCase};
use crate::variations::variations;

/// A test case the way it is written by hand: an ascii board plus the acceptable
/// sequences, all in one orientation.
///
/// ```
/// # use battlesnake_conformance::conformance::Fixture;
/// let fixture: Fixture = serde_json::from_str(r#"{
///     "key": "dodge",
///     "board": "_ _\n> 0",
///     "acceptableSequences": [[{"0": "up"}, {"0": "left"}]]
/// }"#).unwrap();
/// assert_eq!(fixture.test_cases().unwrap().len(), 8);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    #[allow(missing_docs)]
    pub key: String,
    /// the start state in the notation of [crate::model::from_ascii]
    pub board: String,
    #[allow(missing_docs)]
    pub acceptable_sequences: Vec<Sequence>,
}

impl Fixture {
    /// the fixture as written. A board that cannot be read is reported with the
    /// fixture's key
    pub fn test_case(&self) -> Result<TestCase, ConformanceError> {
        let start_state = from_ascii(&self.board).map_err(|source| ConformanceError::Board {
            key: self.key.clone(),
            source,
        })?;
        Ok(TestCase {
            key: self.key.clone(),
            start_state,
            acceptable_sequences: self.acceptable_sequences.clone(),
        })
    }

    /// the fixture in all eight orientations, the written one first
    pub fn test_cases(&self) -> Result<[TestCase; 8], ConformanceError> {
        Ok(variations(&self.test_case()?))
    }
}
