//! places to put test cases once they are authored
use fxhash::FxHashMap;

use crate::model::TestCase;
use crate::types::{StoreError, TestCaseStore};

/// Keeps test cases in memory, keyed by their key. Saving a key twice keeps the
/// last one.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    test_cases: FxHashMap<String, TestCase>,
}

impl InMemoryStore {
    #[allow(missing_docs)]
    pub fn new() -> Self {
        Self::default()
    }

    /// the test case saved under `key`, if any
    pub fn get(&self, key: &str) -> Option<&TestCase> {
        self.test_cases.get(key)
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.test_cases.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.test_cases.is_empty()
    }
}

impl TestCaseStore for InMemoryStore {
    fn save_test_case(&mut self, tc: &TestCase) -> Result<(), StoreError> {
        if tc.key.is_empty() {
            return Err(StoreError::EmptyKey);
        }
        self.test_cases.insert(tc.key.clone(), tc.clone());
        Ok(())
    }
}
