//! Test case model

use serde::{Deserialize, Serialize};

/// Test case for a problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
    /// Hidden cases are only used by server-side judging
    pub hidden: bool,
}

impl TestCase {
    /// Create a visible test case
    pub fn visible(input: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            expected_output: expected_output.into(),
            hidden: false,
        }
    }

    /// Create a hidden test case
    pub fn hidden(input: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            hidden: true,
            ..Self::visible(input, expected_output)
        }
    }
}

/// Visible cases paired with their 1-based position in the full list
pub fn visible_cases(cases: &[TestCase]) -> Vec<(usize, &TestCase)> {
    cases
        .iter()
        .enumerate()
        .filter(|(_, tc)| !tc.hidden)
        .map(|(i, tc)| (i + 1, tc))
        .collect()
}
