//! Backend request DTOs

use serde::Serialize;
use validator::Validate;

use crate::models::{Language, TestCase};

/// Team login request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Team name is required"))]
    pub team_name: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Single execution request
#[derive(Debug, Clone, Serialize)]
pub struct RunRequest {
    pub language: Language,
    pub code: String,
    pub stdin: String,
}

/// One case of a batch execution request
#[derive(Debug, Clone, Serialize)]
pub struct BatchCase {
    pub input: String,
    pub expected_output: String,
}

impl From<&TestCase> for BatchCase {
    fn from(tc: &TestCase) -> Self {
        Self {
            input: tc.input.clone(),
            expected_output: tc.expected_output.clone(),
        }
    }
}

/// Batch execution request carrying every visible case at once
#[derive(Debug, Clone, Serialize)]
pub struct BatchRunRequest {
    pub language: Language,
    pub code: String,
    pub test_cases: Vec<BatchCase>,
}

/// Final submission to the judge
#[derive(Debug, Clone, Serialize)]
pub struct SubmitRequest {
    pub problem_id: i64,
    pub team_id: i64,
    pub code: String,
    pub language: Language,
}
