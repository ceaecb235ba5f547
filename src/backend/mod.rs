//! Contest backend boundary
//!
//! The backend (authentication, problem storage, execution sandbox, judge) is
//! an external collaborator. This module holds its wire shapes and the
//! [`ContestBackend`] seam; [`HttpBackend`] is the production transport.

pub mod http;
pub mod request;
pub mod response;

pub use http::HttpBackend;

use async_trait::async_trait;

use crate::{
    error::ClientResult,
    models::{Problem, TeamIdentity, TestCase},
};
use request::{BatchRunRequest, LoginRequest, RunRequest, SubmitRequest};
use response::{BatchRunResponse, RunResponse, SubmissionEntry, SubmitResponse};

/// Request/response contracts consumed by the client
///
/// Implementations convert every transport failure into a
/// [`crate::error::ClientError`]; deadlines are applied by the callers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContestBackend: Send + Sync {
    /// `POST /login`
    async fn login(&self, request: &LoginRequest) -> ClientResult<TeamIdentity>;

    /// `GET /problems`
    async fn problems(&self) -> ClientResult<Vec<Problem>>;

    /// `GET /testcases?problem_id=ID`
    async fn test_cases(&self, problem_id: i64) -> ClientResult<Vec<TestCase>>;

    /// `GET /submissions?team_id=ID`
    async fn submissions(&self, team_id: i64) -> ClientResult<Vec<SubmissionEntry>>;

    /// `POST /run`
    async fn run(&self, request: &RunRequest) -> ClientResult<RunResponse>;

    /// `POST /run-batch`
    async fn run_batch(&self, request: &BatchRunRequest) -> ClientResult<BatchRunResponse>;

    /// `POST /submit`
    async fn submit(&self, request: &SubmitRequest) -> ClientResult<SubmitResponse>;
}
