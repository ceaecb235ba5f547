//! Submission coordinator

use std::sync::Arc;

use super::session_service::SessionService;
use crate::{
    backend::{ContestBackend, request::SubmitRequest},
    config::Config,
    error::{ClientError, ClientResult},
    models::{Language, SubmissionOutcome},
    utils::{validate_source_code, with_deadline},
};

/// Sends final submissions to the judge
///
/// Submissions are never retried. An accepted verdict is recorded in the
/// session's status snapshot immediately, which locks the problem against
/// further submits.
pub struct SubmissionService {
    backend: Arc<dyn ContestBackend>,
    session: Arc<SessionService>,
    config: Config,
}

impl SubmissionService {
    pub fn new(backend: Arc<dyn ContestBackend>, session: Arc<SessionService>, config: Config) -> Self {
        Self {
            backend,
            session,
            config,
        }
    }

    /// Whether the submit control should be enabled for `problem_id`
    pub fn can_submit(&self, problem_id: i64) -> ClientResult<bool> {
        Ok(!self.session.is_solved(problem_id)?)
    }

    /// Submit `code` for `problem_id` on behalf of the active team
    pub async fn submit(&self, problem_id: i64, code: &str, language: Language) -> ClientResult<SubmissionOutcome> {
        let session = self.session.current_session()?;

        if self.session.is_solved(problem_id)? {
            return Err(ClientError::AlreadySolved(problem_id));
        }
        validate_source_code(code).map_err(|e| ClientError::Validation(e.to_string()))?;

        let request = SubmitRequest {
            problem_id,
            team_id: session.team_id(),
            code: code.to_string(),
            language,
        };
        let response = with_deadline(
            self.config.backend.request_timeout,
            "submitting your solution",
            self.backend.submit(&request),
        )
        .await
        .inspect_err(|e| tracing::warn!(problem_id = %problem_id, error = %e, "Submission failed"))?;

        let outcome = SubmissionOutcome::from_status(&response.status);
        if outcome.is_accepted() {
            self.session.record_accepted(problem_id)?;
        }

        tracing::info!(
            problem_id = %problem_id,
            team_id = %session.team_id(),
            language = %language,
            status = %response.status,
            "Submission judged"
        );
        Ok(outcome)
    }
}
