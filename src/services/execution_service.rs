//! Execution client
//!
//! Single runs and batch runs against the remote executor. Every call is
//! bounded by the execution deadline and requires a live session.

use std::sync::Arc;

use super::evaluation_service::EvaluationService;
use super::session_service::SessionService;
use crate::{
    backend::{
        ContestBackend,
        request::{BatchCase, BatchRunRequest, RunRequest},
    },
    config::Config,
    error::{ClientError, ClientResult},
    models::{CaseOutput, ExecutionResult, Language, TestCase, TestReport, visible_cases},
    utils::{validate_source_code, with_deadline},
};

/// Client for the remote executor
pub struct ExecutionService {
    backend: Arc<dyn ContestBackend>,
    session: Arc<SessionService>,
    config: Config,
}

impl ExecutionService {
    pub fn new(backend: Arc<dyn ContestBackend>, session: Arc<SessionService>, config: Config) -> Self {
        Self {
            backend,
            session,
            config,
        }
    }

    /// Run `code` once with `stdin`
    ///
    /// Compile and runtime failures are reported through the result's error
    /// flags, not as `Err`.
    pub async fn run_once(&self, language: Language, code: &str, stdin: &str) -> ClientResult<ExecutionResult> {
        self.session.current_session()?;
        validate_source_code(code).map_err(|e| ClientError::Validation(e.to_string()))?;

        let request = RunRequest {
            language,
            code: code.to_string(),
            stdin: stdin.to_string(),
        };
        let response = with_deadline(
            self.config.backend.execution_timeout,
            "running your code",
            self.backend.run(&request),
        )
        .await?;

        let result = response.into_result();
        if result.is_error() {
            tracing::debug!(
                language = %language,
                compile_error = result.compile_error,
                stderr_bytes = result.stderr.len(),
                "Execution reported an error"
            );
        }
        Ok(result)
    }

    /// Fetch the full test-case list of a problem, hidden cases included
    pub async fn fetch_test_cases(&self, problem_id: i64) -> ClientResult<Vec<TestCase>> {
        self.session.current_session()?;

        let cases = with_deadline(
            self.config.backend.request_timeout,
            "loading test cases",
            self.backend.test_cases(problem_id),
        )
        .await?;

        tracing::debug!(problem_id = %problem_id, count = cases.len(), "Test cases loaded");
        Ok(cases)
    }

    /// Run `code` against every visible case in one request and evaluate it
    pub async fn run_batch(&self, language: Language, code: &str, cases: &[TestCase]) -> ClientResult<TestReport> {
        self.session.current_session()?;
        validate_source_code(code).map_err(|e| ClientError::Validation(e.to_string()))?;

        let visible = visible_cases(cases);
        if visible.is_empty() {
            return Err(ClientError::Validation(
                "No visible test cases for this challenge.".to_string(),
            ));
        }

        let request = BatchRunRequest {
            language,
            code: code.to_string(),
            test_cases: visible.iter().map(|(_, tc)| BatchCase::from(*tc)).collect(),
        };
        let response = with_deadline(
            self.config.backend.execution_timeout,
            "running test cases",
            self.backend.run_batch(&request),
        )
        .await?;

        if response.results.len() != visible.len() {
            tracing::warn!(
                sent = visible.len(),
                received = response.results.len(),
                "Batch result count does not match request"
            );
        }

        let outputs: Vec<CaseOutput> = response.results.iter().map(|r| r.output()).collect();
        let report = EvaluationService::evaluate(&visible, outputs);
        tracing::info!(
            language = %language,
            passed = report.passed_count,
            failed = report.failed_count,
            "Batch run evaluated"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockContestBackend;
    use crate::backend::response::{BatchCaseResponse, BatchRunResponse, PhaseOutput, RunResponse};
    use crate::models::TeamIdentity;
    use crate::storage::MemoryRepository;
    use crate::test_utils::{FakeBackend, ManualClock};
    use chrono::Utc;
    use std::sync::atomic::Ordering;

    fn service_with(backend: Arc<dyn ContestBackend>) -> ExecutionService {
        let session = Arc::new(SessionService::new(
            backend.clone(),
            Arc::new(MemoryRepository::new()),
            Arc::new(ManualClock::new(Utc::now())),
            Config::default(),
        ));
        session
            .establish(TeamIdentity {
                team_id: 1,
                team_name: "dragon".to_string(),
            })
            .unwrap();
        ExecutionService::new(backend, session, Config::default())
    }

    #[tokio::test]
    async fn test_run_once_normalizes_response() {
        let backend = Arc::new(FakeBackend::default());
        *backend.run_response.lock().unwrap() = RunResponse {
            run: Some(PhaseOutput {
                stdout: Some("5\n".to_string()),
                ..PhaseOutput::default()
            }),
            ..RunResponse::default()
        };
        let service = service_with(backend);

        let result = service.run_once(Language::Python, "print(5)", "").await.unwrap();
        assert_eq!(result.display_output(), "5\n");
    }

    #[tokio::test]
    async fn test_blank_code_rejected_before_request() {
        let backend = Arc::new(FakeBackend::default());
        let service = service_with(backend.clone());

        let err = service.run_once(Language::Python, "  \n", "").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(backend.calls("run"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_timeout_is_distinct() {
        let backend = Arc::new(FakeBackend::default());
        *backend.delay.lock().unwrap() = Some(std::time::Duration::from_secs(60));
        let service = service_with(backend);

        let err = service.run_once(Language::Python, "print(1)", "").await.unwrap_err();
        assert!(matches!(err, ClientError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_batch_sends_only_visible_cases_in_one_request() {
        let backend = Arc::new(FakeBackend::default());
        let service = service_with(backend.clone());
        let cases = vec![
            TestCase::visible("2 3", "5"),
            TestCase::hidden("100 1", "101"),
            TestCase::visible("4 4", "8"),
        ];

        let report = service.run_batch(Language::Python, "print(1)", &cases).await.unwrap();
        assert_eq!(backend.calls("run_batch"), 1);
        assert_eq!(backend.last_batch_size.load(Ordering::SeqCst), 2);
        assert_eq!(report.total(), 2);
        assert!(report.all_passed());
        assert!(report.case(2).is_none());
    }

    #[tokio::test]
    async fn test_batch_partial_failure() {
        let backend = Arc::new(FakeBackend::default());
        *backend.batch_errors.lock().unwrap() = vec![0];
        let service = service_with(backend);
        let cases = vec![TestCase::visible("1", "1"), TestCase::visible("2", "2")];

        let report = service.run_batch(Language::Cpp, "int main(){}", &cases).await.unwrap();
        assert_eq!(report.passed_count, 1);
        assert_eq!(report.failed_count, 1);
        assert!(!report.render().contains("Traceback"));
    }

    #[tokio::test]
    async fn test_batch_recomputes_verdicts_locally() {
        let mut mock = MockContestBackend::new();
        mock.expect_run_batch().times(1).returning(|_| {
            Ok(BatchRunResponse {
                results: vec![
                    BatchCaseResponse {
                        actual_output: Some(" 5\n".to_string()),
                        passed: Some(false),
                        ..BatchCaseResponse::default()
                    },
                    BatchCaseResponse {
                        actual_output: Some("9".to_string()),
                        passed: Some(true),
                        ..BatchCaseResponse::default()
                    },
                ],
            })
        });
        let service = service_with(Arc::new(mock));
        let cases = vec![TestCase::visible("2 3", "5"), TestCase::visible("4 4", "8")];

        let report = service.run_batch(Language::Python, "print(5)", &cases).await.unwrap();
        assert!(report.case(1).unwrap().passed);
        assert!(!report.case(2).unwrap().passed);
    }

    #[tokio::test]
    async fn test_batch_without_visible_cases() {
        let mut mock = MockContestBackend::new();
        mock.expect_run_batch().never();
        let service = service_with(Arc::new(mock));

        let err = service
            .run_batch(Language::Python, "print(1)", &[TestCase::hidden("1", "1")])
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }
}
