//! The open challenge: problem, language, buffer and stdin
//!
//! Run and batch-run share one gate, so neither can start while the other is
//! in flight. Submit has its own gate.

use crate::{
    editor::{EditHistory, EditSource, ExecutionGate},
    error::ClientResult,
    models::{ExecutionResult, Language, Problem, SubmissionOutcome, TestReport},
    services::{ExecutionService, SubmissionService, TemplateService},
};

#[derive(Debug)]
pub struct Workspace {
    problem: Problem,
    language: Language,
    history: EditHistory,
    stdin: String,
    run_gate: ExecutionGate,
    submit_gate: ExecutionGate,
}

impl Workspace {
    /// Open `problem` with the Python starter code
    pub fn open(problem: Problem) -> Self {
        let language = Language::default();
        let history = EditHistory::new(TemplateService::starter_code(&problem, language));
        tracing::debug!(problem_id = %problem.id, "Workspace opened");
        Self {
            problem,
            language,
            history,
            stdin: String::new(),
            run_gate: ExecutionGate::new(),
            submit_gate: ExecutionGate::new(),
        }
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn code(&self) -> &str {
        self.history.text()
    }

    pub fn stdin(&self) -> &str {
        &self.stdin
    }

    pub fn set_stdin(&mut self, stdin: impl Into<String>) {
        self.stdin = stdin.into();
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    /// Whether a run or test run is in flight
    pub fn is_running(&self) -> bool {
        self.run_gate.is_busy()
    }

    pub fn edit(&mut self, text: impl Into<String>) -> bool {
        self.history.apply(text, EditSource::User)
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo()
    }

    /// Switch language and load its starter code
    ///
    /// The previous language's buffer and history are discarded.
    pub fn switch_language(&mut self, language: Language) -> bool {
        if language == self.language {
            return false;
        }
        self.language = language;
        self.history.apply(
            TemplateService::starter_code(&self.problem, language),
            EditSource::Programmatic,
        );
        tracing::debug!(problem_id = %self.problem.id, language = %language, "Language switched");
        true
    }

    /// Restore the starter code for the current language
    pub fn reset(&mut self) {
        self.history.apply(
            TemplateService::starter_code(&self.problem, self.language),
            EditSource::Programmatic,
        );
    }

    pub async fn run(&self, execution: &ExecutionService) -> ClientResult<ExecutionResult> {
        let _guard = self.run_gate.try_acquire("a run")?;
        execution
            .run_once(self.language, self.code(), &self.stdin)
            .await
    }

    /// Fetch the test cases and run every visible one in a single batch
    pub async fn run_tests(&self, execution: &ExecutionService) -> ClientResult<TestReport> {
        let _guard = self.run_gate.try_acquire("a run")?;
        let cases = execution.fetch_test_cases(self.problem.id).await?;
        execution
            .run_batch(self.language, self.code(), &cases)
            .await
    }

    pub async fn submit(&self, submissions: &SubmissionService) -> ClientResult<SubmissionOutcome> {
        let _guard = self.submit_gate.try_acquire("a submission")?;
        submissions
            .submit(self.problem.id, self.code(), self.language)
            .await
    }
}
