//! Backend response DTOs and their normalization

use serde::{Deserialize, Deserializer};

use crate::models::{CaseOutput, ExecutionResult, TeamIdentity, TestCase};

/// Successful login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub team_id: i64,
    pub team_name: String,
}

impl From<LoginResponse> for TeamIdentity {
    fn from(r: LoginResponse) -> Self {
        Self {
            team_id: r.team_id,
            team_name: r.team_name,
        }
    }
}

/// Error body returned with 4xx/5xx responses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorResponse {
    /// Human-readable detail, if the backend sent one
    pub fn message(&self) -> Option<String> {
        match &self.detail {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Null) | None => self.error.clone(),
            Some(other) => Some(other.to_string()),
        }
    }
}

/// Test case as listed by `GET /testcases`
#[derive(Debug, Clone, Deserialize)]
pub struct TestCaseResponse {
    #[serde(default)]
    pub input_data: Option<String>,
    #[serde(default)]
    pub expected_output: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub is_hidden: bool,
}

impl From<TestCaseResponse> for TestCase {
    fn from(r: TestCaseResponse) -> Self {
        Self {
            input: r.input_data.unwrap_or_default(),
            expected_output: r.expected_output.unwrap_or_default(),
            hidden: r.is_hidden,
        }
    }
}

/// Accepts `true`/`false`, `0`/`1` or `null`
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Int(i)) => i != 0,
        None => false,
    })
}

/// One row of `GET /submissions`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmissionEntry {
    pub problem_id: i64,
    pub status: String,
}

/// Output of one executor phase
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhaseOutput {
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
    /// Interleaved stdout and stderr
    #[serde(default)]
    pub output: Option<String>,
}

impl PhaseOutput {
    fn stderr(&self) -> &str {
        self.stderr.as_deref().unwrap_or_default()
    }

    fn failed(&self) -> bool {
        !self.stderr().is_empty()
    }

    /// Stdout of a clean phase; `output` is only trusted when stderr is empty
    fn clean_stdout(&self) -> String {
        match self.stdout.as_deref() {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => self.output.clone().unwrap_or_default(),
        }
    }
}

/// Raw executor response for `POST /run`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunResponse {
    #[serde(default)]
    pub compile: Option<PhaseOutput>,
    #[serde(default)]
    pub run: Option<PhaseOutput>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Executor phase that decided a run's outcome
enum Phase {
    CompileFailed(PhaseOutput),
    RunFailed(PhaseOutput),
    Ran(PhaseOutput),
    Compiled(PhaseOutput),
    NoPhase,
}

impl RunResponse {
    /// Pick the deciding phase
    ///
    /// Precedence: a compile phase with stderr wins; otherwise the run phase
    /// decides (failed if it has stderr); a lone compile phase is used last.
    fn phase(self) -> Phase {
        match (self.compile, self.run) {
            (Some(compile), _) if compile.failed() => Phase::CompileFailed(compile),
            (_, Some(run)) if run.failed() => Phase::RunFailed(run),
            (_, Some(run)) => Phase::Ran(run),
            (Some(compile), None) => Phase::Compiled(compile),
            (None, None) => Phase::NoPhase,
        }
    }

    /// Normalize into an [`ExecutionResult`]
    ///
    /// A failed phase keeps only its own `stdout` field; the interleaved
    /// `output` is dropped because it contains the error stream.
    pub fn into_result(self) -> ExecutionResult {
        let notice = self.message.clone().filter(|m| !m.is_empty());
        let mut result = match self.phase() {
            Phase::CompileFailed(p) => ExecutionResult {
                stdout: p.stdout.unwrap_or_default(),
                stderr: p.stderr.unwrap_or_default(),
                compile_error: true,
                ..ExecutionResult::default()
            },
            Phase::RunFailed(p) => ExecutionResult {
                stdout: p.stdout.unwrap_or_default(),
                stderr: p.stderr.unwrap_or_default(),
                runtime_error: true,
                ..ExecutionResult::default()
            },
            Phase::Ran(p) | Phase::Compiled(p) => ExecutionResult::success(p.clean_stdout()),
            Phase::NoPhase => ExecutionResult::default(),
        };
        result.notice = notice;
        result
    }
}

/// One result row of `POST /run-batch`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchCaseResponse {
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default)]
    pub expected_output: Option<String>,
    #[serde(default)]
    pub actual_output: Option<String>,
    #[serde(default)]
    pub passed: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
}

impl BatchCaseResponse {
    /// Actual output of this case; a reported error becomes an opaque marker
    pub fn output(&self) -> CaseOutput {
        match &self.error {
            Some(e) if !e.is_empty() => CaseOutput::Error,
            _ => CaseOutput::Output(self.actual_output.clone().unwrap_or_default()),
        }
    }
}

/// Raw response of `POST /run-batch`, index-aligned with the request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchRunResponse {
    #[serde(default)]
    pub results: Vec<BatchCaseResponse>,
}

/// Judge response of `POST /submit`
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub status: String,
}
