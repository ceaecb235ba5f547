//! Execution result model

use crate::constants::messages;

/// Normalized outcome of one execution request
///
/// Built by the backend layer from whichever phase the executor reported.
/// The raw error stream is kept crate-private and is never rendered: callers
/// only see the error flags and the stdout of the phase that produced it.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: String,
    pub(crate) stderr: String,
    pub compile_error: bool,
    pub runtime_error: bool,
    /// Executor-level message (e.g. unknown runtime) when no phase ran
    pub notice: Option<String>,
}

impl ExecutionResult {
    /// Successful execution with the given stdout
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            ..Self::default()
        }
    }

    /// Check if either phase failed
    pub fn is_error(&self) -> bool {
        self.compile_error || self.runtime_error
    }

    /// Text shown to the participant after a single run
    pub fn display_output(&self) -> String {
        if self.is_error() {
            return messages::EXECUTION_FAILED.to_string();
        }
        if !self.stdout.is_empty() {
            return self.stdout.clone();
        }
        match &self.notice {
            Some(notice) if !notice.is_empty() => notice.clone(),
            _ => messages::NO_OUTPUT.to_string(),
        }
    }

    /// Collapse into the per-case output consumed by the evaluator
    pub fn into_case_output(self) -> CaseOutput {
        if self.is_error() {
            CaseOutput::Error
        } else {
            CaseOutput::Output(self.stdout)
        }
    }
}

impl std::fmt::Debug for ExecutionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionResult")
            .field("stdout", &self.stdout)
            .field("stderr_bytes", &self.stderr.len())
            .field("compile_error", &self.compile_error)
            .field("runtime_error", &self.runtime_error)
            .field("notice", &self.notice)
            .finish()
    }
}

/// Actual output of one batch case
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutput {
    Output(String),
    /// The executor failed this case; details are withheld
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_is_opaque() {
        let result = ExecutionResult {
            stdout: String::new(),
            stderr: "Traceback: secret_answer = 42".to_string(),
            compile_error: false,
            runtime_error: true,
            notice: None,
        };
        assert_eq!(result.display_output(), messages::EXECUTION_FAILED);
        assert!(!format!("{:?}", result).contains("secret_answer"));
        assert_eq!(result.into_case_output(), CaseOutput::Error);
    }

    #[test]
    fn test_display_fallbacks() {
        assert_eq!(ExecutionResult::success("5\n").display_output(), "5\n");
        assert_eq!(ExecutionResult::default().display_output(), messages::NO_OUTPUT);

        let noticed = ExecutionResult {
            notice: Some("ruby-3 runtime is unknown".to_string()),
            ..ExecutionResult::default()
        };
        assert_eq!(noticed.display_output(), "ruby-3 runtime is unknown");
    }
}
