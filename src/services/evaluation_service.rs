//! Test evaluator
//!
//! Compares per-case outputs against expected outputs and aggregates them
//! into a [`TestReport`]. Hidden cases never reach this module.

use crate::models::{CaseOutput, CaseReport, TestCase, TestReport};

/// Evaluator for batch runs
pub struct EvaluationService;

impl EvaluationService {
    /// Exact equality after trimming leading and trailing whitespace
    pub fn outputs_match(actual: &str, expected: &str) -> bool {
        actual.trim() == expected.trim()
    }

    /// Build a report from `(index, case)` pairs and index-aligned outputs
    ///
    /// A case with no output (the backend returned fewer results than cases)
    /// is treated as an execution error. Extra outputs are ignored.
    pub fn evaluate(cases: &[(usize, &TestCase)], outputs: Vec<CaseOutput>) -> TestReport {
        let mut outputs = outputs.into_iter();
        let mut report = TestReport::default();

        for &(index, case) in cases {
            let (actual, passed) = match outputs.next().unwrap_or(CaseOutput::Error) {
                CaseOutput::Output(actual) => {
                    let passed = Self::outputs_match(&actual, &case.expected_output);
                    (actual.trim().to_string(), passed)
                }
                CaseOutput::Error => (crate::constants::messages::CASE_ERROR.to_string(), false),
            };

            if passed {
                report.passed_count += 1;
            } else {
                report.failed_count += 1;
            }
            report.per_case.push(CaseReport {
                index,
                input: case.input.clone(),
                expected: case.expected_output.clone(),
                actual,
                passed,
            });
        }

        report
    }
}
