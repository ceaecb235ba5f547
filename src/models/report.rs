//! Batch test report model

use std::fmt::Write;

use crate::constants::messages;

/// Verdict for a single visible test case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseReport {
    /// 1-based position in the problem's full test-case list
    pub index: usize,
    pub input: String,
    pub expected: String,
    pub actual: String,
    pub passed: bool,
}

/// Aggregated result of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestReport {
    pub passed_count: usize,
    pub failed_count: usize,
    pub per_case: Vec<CaseReport>,
}

impl TestReport {
    pub fn total(&self) -> usize {
        self.passed_count + self.failed_count
    }

    pub fn all_passed(&self) -> bool {
        self.failed_count == 0 && self.passed_count > 0
    }

    /// Case by its 1-based index
    pub fn case(&self, index: usize) -> Option<&CaseReport> {
        self.per_case.iter().find(|c| c.index == index)
    }

    /// Render the report as shown in the output pane
    pub fn render(&self) -> String {
        let mut out = format!("Test Results: {}/{} passed\n\n", self.passed_count, self.total());
        for case in &self.per_case {
            let actual = if case.actual.is_empty() {
                messages::EMPTY_ACTUAL
            } else {
                &case.actual
            };
            let _ = writeln!(out, "Test Case {}:", case.index);
            let _ = writeln!(out, "  Input: {}", case.input);
            let _ = writeln!(out, "  Expected: {}", case.expected);
            let _ = writeln!(out, "  Got: {}", actual);
            let _ = writeln!(
                out,
                "  Status: {}\n",
                if case.passed { "PASSED" } else { "FAILED" }
            );
        }
        out
    }

    /// One-line summary for a toast
    pub fn summary(&self) -> String {
        if self.all_passed() {
            format!("All {} test cases passed!", self.total())
        } else {
            format!("{} test case(s) failed.", self.failed_count)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_marks_empty_output() {
        let report = TestReport {
            passed_count: 0,
            failed_count: 1,
            per_case: vec![CaseReport {
                index: 1,
                input: "2 3".to_string(),
                expected: "5".to_string(),
                actual: String::new(),
                passed: false,
            }],
        };
        let text = report.render();
        assert!(text.starts_with("Test Results: 0/1 passed"));
        assert!(text.contains("Got: (no output)"));
        assert!(text.contains("Status: FAILED"));
        assert_eq!(report.summary(), "1 test case(s) failed.");
    }
}
