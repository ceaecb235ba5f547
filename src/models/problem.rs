//! Problem model

use serde::{Deserialize, Serialize};

use crate::utils::is_external_link;

/// A challenge as served by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub id: i64,
    pub title: String,
    /// Buggy Python source, or a link to it
    #[serde(rename = "buggy_file_blob", default)]
    pub buggy_code: String,
    #[serde(rename = "test_pdf", default, skip_serializing_if = "Option::is_none")]
    pub test_pdf_ref: Option<String>,
}

impl Problem {
    /// Link to an external buggy file, when the problem ships one instead of inline code
    pub fn external_link(&self) -> Option<&str> {
        is_external_link(&self.buggy_code).then_some(self.buggy_code.as_str())
    }

    /// Inline buggy code, if the problem has any
    pub fn inline_code(&self) -> Option<&str> {
        if self.buggy_code.is_empty() || self.external_link().is_some() {
            None
        } else {
            Some(&self.buggy_code)
        }
    }
}

/// Ordered problem list cached for the lifetime of a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProblemCache {
    pub problems: Vec<Problem>,
}

impl ProblemCache {
    pub fn new(problems: Vec<Problem>) -> Self {
        Self { problems }
    }

    pub fn find(&self, id: i64) -> Option<&Problem> {
        self.problems.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(blob: &str) -> Problem {
        Problem {
            id: 1,
            title: "Mantis".to_string(),
            buggy_code: blob.to_string(),
            test_pdf_ref: None,
        }
    }

    #[test]
    fn test_external_link_detection() {
        let linked = problem("https://files.example.com/mantis.py");
        assert_eq!(linked.external_link(), Some("https://files.example.com/mantis.py"));
        assert_eq!(linked.inline_code(), None);

        let inline = problem("def add(a, b):\n    return a - b\n");
        assert_eq!(inline.external_link(), None);
        assert!(inline.inline_code().is_some());
    }

    #[test]
    fn test_cache_deserializes_backend_shape() {
        let cache: ProblemCache = serde_json::from_str(
            r#"[{"id": 2, "title": "Monkey", "buggy_file_blob": "x = 1", "extra": true}]"#,
        )
        .unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.find(2).unwrap().title, "Monkey");
        assert!(cache.find(3).is_none());
    }
}
