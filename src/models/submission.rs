//! Submission model

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::statuses;

/// Judge status per problem for one team, as persisted under `submissions`
///
/// The owning team is stored alongside the map so a snapshot can never be
/// attributed to another account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionStatus {
    pub team_id: i64,
    pub statuses: BTreeMap<i64, String>,
}

impl SubmissionStatus {
    /// Create an empty status map for a team
    pub fn new(team_id: i64) -> Self {
        Self {
            team_id,
            statuses: BTreeMap::new(),
        }
    }

    /// Build from `(problem_id, status)` pairs; later entries win
    pub fn from_entries(team_id: i64, entries: impl IntoIterator<Item = (i64, String)>) -> Self {
        Self {
            team_id,
            statuses: entries.into_iter().collect(),
        }
    }

    pub fn status_of(&self, problem_id: i64) -> Option<&str> {
        self.statuses.get(&problem_id).map(String::as_str)
    }

    /// Check if the problem has an accepted submission
    pub fn is_solved(&self, problem_id: i64) -> bool {
        self.status_of(problem_id) == Some(statuses::ACCEPTED)
    }

    /// Number of accepted problems
    pub fn solved_count(&self) -> usize {
        self.statuses
            .values()
            .filter(|s| s.as_str() == statuses::ACCEPTED)
            .count()
    }

    pub fn mark_accepted(&mut self, problem_id: i64) {
        self.statuses
            .insert(problem_id, statuses::ACCEPTED.to_string());
    }
}

/// Result of a final submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Accepted,
    /// Judge returned any other status
    Rejected(String),
}

impl SubmissionOutcome {
    pub fn from_status(status: &str) -> Self {
        if status == statuses::ACCEPTED {
            Self::Accepted
        } else {
            Self::Rejected(status.to_string())
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl std::fmt::Display for SubmissionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accepted => write!(f, "Submission accepted!"),
            Self::Rejected(status) if status.is_empty() => {
                write!(f, "Submission failed: try again")
            }
            Self::Rejected(status) => write!(f, "Submission failed: {}", status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solved_tracking() {
        let mut status = SubmissionStatus::from_entries(
            7,
            vec![(1, "Wrong Answer".to_string()), (2, "Accepted".to_string())],
        );
        assert!(!status.is_solved(1));
        assert!(status.is_solved(2));
        assert_eq!(status.solved_count(), 1);

        status.mark_accepted(1);
        assert!(status.is_solved(1));
        assert_eq!(status.solved_count(), 2);
    }

    #[test]
    fn test_snapshot_keeps_integer_keys() {
        let status = SubmissionStatus::from_entries(3, vec![(5, "Accepted".to_string())]);
        let json = serde_json::to_string(&status).unwrap();
        let back: SubmissionStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, status);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(SubmissionOutcome::from_status("Accepted"), SubmissionOutcome::Accepted);
        assert_eq!(
            SubmissionOutcome::from_status("Wrong Answer").to_string(),
            "Submission failed: Wrong Answer"
        );
        assert_eq!(
            SubmissionOutcome::Rejected(String::new()).to_string(),
            "Submission failed: try again"
        );
    }
}
