//! Session model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated team, as persisted under `team_info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamIdentity {
    pub team_id: i64,
    pub team_name: String,
}

/// One time-bounded contest attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub team: TeamIdentity,
    /// Fixed at creation, never refreshed by a reload
    pub start: DateTime<Utc>,
    pub duration_seconds: i64,
    /// Remaining seconds at the moment the session was read
    pub remaining_seconds: i64,
}

impl Session {
    pub fn team_id(&self) -> i64 {
        self.team.team_id
    }

    /// Absolute end of the attempt
    pub fn deadline(&self) -> DateTime<Utc> {
        self.start + chrono::Duration::seconds(self.duration_seconds)
    }
}
