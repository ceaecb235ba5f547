//! Application-wide constants
//!
//! This module contains all constant values used throughout the client.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// BACKEND DEFAULTS
// =============================================================================

/// Default base URL of the contest backend
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8001";

/// Default timeout for ordinary backend requests, in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default deadline for the problem-list fetch, in seconds
pub const DEFAULT_PROBLEMS_TIMEOUT_SECS: u64 = 5;

/// Default deadline for run and batch-run requests, in seconds
pub const DEFAULT_EXECUTION_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// SESSION DEFAULTS
// =============================================================================

/// Length of one contest attempt in seconds
pub const DEFAULT_SESSION_DURATION_SECS: i64 = 60 * 60;

/// Default location of the durable client state file
pub const DEFAULT_STATE_PATH: &str = ".contest_state.json";

/// Interval between countdown ticks, in milliseconds
pub const TICK_INTERVAL_MS: u64 = 1000;

// =============================================================================
// EDITOR
// =============================================================================

/// Maximum number of entries kept on each of the undo and redo stacks
pub const HISTORY_CAPACITY: usize = 50;

// =============================================================================
// PERSISTED STATE KEYS
// =============================================================================

/// Keys of the durable client store
pub mod storage_keys {
    pub const TEAM_INFO: &str = "team_info";
    pub const TIMER_START: &str = "timer_start_time";
    pub const SUBMISSIONS: &str = "submissions";
    pub const PROBLEMS: &str = "problems_cache";

    /// Every key owned by a session; removed together on logout or expiry
    pub const ALL: &[&str] = &[TEAM_INFO, TIMER_START, SUBMISSIONS, PROBLEMS];
}

// =============================================================================
// BACKEND ROUTES
// =============================================================================

/// Paths of the backend endpoints
pub mod routes {
    pub const LOGIN: &str = "/login";
    pub const PROBLEMS: &str = "/problems";
    pub const TESTCASES: &str = "/testcases";
    pub const SUBMISSIONS: &str = "/submissions";
    pub const RUN: &str = "/run";
    pub const RUN_BATCH: &str = "/run-batch";
    pub const SUBMIT: &str = "/submit";
}

// =============================================================================
// SUBMISSION STATUSES
// =============================================================================

/// Judge status strings
pub mod statuses {
    pub const ACCEPTED: &str = "Accepted";
}

// =============================================================================
// USER-FACING MESSAGES
// =============================================================================

/// Short messages shown in place of raw failure details
pub mod messages {
    pub const EXECUTION_FAILED: &str = "An error occurred while executing your code.";
    pub const NO_OUTPUT: &str = "No output produced.";
    pub const EMPTY_ACTUAL: &str = "(no output)";
    pub const CASE_ERROR: &str = "Error: execution failed";
    pub const EMPTY_CODE: &str = "Write or paste some code first.";
    pub const SYNC_DEGRADED: &str = "Unable to sync submissions. Showing last saved progress.";
    pub const TIME_UP: &str = "Time is up!";
}
