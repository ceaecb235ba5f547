//! Time utilities

use chrono::{DateTime, Duration, TimeZone, Utc};

/// Get current UTC time
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Parse an epoch-milliseconds string as persisted by the session store
pub fn parse_epoch_millis(s: &str) -> Option<DateTime<Utc>> {
    let millis: i64 = s.trim().parse().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}

/// Format a remaining-seconds count as `MM:SS`
///
/// Minutes are not wrapped into hours, so a 90-minute contest shows `90:00`.
pub fn format_countdown(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Format an elapsed duration as `1h 2m 3s`, omitting zero units
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let units = [(total / 3600, "h"), (total % 3600 / 60, "m"), (total % 60, "s")];

    let parts: Vec<String> = units
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{value}{unit}"))
        .collect();

    if parts.is_empty() {
        "0s".to_string()
    } else {
        parts.join(" ")
    }
}
