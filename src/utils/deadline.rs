//! Deadline wrapper shared by every backend call

use std::future::Future;
use std::time::Duration;

use crate::error::{ClientError, ClientResult};

/// Run `operation` and fail with [`ClientError::Timeout`] if it has not
/// finished within `limit`
///
/// `activity` names what was being waited for, e.g. "loading problems"; it
/// ends up in the participant-facing message. The pending future is dropped
/// on expiry, which aborts the underlying request.
pub async fn with_deadline<T, F>(limit: Duration, activity: &str, operation: F) -> ClientResult<T>
where
    F: Future<Output = ClientResult<T>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                activity = %activity,
                limit_ms = %limit.as_millis(),
                "Deadline exceeded"
            );
            Err(ClientError::Timeout(activity.to_string()))
        }
    }
}
