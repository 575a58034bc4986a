//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap external commands with a deadline
//! - Report which operation ran out of time
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities; the wrapped future is dropped on expiry
//! - Timeout errors are distinct from the operation's own errors

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// The operation did not finish before its deadline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} timed out after {}s", .limit.as_secs())]
pub struct TimedOut {
    pub operation: String,
    pub limit: Duration,
}

/// Await `fut`, giving up after `limit`.
pub async fn with_timeout<F>(operation: &str, limit: Duration, fut: F) -> Result<F::Output, TimedOut>
where
    F: Future,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(output) => Ok(output),
        Err(_) => {
            tracing::warn!(
                operation,
                limit_secs = limit.as_secs(),
                "Operation timed out"
            );
            Err(TimedOut {
                operation: operation.to_string(),
                limit,
            })
        }
    }
}
