//! Rotation invocation context
//!
//! Carries the deadline and cancellation signal handed down by the invocation
//! boundary, plus a trace id for correlating log lines.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Why a guarded operation did not run to completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Interrupted {
    /// The cancellation token fired
    #[error("operation cancelled")]
    Cancelled,

    /// The context deadline passed
    #[error("deadline exceeded{}", timeout_suffix(.timeout))]
    DeadlineExceeded {
        /// Configured timeout, when the deadline was derived from one
        timeout: Option<Duration>,
    },
}

fn timeout_suffix(timeout: &Option<Duration>) -> String {
    timeout.map_or_else(String::new, |t| format!(" after {}ms", t.as_millis()))
}

/// Request context for a single rotation
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use rotator_core::RotationContext;
/// use tokio_util::sync::CancellationToken;
///
/// let token = CancellationToken::new();
/// let ctx = RotationContext::new()
///     .with_timeout(Duration::from_secs(30))
///     .with_cancellation(token.clone());
///
/// assert!(ctx.deadline().is_some());
/// assert!(!ctx.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct RotationContext {
    /// Trace ID for log correlation
    pub trace_id: Uuid,

    /// When the invocation started
    pub started_at: DateTime<Utc>,

    deadline: Option<Instant>,
    timeout: Option<Duration>,
    cancellation: CancellationToken,
}

impl Default for RotationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationContext {
    /// Context with no deadline and a fresh, never-fired cancellation token
    pub fn new() -> Self {
        Self {
            trace_id: Uuid::new_v4(),
            started_at: Utc::now(),
            deadline: None,
            timeout: None,
            cancellation: CancellationToken::new(),
        }
    }

    /// Deadline `timeout` from now (builder pattern)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self.timeout = Some(timeout);
        self
    }

    /// Absolute deadline (builder pattern)
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self.timeout = None;
        self
    }

    /// Share a cancellation token with the caller (builder pattern)
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Set trace ID (builder pattern)
    pub fn with_trace_id(mut self, trace_id: Uuid) -> Self {
        self.trace_id = trace_id;
        self
    }

    /// Deadline, if one was set
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the cancellation token has fired
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Runs `future` until it completes, the token fires, or the deadline
    /// passes, whichever happens first. On interruption `future` is dropped
    /// before this returns.
    pub async fn run<F>(&self, future: F) -> Result<F::Output, Interrupted>
    where
        F: Future,
    {
        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            () = self.cancellation.cancelled() => Err(Interrupted::Cancelled),
            () = deadline => Err(Interrupted::DeadlineExceeded { timeout: self.timeout }),
            output = future => Ok(output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_without_deadline_completes() {
        let ctx = RotationContext::new();
        assert_eq!(ctx.run(async { 7 }).await, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_honours_deadline() {
        let ctx = RotationContext::new().with_timeout(Duration::from_millis(50));

        let outcome = ctx.run(std::future::pending::<()>()).await;

        assert_eq!(
            outcome,
            Err(Interrupted::DeadlineExceeded {
                timeout: Some(Duration::from_millis(50))
            })
        );
    }

    #[tokio::test]
    async fn test_run_honours_cancellation() {
        let token = CancellationToken::new();
        let ctx = RotationContext::new().with_cancellation(token.clone());
        token.cancel();

        let outcome = ctx.run(std::future::pending::<()>()).await;

        assert_eq!(outcome, Err(Interrupted::Cancelled));
        assert!(ctx.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_past_deadline_interrupts_immediately() {
        let ctx = RotationContext::new().with_deadline(Instant::now());
        let outcome = ctx.run(tokio::time::sleep(Duration::from_secs(1))).await;
        assert_eq!(outcome, Err(Interrupted::DeadlineExceeded { timeout: None }));
    }

    #[test]
    fn test_interrupted_messages() {
        assert_eq!(Interrupted::Cancelled.to_string(), "operation cancelled");
        assert_eq!(
            Interrupted::DeadlineExceeded {
                timeout: Some(Duration::from_millis(1500))
            }
            .to_string(),
            "deadline exceeded after 1500ms"
        );
    }

    #[test]
    fn test_context_with_trace_id() {
        let trace = Uuid::new_v4();
        let ctx = RotationContext::new().with_trace_id(trace);
        assert_eq!(ctx.trace_id, trace);
    }
}
