use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

use crate::ActionId;

/// Why an execution context stopped admitting work.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Interruption {
    Cancelled,
    DeadlineExceeded,
}

impl Interruption {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interruption::Cancelled => "context cancelled",
            Interruption::DeadlineExceeded => "context deadline exceeded",
        }
    }
}

/// Execution context passed into every blocking call
///
/// Contains:
/// - Optional deadline for timeout enforcement
/// - Cancellation token for cooperative cancellation
/// - Unique action id for tracing and correlation
#[derive(Clone, Debug)]
pub struct ExecCtx {
    /// Deadline for this operation, `None` means unbounded
    pub deadline: Option<Instant>,

    /// Cancellation token for cooperative cancellation
    pub cancel_token: CancellationToken,

    /// Unique identifier for this action
    pub action_id: ActionId,
}

impl ExecCtx {
    pub fn new(deadline: Option<Instant>, cancel_token: CancellationToken) -> Self {
        Self {
            deadline,
            cancel_token,
            action_id: ActionId::new(),
        }
    }

    /// Context bounded by `timeout` from now, with a fresh token.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(Some(Instant::now() + timeout), CancellationToken::new())
    }

    /// Context without deadline; only cancellation can stop it.
    pub fn unbounded() -> Self {
        Self::new(None, CancellationToken::new())
    }

    /// Derive a context that shares cancellation with `self` but has a tighter
    /// deadline when `timeout` ends earlier than the parent's.
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(parent) if parent < candidate => parent,
            _ => candidate,
        };
        Self {
            deadline: Some(deadline),
            cancel_token: self.cancel_token.child_token(),
            action_id: self.action_id.clone(),
        }
    }

    /// Check if this context has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Check if this context has exceeded its deadline
    pub fn is_timeout(&self) -> bool {
        self.deadline
            .map(|deadline| Instant::now() >= deadline)
            .unwrap_or(false)
    }

    /// Cancellation wins over the deadline when both apply.
    pub fn interruption(&self) -> Option<Interruption> {
        if self.is_cancelled() {
            Some(Interruption::Cancelled)
        } else if self.is_timeout() {
            Some(Interruption::DeadlineExceeded)
        } else {
            None
        }
    }

    /// Get remaining time until deadline
    pub fn remaining_time(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Resolves once the context is cancelled or its deadline passes.
    pub async fn done(&self) -> Interruption {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.cancel_token.cancelled() => Interruption::Cancelled,
                    _ = sleep_until(deadline) => Interruption::DeadlineExceeded,
                }
            }
            None => {
                self.cancel_token.cancelled().await;
                Interruption::Cancelled
            }
        }
    }
}
