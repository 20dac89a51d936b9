//! Error types for action primitives

use cdp_adapter::{AdapterError, AdapterErrorKind};
use thiserror::Error;

/// Failures surfaced by dispatch, waits and element accessors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ActionError {
    /// Action name not present in the primitive table
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Option or argument value of the wrong shape
    #[error("type coercion failed: {0}")]
    TypeCoercion(String),

    /// Condition not satisfied before the caller's deadline, or the call was cancelled
    #[error("timeout: {0}")]
    Timeout(String),

    /// Remote reference no longer resolves; re-acquire the element
    #[error("target invalid: {0}")]
    TargetInvalid(String),

    /// Selector matched nothing
    #[error("target not found: {0}")]
    TargetNotFound(String),

    /// Script raised inside the remote document
    #[error("evaluation failed: {0}")]
    Evaluation(String),

    /// CDP communication or protocol error
    #[error("CDP I/O error: {0}")]
    CdpIo(String),

    /// Internal error (should not happen in normal operation)
    #[error("internal error: {0}")]
    Internal(String),
}

impl ActionError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ActionError::Timeout(_) | ActionError::Evaluation(_) | ActionError::CdpIo(_)
        )
    }

    /// Get error severity level (0=low, 1=medium, 2=high, 3=critical)
    pub fn severity(&self) -> u8 {
        match self {
            ActionError::Internal(_) | ActionError::TargetInvalid(_) => 3,
            ActionError::CdpIo(_) | ActionError::InvalidOperation(_) => 2,
            ActionError::Timeout(_)
            | ActionError::TargetNotFound(_)
            | ActionError::TypeCoercion(_) => 1,
            ActionError::Evaluation(_) => 0,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ActionError::Timeout(_))
    }

    /// Prefix the message with what was being attempted.
    pub fn context(self, what: &str) -> Self {
        let wrap = |msg: String| format!("{what}: {msg}");
        match self {
            ActionError::InvalidOperation(msg) => ActionError::InvalidOperation(wrap(msg)),
            ActionError::TypeCoercion(msg) => ActionError::TypeCoercion(wrap(msg)),
            ActionError::Timeout(msg) => ActionError::Timeout(wrap(msg)),
            ActionError::TargetInvalid(msg) => ActionError::TargetInvalid(wrap(msg)),
            ActionError::TargetNotFound(msg) => ActionError::TargetNotFound(wrap(msg)),
            ActionError::Evaluation(msg) => ActionError::Evaluation(wrap(msg)),
            ActionError::CdpIo(msg) => ActionError::CdpIo(wrap(msg)),
            ActionError::Internal(msg) => ActionError::Internal(wrap(msg)),
        }
    }
}

impl From<AdapterError> for ActionError {
    fn from(err: AdapterError) -> Self {
        let message = err.hint_or_kind();
        match err.kind {
            AdapterErrorKind::TargetInvalid => ActionError::TargetInvalid(message),
            AdapterErrorKind::TargetNotFound => ActionError::TargetNotFound(message),
            AdapterErrorKind::Transient => ActionError::Evaluation(message),
            AdapterErrorKind::Timeout => ActionError::Timeout(message),
            AdapterErrorKind::CdpIo => ActionError::CdpIo(message),
            AdapterErrorKind::Internal => ActionError::Internal(message),
        }
    }
}
