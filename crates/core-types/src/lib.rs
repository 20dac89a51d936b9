//! Shared primitives for the domdriver element engine.
//!
//! Everything here is plain data: identifiers for remote nodes, selectors,
//! wait polarity, scroll options and the execution context that carries
//! deadlines and cancellation through every blocking call.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

mod ctx;
mod scroll;
mod selector;

pub use ctx::{ExecCtx, Interruption};
pub use scroll::{ScrollAlignment, ScrollBehavior, ScrollOptions};
pub use selector::{QuerySelector, SelectorKind};

/// Dynamic value exchanged with the remote document.
pub type Value = serde_json::Value;

/// Delay between synthesized keystrokes, in milliseconds.
pub const DEFAULT_KEYBOARD_DELAY_MS: u64 = 25;

/// Deadline applied to waits when the caller does not bring its own.
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 5_000;

/// Cadence of condition polling, in milliseconds.
pub const DEFAULT_POLLING_MS: u64 = 100;

/// Errors raised while parsing shared primitives from loosely typed input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}

impl CoreError {
    pub fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownVariant {
            kind,
            value: value.into(),
        }
    }
}

/// Opaque identifier of a live node in the remote document.
///
/// Issued by the remote runtime; this crate never mints real ones. A stale id
/// is only detected when a gateway call using it fails.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteObjectId(pub String);

impl RemoteObjectId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemoteObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RemoteObjectId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub String);

impl ActionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for ActionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Polarity of a wait condition.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitEvent {
    /// The predicate must hold.
    #[default]
    Exists,
    /// The predicate must not hold.
    NotExists,
}

impl WaitEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaitEvent::Exists => "exists",
            WaitEvent::NotExists => "not_exists",
        }
    }

    pub fn is_exists(&self) -> bool {
        matches!(self, WaitEvent::Exists)
    }
}

impl fmt::Display for WaitEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WaitEvent {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exists" | "exist" => Ok(WaitEvent::Exists),
            "not_exists" | "not-exists" | "notexists" | "not" => Ok(WaitEvent::NotExists),
            other => Err(CoreError::unknown("wait event", other)),
        }
    }
}
