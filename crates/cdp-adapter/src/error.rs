use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// High-level error categories surfaced by the gateways.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdapterErrorKind {
    /// The remote object reference no longer resolves.
    #[error("target invalid")]
    TargetInvalid,
    /// A selector-qualified primitive matched nothing.
    #[error("target element not found")]
    TargetNotFound,
    /// The evaluation raced a document mutation or context swap.
    #[error("transient evaluation failure")]
    Transient,
    /// The per-call bound of the gateway elapsed.
    #[error("evaluation timed out")]
    Timeout,
    #[error("cdp i/o failure")]
    CdpIo,
    #[error("internal error")]
    Internal,
}

/// Enriched error metadata passed back to higher layers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdapterError {
    pub kind: AdapterErrorKind,
    pub hint: Option<String>,
    pub retriable: bool,
    pub data: Option<serde_json::Value>,
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(hint) = &self.hint {
            write!(f, ": {}", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for AdapterError {}

impl AdapterError {
    pub fn new(kind: AdapterErrorKind) -> Self {
        Self {
            kind,
            hint: None,
            retriable: matches!(kind, AdapterErrorKind::Transient | AdapterErrorKind::Timeout),
            data: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn retriable(mut self, flag: bool) -> Self {
        self.retriable = flag;
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Transient failures mean "not yet" to a poller, never "failed".
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind,
            AdapterErrorKind::Transient | AdapterErrorKind::Timeout
        )
    }

    pub fn hint_or_kind(&self) -> String {
        self.hint.clone().unwrap_or_else(|| self.kind.to_string())
    }
}

const TARGET_INVALID_MARKERS: &[&str] = &[
    "could not find object with given id",
    "cannot find object with id",
    "no node with given id",
    "node with given id does not belong to the document",
    "inspected target navigated or closed",
];

const TRANSIENT_MARKERS: &[&str] = &[
    "execution context was destroyed",
    "cannot find context with specified id",
    "cannot find default execution context",
    "promise was collected",
];

/// Re-classify a protocol failure by the message the browser attached to it.
///
/// Errors that already carry a specific kind are returned unchanged.
pub fn classify(err: AdapterError) -> AdapterError {
    if err.kind != AdapterErrorKind::CdpIo {
        return err;
    }

    let message = match err.hint.as_deref() {
        Some(hint) => hint.to_ascii_lowercase(),
        None => return err,
    };

    let kind = if TARGET_INVALID_MARKERS.iter().any(|m| message.contains(m)) {
        AdapterErrorKind::TargetInvalid
    } else if TRANSIENT_MARKERS.iter().any(|m| message.contains(m)) {
        AdapterErrorKind::Transient
    } else {
        return err;
    };

    AdapterError {
        kind,
        retriable: kind == AdapterErrorKind::Transient,
        ..err
    }
}

/// Classify a JavaScript exception raised inside an evaluated function.
///
/// Malformed selectors surface as `SyntaxError` and never heal by retrying.
pub fn classify_exception(class_name: Option<&str>, description: &str) -> AdapterError {
    let lowered = description.to_ascii_lowercase();
    let syntax = matches!(class_name, Some("SyntaxError"))
        || lowered.starts_with("syntaxerror")
        || lowered.contains("is not a valid selector")
        || lowered.contains("not a valid xpath expression");

    let kind = if syntax {
        AdapterErrorKind::Internal
    } else {
        AdapterErrorKind::Transient
    };

    AdapterError::new(kind).with_hint(description.to_string())
}
