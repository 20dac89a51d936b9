use async_trait::async_trait;
use serde_json::Value;

use crate::error::{AdapterError, AdapterErrorKind};

/// Where a protocol command is routed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandTarget {
    Browser,
    Session(String),
}

/// Raw protocol channel the gateways are built on.
///
/// Implementations own the connection, request ids and response matching.
/// Protocol-level failures come back as `AdapterErrorKind::CdpIo` with the
/// browser's message in the hint, formatted `cdp error {code}: {message}`.
#[async_trait]
pub trait CdpTransport: Send + Sync {
    async fn send_command(
        &self,
        target: CommandTarget,
        method: &str,
        params: Value,
    ) -> Result<Value, AdapterError>;
}

/// Transport for a session that is not attached to a page yet. Every
/// command fails with `Internal`, naming the method.
#[derive(Default)]
pub struct NoopTransport;

#[async_trait]
impl CdpTransport for NoopTransport {
    async fn send_command(
        &self,
        _target: CommandTarget,
        method: &str,
        _params: Value,
    ) -> Result<Value, AdapterError> {
        Err(AdapterError::new(AdapterErrorKind::Internal)
            .with_hint(format!("transport not available for method {method}")))
    }
}
