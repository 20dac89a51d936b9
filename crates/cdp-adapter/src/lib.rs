//! Remote evaluation and input gateways for the domdriver element engine.
//!
//! The crate speaks the Chromium DevTools Protocol through a [`CdpTransport`]
//! supplied by the caller and exposes two ports on top of it:
//!
//! - [`EvalPort`] runs prepared [`Expression`]s against remote nodes.
//! - [`InputPort`] synthesizes pointer and keyboard input.
//!
//! Expressions are only built by [`templates`], so callers never assemble
//! script source themselves.

pub mod error;
pub mod expression;
pub mod input;
pub mod ports;
pub mod runtime;
pub mod templates;
pub mod transport;

pub use error::{classify, classify_exception, AdapterError, AdapterErrorKind};
pub use expression::Expression;
pub use input::InputManager;
pub use ports::{EvalPort, InputPort, TypeParams};
pub use runtime::{RuntimeEvaluator, DEFAULT_EVAL_TIMEOUT};
pub use transport::{CdpTransport, CommandTarget, NoopTransport};
