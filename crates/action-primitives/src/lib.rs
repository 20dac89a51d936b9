//! Action primitives for remote DOM elements
//!
//! This crate turns untyped action requests and wait conditions into calls on
//! the evaluation and input gateways:
//! - Option resolution from a loosely typed bag into [`OptionSet`]
//! - [`Dispatcher`]: one primitive per request, element or selector targeted
//! - [`PollTask`]: retry an evaluation until satisfied, cancelled or timed out
//! - [`ConditionObserver`]: named waits for presence, class, attribute and style
//! - [`HtmlElement`]: the handle that composes all of the above

pub mod coerce;
mod dispatcher;
mod element;
pub mod errors;
mod observer;
pub mod options;
pub mod types;
mod waiting;

pub use dispatcher::*;
pub use element::*;
pub use errors::*;
pub use observer::*;
pub use options::{option_or, resolve_options, OptionResolver};
pub use types::*;
pub use waiting::*;
