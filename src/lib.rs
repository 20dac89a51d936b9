//! domdriver: remote DOM element engine.
//!
//! The heavy lifting lives in the workspace crates; this package adds the
//! pieces an application needs to stand the engine up:
//! - [`config`]: YAML configuration with environment overrides
//! - [`logging`]: tracing subscriber bootstrap
//! - [`session`]: [`DomSession`], which turns a protocol transport into
//!   element handles

pub mod config;
pub mod logging;
pub mod session;

pub use config::{load_config, DriverConfig, LoadedConfig};
pub use logging::init_logging;
pub use session::DomSession;

pub use action_primitives::{
    ActionError, ActionKind, ActionRequest, ConditionKind, ConditionObserver, ConditionTarget,
    Dispatcher, HandleSettings, HtmlElement, PollOutcome, PollTask, WaitCondition,
};
pub use cdp_adapter::{
    AdapterError, AdapterErrorKind, CdpTransport, CommandTarget, EvalPort, InputPort, NoopTransport,
};
pub use domdriver_core_types::{
    ExecCtx, QuerySelector, RemoteObjectId, ScrollAlignment, ScrollBehavior, ScrollOptions, Value,
    WaitEvent,
};
