//! Session factory: wires transport-backed ports into element handles.

use std::sync::Arc;

use action_primitives::{HandleSettings, HtmlElement};
use cdp_adapter::{CdpTransport, CommandTarget, EvalPort, InputManager, InputPort, RuntimeEvaluator};
use domdriver_core_types::{ExecCtx, RemoteObjectId};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::DriverConfig;

/// One attached page session. Cheap to clone; every handle it mints shares
/// the same evaluator and input gateway.
#[derive(Clone)]
pub struct DomSession {
    eval: Arc<dyn EvalPort>,
    input: Arc<dyn InputPort>,
    settings: HandleSettings,
}

impl DomSession {
    pub fn new(transport: Arc<dyn CdpTransport>, target: CommandTarget, config: &DriverConfig) -> Self {
        let eval: Arc<dyn EvalPort> = Arc::new(
            RuntimeEvaluator::new(transport.clone(), target.clone())
                .with_eval_timeout(config.eval_timeout()),
        );
        let input: Arc<dyn InputPort> = Arc::new(InputManager::new(transport, target, eval.clone()));
        Self::with_ports(eval, input, config)
    }

    /// Build a session over ports supplied by the caller.
    pub fn with_ports(eval: Arc<dyn EvalPort>, input: Arc<dyn InputPort>, config: &DriverConfig) -> Self {
        Self {
            eval,
            input,
            settings: config.handle_settings(),
        }
    }

    pub fn settings(&self) -> HandleSettings {
        self.settings
    }

    pub fn evaluator(&self) -> Arc<dyn EvalPort> {
        self.eval.clone()
    }

    pub fn input(&self) -> Arc<dyn InputPort> {
        self.input.clone()
    }

    /// Handle for a node id obtained from the remote runtime.
    pub fn element(&self, id: impl Into<RemoteObjectId>) -> HtmlElement {
        let id = id.into();
        debug!(object_id = %id, "element handle created");
        HtmlElement::new(id, self.eval.clone(), self.input.clone(), self.settings)
    }

    /// Context bounded by the configured wait timeout.
    pub fn exec_ctx(&self) -> ExecCtx {
        ExecCtx::with_timeout(self.settings.wait_timeout)
    }

    /// Like [`exec_ctx`](Self::exec_ctx), but also stopped when `shutdown` fires.
    pub fn exec_ctx_until(&self, shutdown: &CancellationToken) -> ExecCtx {
        let bounded = ExecCtx::with_timeout(self.settings.wait_timeout);
        ExecCtx::new(bounded.deadline, shutdown.child_token())
    }
}
