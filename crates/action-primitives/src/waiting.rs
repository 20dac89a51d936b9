//! Poll task: retry an evaluation until it reports satisfied or the context ends.

use std::sync::Arc;
use std::time::Duration;

use cdp_adapter::{AdapterError, EvalPort, Expression};
use domdriver_core_types::{ExecCtx, Interruption, Value, DEFAULT_POLLING_MS};
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

use crate::errors::ActionError;

/// Terminal state of a [`PollTask`].
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The expression returned something other than `null` or `false`.
    Satisfied { value: Value, attempts: u32 },
    /// The context was cancelled or its deadline passed first.
    TimedOut { cause: Interruption, attempts: u32 },
    /// The gateway reported a non-transient error.
    Failed { error: AdapterError, attempts: u32 },
}

impl PollOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            PollOutcome::Satisfied { attempts, .. }
            | PollOutcome::TimedOut { attempts, .. }
            | PollOutcome::Failed { attempts, .. } => *attempts,
        }
    }

    pub fn is_satisfied(&self) -> bool {
        matches!(self, PollOutcome::Satisfied { .. })
    }
}

/// `null` and `false` mean "not yet"; every other value satisfies.
pub fn is_satisfied(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

/// Re-evaluates one expression at a fixed cadence.
///
/// Evaluations are strictly sequential: the next one starts only after the
/// previous one returned and the polling interval elapsed.
pub struct PollTask {
    eval: Arc<dyn EvalPort>,
    expression: Expression,
    polling: Duration,
    description: String,
}

impl PollTask {
    pub fn new(eval: Arc<dyn EvalPort>, expression: Expression) -> Self {
        let description = expression.name().to_string();
        Self {
            eval,
            expression,
            polling: Duration::from_millis(DEFAULT_POLLING_MS),
            description,
        }
    }

    pub fn with_polling(mut self, polling: Duration) -> Self {
        self.polling = polling;
        self
    }

    /// Human-readable condition and target, used in error messages.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    #[instrument(skip_all, fields(action_id = %ctx.action_id, template = self.expression.name()))]
    pub async fn run_outcome(&self, ctx: &ExecCtx) -> PollOutcome {
        let mut attempts = 0u32;
        loop {
            if let Some(cause) = ctx.interruption() {
                return PollOutcome::TimedOut { cause, attempts };
            }

            attempts += 1;
            match self.eval.eval_value(ctx, &self.expression).await {
                Ok(value) if is_satisfied(&value) => {
                    debug!(attempts, "condition satisfied");
                    return PollOutcome::Satisfied { value, attempts };
                }
                Ok(_) => debug!(attempts, "condition not satisfied yet"),
                Err(error) if error.is_transient() => {
                    debug!(attempts, error = %error, "transient evaluation failure")
                }
                Err(error) => return PollOutcome::Failed { error, attempts },
            }

            if let Some(cause) = ctx.interruption() {
                return PollOutcome::TimedOut { cause, attempts };
            }

            tokio::select! {
                biased;
                cause = ctx.done() => return PollOutcome::TimedOut { cause, attempts },
                _ = sleep(self.polling) => {}
            }
        }
    }

    /// Projects the outcome onto `Result`; `TimedOut` becomes [`ActionError::Timeout`].
    pub async fn run(&self, ctx: &ExecCtx) -> Result<Value, ActionError> {
        match self.run_outcome(ctx).await {
            PollOutcome::Satisfied { value, .. } => Ok(value),
            PollOutcome::TimedOut { cause, attempts } => {
                warn!(
                    action_id = %ctx.action_id,
                    condition = %self.description,
                    attempts,
                    "wait timed out"
                );
                Err(ActionError::Timeout(format!(
                    "{}: {} after {} attempts",
                    self.description,
                    cause.as_str(),
                    attempts
                )))
            }
            PollOutcome::Failed { error, attempts } => {
                warn!(
                    action_id = %ctx.action_id,
                    condition = %self.description,
                    attempts,
                    error = %error,
                    "wait failed"
                );
                Err(ActionError::from(error).context(&self.description))
            }
        }
    }
}
