use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use domdriver_core_types::{ExecCtx, Interruption, RemoteObjectId, Value};
use serde_json::json;
use tracing::{debug, trace};

use crate::error::{classify, classify_exception, AdapterError, AdapterErrorKind};
use crate::expression::Expression;
use crate::ports::EvalPort;
use crate::transport::{CdpTransport, CommandTarget};

/// Default upper bound for a single evaluation round-trip.
pub const DEFAULT_EVAL_TIMEOUT: Duration = Duration::from_millis(30_000);

/// [`EvalPort`] over `Runtime.callFunctionOn` / `Runtime.evaluate`.
pub struct RuntimeEvaluator {
    transport: Arc<dyn CdpTransport>,
    target: CommandTarget,
    eval_timeout: Duration,
}

impl RuntimeEvaluator {
    pub fn new(transport: Arc<dyn CdpTransport>, target: CommandTarget) -> Self {
        Self {
            transport,
            target,
            eval_timeout: DEFAULT_EVAL_TIMEOUT,
        }
    }

    pub fn with_eval_timeout(mut self, timeout: Duration) -> Self {
        self.eval_timeout = timeout;
        self
    }

    /// Per-call bound: the configured timeout, tightened by the context deadline.
    fn call_timeout(&self, ctx: &ExecCtx) -> Duration {
        match ctx.remaining_time() {
            Some(remaining) => remaining.min(self.eval_timeout),
            None => self.eval_timeout,
        }
    }

    async fn send(&self, ctx: &ExecCtx, method: &str, params: Value) -> Result<Value, AdapterError> {
        if let Some(cause) = ctx.interruption() {
            return Err(interrupted(cause, method));
        }

        let bound = self.call_timeout(ctx);
        let call = self.transport.send_command(self.target.clone(), method, params);
        let response = tokio::select! {
            res = tokio::time::timeout(bound, call) => match res {
                Ok(inner) => inner.map_err(classify)?,
                Err(_) => {
                    return Err(AdapterError::new(AdapterErrorKind::Timeout)
                        .with_hint(format!("{method} exceeded {}ms", bound.as_millis())))
                }
            },
            _ = ctx.cancel_token.cancelled() => {
                return Err(interrupted(Interruption::Cancelled, method));
            }
        };

        if let Some(details) = response.get("exceptionDetails") {
            let class_name = details
                .get("exception")
                .and_then(|e| e.get("className"))
                .and_then(Value::as_str);
            let description = details
                .get("exception")
                .and_then(|e| e.get("description"))
                .and_then(Value::as_str)
                .or_else(|| details.get("text").and_then(Value::as_str))
                .unwrap_or("uncaught exception");
            return Err(classify_exception(class_name, description).with_data(details.clone()));
        }

        Ok(response)
    }

    async fn invoke(
        &self,
        ctx: &ExecCtx,
        expr: &Expression,
        by_value: bool,
    ) -> Result<Value, AdapterError> {
        trace!(template = expr.name(), by_value, "evaluating expression");
        match expr.owner() {
            Some(owner) => {
                let arguments: Vec<Value> =
                    expr.args().iter().map(|arg| json!({ "value": arg })).collect();
                self.send(
                    ctx,
                    "Runtime.callFunctionOn",
                    json!({
                        "objectId": owner.as_str(),
                        "functionDeclaration": expr.function(),
                        "arguments": arguments,
                        "awaitPromise": true,
                        "returnByValue": by_value,
                    }),
                )
                .await
            }
            None => {
                self.send(
                    ctx,
                    "Runtime.evaluate",
                    json!({
                        "expression": expr.to_invocation(),
                        "awaitPromise": true,
                        "returnByValue": by_value,
                        "userGesture": true,
                    }),
                )
                .await
            }
        }
    }

    async fn release(&self, id: &str) {
        let outcome = self
            .transport
            .send_command(
                self.target.clone(),
                "Runtime.releaseObject",
                json!({ "objectId": id }),
            )
            .await;
        if let Err(err) = outcome {
            debug!(object_id = id, error = %err, "releaseObject failed");
        }
    }
}

fn interrupted(cause: Interruption, method: &str) -> AdapterError {
    AdapterError::new(AdapterErrorKind::Timeout)
        .with_hint(format!("{method} not sent: {}", cause.as_str()))
        .retriable(false)
}

fn object_id(response: &Value) -> Option<RemoteObjectId> {
    let result = response.get("result")?;
    if result.get("subtype").and_then(Value::as_str) == Some("null") {
        return None;
    }
    result
        .get("objectId")
        .and_then(Value::as_str)
        .map(RemoteObjectId::from)
}

#[async_trait]
impl EvalPort for RuntimeEvaluator {
    async fn eval(&self, ctx: &ExecCtx, expr: &Expression) -> Result<(), AdapterError> {
        self.invoke(ctx, expr, true).await.map(|_| ())
    }

    async fn eval_value(&self, ctx: &ExecCtx, expr: &Expression) -> Result<Value, AdapterError> {
        let response = self.invoke(ctx, expr, true).await?;
        Ok(response
            .get("result")
            .and_then(|res| res.get("value"))
            .cloned()
            .unwrap_or(Value::Null))
    }

    async fn eval_element(
        &self,
        ctx: &ExecCtx,
        expr: &Expression,
    ) -> Result<Option<RemoteObjectId>, AdapterError> {
        let response = self.invoke(ctx, expr, false).await?;
        Ok(object_id(&response))
    }

    async fn eval_elements(
        &self,
        ctx: &ExecCtx,
        expr: &Expression,
    ) -> Result<Vec<RemoteObjectId>, AdapterError> {
        let response = self.invoke(ctx, expr, false).await?;
        let array = match object_id(&response) {
            Some(id) => id,
            None => return Ok(Vec::new()),
        };

        let props = self
            .send(
                ctx,
                "Runtime.getProperties",
                json!({ "objectId": array.as_str(), "ownProperties": true }),
            )
            .await;
        self.release(array.as_str()).await;

        let mut indexed: Vec<(usize, RemoteObjectId)> = props?
            .get("result")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| {
                        let index = entry.get("name")?.as_str()?.parse::<usize>().ok()?;
                        let id = entry
                            .get("value")?
                            .get("objectId")?
                            .as_str()
                            .map(RemoteObjectId::from)?;
                        Some((index, id))
                    })
                    .collect()
            })
            .unwrap_or_default();
        indexed.sort_by_key(|(index, _)| *index);
        Ok(indexed.into_iter().map(|(_, id)| id).collect())
    }
}
