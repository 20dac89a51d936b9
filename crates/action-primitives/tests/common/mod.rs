#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use cdp_adapter::{
    AdapterError, AdapterErrorKind, CdpTransport, CommandTarget, EvalPort, Expression, InputPort,
    TypeParams,
};
use domdriver_core_types::{ExecCtx, QuerySelector, RemoteObjectId, ScrollOptions, Value};
use tokio::time::Instant;

/// Input port that records each primitive as `name` or `name(selector)` plus its payload.
#[derive(Default)]
pub struct RecordingInput {
    calls: Mutex<Vec<(String, Value)>>,
    selected: Mutex<Vec<String>>,
}

impl RecordingInput {
    pub fn selecting(applied: &[&str]) -> Self {
        let input = Self::default();
        *input.selected.lock().unwrap() = applied.iter().map(|s| s.to_string()).collect();
        input
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.calls().into_iter().map(|(name, _)| name).collect()
    }

    fn record(&self, name: &str, selector: Option<&QuerySelector>, payload: Value) {
        let name = match selector {
            Some(sel) => format!("{name}({sel})"),
            None => name.to_string(),
        };
        self.calls.lock().unwrap().push((name, payload));
    }
}

#[async_trait]
impl InputPort for RecordingInput {
    async fn click(&self, _ctx: &ExecCtx, _id: &RemoteObjectId, count: u32) -> Result<(), AdapterError> {
        self.record("click", None, serde_json::json!({ "count": count }));
        Ok(())
    }

    async fn click_by_selector(
        &self,
        _ctx: &ExecCtx,
        _id: &RemoteObjectId,
        selector: &QuerySelector,
        count: u32,
    ) -> Result<(), AdapterError> {
        self.record("click", Some(selector), serde_json::json!({ "count": count }));
        Ok(())
    }

    async fn type_text(
        &self,
        _ctx: &ExecCtx,
        _id: &RemoteObjectId,
        params: &TypeParams,
    ) -> Result<(), AdapterError> {
        self.record("type", None, type_payload(params));
        Ok(())
    }

    async fn type_by_selector(
        &self,
        _ctx: &ExecCtx,
        _id: &RemoteObjectId,
        selector: &QuerySelector,
        params: &TypeParams,
    ) -> Result<(), AdapterError> {
        self.record("type", Some(selector), type_payload(params));
        Ok(())
    }

    async fn press(
        &self,
        _ctx: &ExecCtx,
        _id: &RemoteObjectId,
        keys: &[String],
        count: u32,
    ) -> Result<(), AdapterError> {
        self.record("press", None, serde_json::json!({ "keys": keys, "count": count }));
        Ok(())
    }

    async fn press_by_selector(
        &self,
        _ctx: &ExecCtx,
        _id: &RemoteObjectId,
        selector: &QuerySelector,
        keys: &[String],
        count: u32,
    ) -> Result<(), AdapterError> {
        self.record(
            "press",
            Some(selector),
            serde_json::json!({ "keys": keys, "count": count }),
        );
        Ok(())
    }

    async fn clear(&self, _ctx: &ExecCtx, _id: &RemoteObjectId) -> Result<(), AdapterError> {
        self.record("clear", None, Value::Null);
        Ok(())
    }

    async fn clear_by_selector(
        &self,
        _ctx: &ExecCtx,
        _id: &RemoteObjectId,
        selector: &QuerySelector,
    ) -> Result<(), AdapterError> {
        self.record("clear", Some(selector), Value::Null);
        Ok(())
    }

    async fn select(
        &self,
        _ctx: &ExecCtx,
        _id: &RemoteObjectId,
        values: &[String],
    ) -> Result<Vec<String>, AdapterError> {
        self.record("select", None, serde_json::json!(values));
        Ok(self.selected.lock().unwrap().clone())
    }

    async fn select_by_selector(
        &self,
        _ctx: &ExecCtx,
        _id: &RemoteObjectId,
        selector: &QuerySelector,
        values: &[String],
    ) -> Result<Vec<String>, AdapterError> {
        self.record("select", Some(selector), serde_json::json!(values));
        Ok(self.selected.lock().unwrap().clone())
    }

    async fn scroll_by(&self, _ctx: &ExecCtx, options: &ScrollOptions) -> Result<(), AdapterError> {
        self.record("scroll_by", None, scroll_payload(options));
        Ok(())
    }

    async fn scroll_into_view(
        &self,
        _ctx: &ExecCtx,
        _id: &RemoteObjectId,
        options: &ScrollOptions,
    ) -> Result<(), AdapterError> {
        self.record("scroll_into_view", None, scroll_payload(options));
        Ok(())
    }

    async fn scroll_top(&self, _ctx: &ExecCtx, options: &ScrollOptions) -> Result<(), AdapterError> {
        self.record("scroll_top", None, scroll_payload(options));
        Ok(())
    }

    async fn scroll_bottom(&self, _ctx: &ExecCtx, options: &ScrollOptions) -> Result<(), AdapterError> {
        self.record("scroll_bottom", None, scroll_payload(options));
        Ok(())
    }

    async fn scroll_into_view_by_selector(
        &self,
        _ctx: &ExecCtx,
        _id: &RemoteObjectId,
        selector: &QuerySelector,
        options: &ScrollOptions,
    ) -> Result<(), AdapterError> {
        self.record("scroll_into_view", Some(selector), scroll_payload(options));
        Ok(())
    }

    async fn focus(&self, _ctx: &ExecCtx, _id: &RemoteObjectId) -> Result<(), AdapterError> {
        self.record("focus", None, Value::Null);
        Ok(())
    }

    async fn focus_by_selector(
        &self,
        _ctx: &ExecCtx,
        _id: &RemoteObjectId,
        selector: &QuerySelector,
    ) -> Result<(), AdapterError> {
        self.record("focus", Some(selector), Value::Null);
        Ok(())
    }

    async fn blur(&self, _ctx: &ExecCtx, _id: &RemoteObjectId) -> Result<(), AdapterError> {
        self.record("blur", None, Value::Null);
        Ok(())
    }

    async fn blur_by_selector(
        &self,
        _ctx: &ExecCtx,
        _id: &RemoteObjectId,
        selector: &QuerySelector,
    ) -> Result<(), AdapterError> {
        self.record("blur", Some(selector), Value::Null);
        Ok(())
    }

    async fn hover(&self, _ctx: &ExecCtx, _id: &RemoteObjectId) -> Result<(), AdapterError> {
        self.record("hover", None, Value::Null);
        Ok(())
    }

    async fn hover_by_selector(
        &self,
        _ctx: &ExecCtx,
        _id: &RemoteObjectId,
        selector: &QuerySelector,
    ) -> Result<(), AdapterError> {
        self.record("hover", Some(selector), Value::Null);
        Ok(())
    }

    async fn move_mouse_by_coordinates(
        &self,
        _ctx: &ExecCtx,
        x: f64,
        y: f64,
    ) -> Result<(), AdapterError> {
        self.record("move_mouse", None, serde_json::json!({ "x": x, "y": y }));
        Ok(())
    }
}

fn type_payload(params: &TypeParams) -> Value {
    serde_json::json!({
        "text": params.text,
        "clear": params.clear,
        "delay_ms": params.delay.as_millis() as u64,
    })
}

fn scroll_payload(options: &ScrollOptions) -> Value {
    serde_json::json!({
        "top": options.top,
        "left": options.left,
        "behavior": options.behavior.as_str(),
        "block": options.block.as_str(),
    })
}

/// Evaluator that answers `eval_value` from a script, then repeats a fallback.
///
/// Records the virtual instant and template name of every call.
pub struct ScriptedEval {
    script: Mutex<VecDeque<Result<Value, AdapterError>>>,
    fallback: Result<Value, AdapterError>,
    elements: Mutex<VecDeque<Vec<RemoteObjectId>>>,
    calls: Mutex<Vec<(Instant, &'static str)>>,
}

impl ScriptedEval {
    pub fn new(script: Vec<Result<Value, AdapterError>>, fallback: Result<Value, AdapterError>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            elements: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with `value`.
    pub fn constant(value: Value) -> Self {
        Self::new(Vec::new(), Ok(value))
    }

    pub fn with_elements(self, batches: Vec<Vec<RemoteObjectId>>) -> Self {
        *self.elements.lock().unwrap() = batches.into();
        self
    }

    pub fn calls(&self) -> Vec<(Instant, &'static str)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn next(&self, expr: &Expression) -> Result<Value, AdapterError> {
        self.calls
            .lock()
            .unwrap()
            .push((Instant::now(), expr.name()));
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

pub fn transient() -> AdapterError {
    AdapterError::new(AdapterErrorKind::Transient).with_hint("Execution context was destroyed.")
}

#[async_trait]
impl EvalPort for ScriptedEval {
    async fn eval(&self, _ctx: &ExecCtx, expr: &Expression) -> Result<(), AdapterError> {
        self.next(expr).map(|_| ())
    }

    async fn eval_value(&self, _ctx: &ExecCtx, expr: &Expression) -> Result<Value, AdapterError> {
        self.next(expr)
    }

    async fn eval_element(
        &self,
        _ctx: &ExecCtx,
        expr: &Expression,
    ) -> Result<Option<RemoteObjectId>, AdapterError> {
        self.calls
            .lock()
            .unwrap()
            .push((Instant::now(), expr.name()));
        Ok(self
            .elements
            .lock()
            .unwrap()
            .pop_front()
            .and_then(|batch| batch.into_iter().next()))
    }

    async fn eval_elements(
        &self,
        _ctx: &ExecCtx,
        expr: &Expression,
    ) -> Result<Vec<RemoteObjectId>, AdapterError> {
        self.calls
            .lock()
            .unwrap()
            .push((Instant::now(), expr.name()));
        Ok(self.elements.lock().unwrap().pop_front().unwrap_or_default())
    }
}

/// Transport that acknowledges every command and remembers it.
#[derive(Default)]
pub struct RecordingTransport {
    commands: tokio::sync::Mutex<Vec<(String, Value)>>,
}

impl RecordingTransport {
    pub async fn commands(&self) -> Vec<(String, Value)> {
        self.commands.lock().await.clone()
    }
}

#[async_trait]
impl CdpTransport for RecordingTransport {
    async fn send_command(
        &self,
        _target: CommandTarget,
        method: &str,
        params: Value,
    ) -> Result<Value, AdapterError> {
        self.commands
            .lock()
            .await
            .push((method.to_string(), params));
        Ok(serde_json::json!({}))
    }
}
