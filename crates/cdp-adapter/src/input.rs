use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use domdriver_core_types::{
    ExecCtx, Interruption, QuerySelector, RemoteObjectId, ScrollOptions, Value,
};
use serde_json::json;
use tracing::debug;

use crate::error::{classify, AdapterError, AdapterErrorKind};
use crate::expression::Expression;
use crate::ports::{EvalPort, InputPort, TypeParams};
use crate::templates;
use crate::transport::{CdpTransport, CommandTarget};

/// [`InputPort`] that synthesizes trusted events through the `Input` domain and
/// uses the evaluator for focus, measurement and form helpers.
pub struct InputManager {
    transport: Arc<dyn CdpTransport>,
    target: CommandTarget,
    eval: Arc<dyn EvalPort>,
}

impl InputManager {
    pub fn new(
        transport: Arc<dyn CdpTransport>,
        target: CommandTarget,
        eval: Arc<dyn EvalPort>,
    ) -> Self {
        Self {
            transport,
            target,
            eval,
        }
    }

    async fn dispatch(&self, ctx: &ExecCtx, method: &str, params: Value) -> Result<(), AdapterError> {
        if let Some(cause) = ctx.interruption() {
            return Err(interrupted(cause));
        }
        self.transport
            .send_command(self.target.clone(), method, params)
            .await
            .map(|_| ())
            .map_err(classify)
    }

    async fn point(&self, ctx: &ExecCtx, expr: &Expression, what: &str) -> Result<(f64, f64), AdapterError> {
        let value = self.eval.eval_value(ctx, expr).await?;
        if value.is_null() {
            return Err(not_found(what));
        }
        let x = value.get("x").and_then(Value::as_f64);
        let y = value.get("y").and_then(Value::as_f64);
        match (x, y) {
            (Some(x), Some(y)) => Ok((x, y)),
            _ => Err(AdapterError::new(AdapterErrorKind::Internal)
                .with_hint(format!("click point for {what} is not measurable"))
                .with_data(value)),
        }
    }

    /// Runs a selector-scoped helper that reports whether it found its target.
    async fn expect_found(&self, ctx: &ExecCtx, expr: &Expression, selector: &QuerySelector) -> Result<(), AdapterError> {
        match self.eval.eval_value(ctx, expr).await? {
            Value::Bool(false) | Value::Null => Err(not_found(&selector_label(selector))),
            _ => Ok(()),
        }
    }

    async fn mouse_move(&self, ctx: &ExecCtx, x: f64, y: f64) -> Result<(), AdapterError> {
        self.dispatch(
            ctx,
            "Input.dispatchMouseEvent",
            json!({ "type": "mouseMoved", "x": x, "y": y, "pointerType": "mouse" }),
        )
        .await
    }

    async fn mouse_click(&self, ctx: &ExecCtx, x: f64, y: f64, count: u32) -> Result<(), AdapterError> {
        self.mouse_move(ctx, x, y).await?;
        for i in 0..count {
            for kind in ["mousePressed", "mouseReleased"] {
                self.dispatch(
                    ctx,
                    "Input.dispatchMouseEvent",
                    json!({
                        "type": kind,
                        "x": x,
                        "y": y,
                        "button": "left",
                        "buttons": 1,
                        "clickCount": i + 1,
                        "pointerType": "mouse",
                    }),
                )
                .await?;
            }
        }
        debug!(x, y, count, "mouse click dispatched");
        Ok(())
    }

    async fn type_chars(&self, ctx: &ExecCtx, text: &str, delay: Duration) -> Result<(), AdapterError> {
        let mut first = true;
        for ch in text.chars() {
            if !first {
                pause(ctx, delay).await?;
            }
            first = false;

            let key = ch.to_string();
            let text = if ch == '\n' { "\r".to_string() } else { key.clone() };
            self.dispatch(
                ctx,
                "Input.dispatchKeyEvent",
                json!({ "type": "keyDown", "key": key, "text": text, "unmodifiedText": text }),
            )
            .await?;
            self.dispatch(
                ctx,
                "Input.dispatchKeyEvent",
                json!({ "type": "keyUp", "key": key }),
            )
            .await?;
        }
        Ok(())
    }

    /// Holds `keys` down in order and releases them in reverse, `count` times.
    async fn press_keys(&self, ctx: &ExecCtx, keys: &[String], count: u32) -> Result<(), AdapterError> {
        for _ in 0..count {
            for key in keys {
                let mut event = key_event("keyDown", key);
                if let Some(text) = key_text(key) {
                    event["text"] = json!(text);
                    event["unmodifiedText"] = json!(text);
                }
                self.dispatch(ctx, "Input.dispatchKeyEvent", event).await?;
            }
            for key in keys.iter().rev() {
                self.dispatch(ctx, "Input.dispatchKeyEvent", key_event("keyUp", key))
                    .await?;
            }
        }
        Ok(())
    }
}

fn interrupted(cause: Interruption) -> AdapterError {
    AdapterError::new(AdapterErrorKind::Timeout)
        .with_hint(format!("input aborted: {}", cause.as_str()))
        .retriable(false)
}

fn not_found(what: &str) -> AdapterError {
    AdapterError::new(AdapterErrorKind::TargetNotFound).with_hint(format!("{what} matched nothing"))
}

fn selector_label(selector: &QuerySelector) -> String {
    format!("selector '{selector}'")
}

async fn pause(ctx: &ExecCtx, delay: Duration) -> Result<(), AdapterError> {
    if delay.is_zero() {
        return Ok(());
    }
    tokio::select! {
        _ = tokio::time::sleep(delay) => Ok(()),
        cause = ctx.done() => Err(interrupted(cause)),
    }
}

/// Key name, DOM code and Windows virtual key code for the named keys
/// `Input.dispatchKeyEvent` needs spelled out.
const KEY_DEFINITIONS: &[(&str, &str, i64)] = &[
    ("Enter", "Enter", 13),
    ("Tab", "Tab", 9),
    ("Backspace", "Backspace", 8),
    ("Escape", "Escape", 27),
    ("Delete", "Delete", 46),
    ("ArrowUp", "ArrowUp", 38),
    ("ArrowDown", "ArrowDown", 40),
    ("ArrowLeft", "ArrowLeft", 37),
    ("ArrowRight", "ArrowRight", 39),
    ("Home", "Home", 36),
    ("End", "End", 35),
    ("PageUp", "PageUp", 33),
    ("PageDown", "PageDown", 34),
    ("Shift", "ShiftLeft", 16),
    ("Control", "ControlLeft", 17),
    ("Alt", "AltLeft", 18),
    ("Meta", "MetaLeft", 91),
    (" ", "Space", 32),
];

fn key_event(kind: &str, key: &str) -> Value {
    let mut event = json!({ "type": kind, "key": key });
    if let Some((_, code, vk)) = KEY_DEFINITIONS.iter().find(|(name, _, _)| *name == key) {
        event["code"] = json!(code);
        event["windowsVirtualKeyCode"] = json!(vk);
    }
    event
}

fn key_text(key: &str) -> Option<&str> {
    match key {
        "Enter" => Some("\r"),
        _ if key.chars().count() == 1 => Some(key),
        _ => None,
    }
}

#[async_trait]
impl InputPort for InputManager {
    async fn click(&self, ctx: &ExecCtx, id: &RemoteObjectId, count: u32) -> Result<(), AdapterError> {
        let (x, y) = self
            .point(ctx, &templates::get_click_point(id), &format!("element {id}"))
            .await?;
        self.mouse_click(ctx, x, y, count).await
    }

    async fn click_by_selector(
        &self,
        ctx: &ExecCtx,
        id: &RemoteObjectId,
        selector: &QuerySelector,
        count: u32,
    ) -> Result<(), AdapterError> {
        let (x, y) = self
            .point(
                ctx,
                &templates::get_click_point_by_selector(id, selector),
                &selector_label(selector),
            )
            .await?;
        self.mouse_click(ctx, x, y, count).await
    }

    async fn type_text(
        &self,
        ctx: &ExecCtx,
        id: &RemoteObjectId,
        params: &TypeParams,
    ) -> Result<(), AdapterError> {
        if params.clear {
            self.eval.eval(ctx, &templates::clear(id)).await?;
        }
        self.eval.eval(ctx, &templates::focus(id)).await?;
        self.type_chars(ctx, &params.text, params.delay).await
    }

    async fn type_by_selector(
        &self,
        ctx: &ExecCtx,
        id: &RemoteObjectId,
        selector: &QuerySelector,
        params: &TypeParams,
    ) -> Result<(), AdapterError> {
        if params.clear {
            self.expect_found(ctx, &templates::clear_by_selector(id, selector), selector)
                .await?;
        }
        self.expect_found(ctx, &templates::focus_by_selector(id, selector), selector)
            .await?;
        self.type_chars(ctx, &params.text, params.delay).await
    }

    async fn press(
        &self,
        ctx: &ExecCtx,
        id: &RemoteObjectId,
        keys: &[String],
        count: u32,
    ) -> Result<(), AdapterError> {
        self.eval.eval(ctx, &templates::focus(id)).await?;
        self.press_keys(ctx, keys, count).await
    }

    async fn press_by_selector(
        &self,
        ctx: &ExecCtx,
        id: &RemoteObjectId,
        selector: &QuerySelector,
        keys: &[String],
        count: u32,
    ) -> Result<(), AdapterError> {
        self.expect_found(ctx, &templates::focus_by_selector(id, selector), selector)
            .await?;
        self.press_keys(ctx, keys, count).await
    }

    async fn clear(&self, ctx: &ExecCtx, id: &RemoteObjectId) -> Result<(), AdapterError> {
        self.eval.eval(ctx, &templates::clear(id)).await
    }

    async fn clear_by_selector(
        &self,
        ctx: &ExecCtx,
        id: &RemoteObjectId,
        selector: &QuerySelector,
    ) -> Result<(), AdapterError> {
        self.expect_found(ctx, &templates::clear_by_selector(id, selector), selector)
            .await
    }

    async fn select(
        &self,
        ctx: &ExecCtx,
        id: &RemoteObjectId,
        values: &[String],
    ) -> Result<Vec<String>, AdapterError> {
        let applied = self.eval.eval_value(ctx, &templates::select(id, values)).await?;
        applied_values(applied, &format!("element {id}"))
    }

    async fn select_by_selector(
        &self,
        ctx: &ExecCtx,
        id: &RemoteObjectId,
        selector: &QuerySelector,
        values: &[String],
    ) -> Result<Vec<String>, AdapterError> {
        let applied = self
            .eval
            .eval_value(ctx, &templates::select_by_selector(id, selector, values))
            .await?;
        applied_values(applied, &selector_label(selector))
    }

    async fn scroll_by(&self, ctx: &ExecCtx, options: &ScrollOptions) -> Result<(), AdapterError> {
        self.eval.eval(ctx, &templates::scroll_by(options)).await
    }

    async fn scroll_into_view(
        &self,
        ctx: &ExecCtx,
        id: &RemoteObjectId,
        options: &ScrollOptions,
    ) -> Result<(), AdapterError> {
        self.eval
            .eval(ctx, &templates::scroll_into_view(id, options))
            .await
    }

    async fn scroll_top(&self, ctx: &ExecCtx, options: &ScrollOptions) -> Result<(), AdapterError> {
        self.eval.eval(ctx, &templates::scroll_top(options)).await
    }

    async fn scroll_bottom(&self, ctx: &ExecCtx, options: &ScrollOptions) -> Result<(), AdapterError> {
        self.eval.eval(ctx, &templates::scroll_bottom(options)).await
    }

    async fn scroll_into_view_by_selector(
        &self,
        ctx: &ExecCtx,
        id: &RemoteObjectId,
        selector: &QuerySelector,
        options: &ScrollOptions,
    ) -> Result<(), AdapterError> {
        self.expect_found(
            ctx,
            &templates::scroll_into_view_by_selector(id, selector, options),
            selector,
        )
        .await
    }

    async fn focus(&self, ctx: &ExecCtx, id: &RemoteObjectId) -> Result<(), AdapterError> {
        self.eval.eval(ctx, &templates::focus(id)).await
    }

    async fn focus_by_selector(
        &self,
        ctx: &ExecCtx,
        id: &RemoteObjectId,
        selector: &QuerySelector,
    ) -> Result<(), AdapterError> {
        self.expect_found(ctx, &templates::focus_by_selector(id, selector), selector)
            .await
    }

    async fn blur(&self, ctx: &ExecCtx, id: &RemoteObjectId) -> Result<(), AdapterError> {
        self.eval.eval(ctx, &templates::blur(id)).await
    }

    async fn blur_by_selector(
        &self,
        ctx: &ExecCtx,
        id: &RemoteObjectId,
        selector: &QuerySelector,
    ) -> Result<(), AdapterError> {
        self.expect_found(ctx, &templates::blur_by_selector(id, selector), selector)
            .await
    }

    async fn hover(&self, ctx: &ExecCtx, id: &RemoteObjectId) -> Result<(), AdapterError> {
        let (x, y) = self
            .point(ctx, &templates::get_click_point(id), &format!("element {id}"))
            .await?;
        self.mouse_move(ctx, x, y).await
    }

    async fn hover_by_selector(
        &self,
        ctx: &ExecCtx,
        id: &RemoteObjectId,
        selector: &QuerySelector,
    ) -> Result<(), AdapterError> {
        let (x, y) = self
            .point(
                ctx,
                &templates::get_click_point_by_selector(id, selector),
                &selector_label(selector),
            )
            .await?;
        self.mouse_move(ctx, x, y).await
    }

    async fn move_mouse_by_coordinates(&self, ctx: &ExecCtx, x: f64, y: f64) -> Result<(), AdapterError> {
        self.mouse_move(ctx, x, y).await
    }
}

fn applied_values(value: Value, what: &str) -> Result<Vec<String>, AdapterError> {
    match value {
        Value::Null => Err(not_found(what)),
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect()),
        other => Err(AdapterError::new(AdapterErrorKind::Internal)
            .with_hint(format!("select on {what} returned a non-array result"))
            .with_data(other)),
    }
}
