use std::time::Duration;

use async_trait::async_trait;
use domdriver_core_types::{
    ExecCtx, QuerySelector, RemoteObjectId, ScrollOptions, Value, DEFAULT_KEYBOARD_DELAY_MS,
};

use crate::error::AdapterError;
use crate::expression::Expression;

/// Executes prepared expressions against the remote document.
#[async_trait]
pub trait EvalPort: Send + Sync {
    /// Side-effecting call; the function's return value is discarded.
    async fn eval(&self, ctx: &ExecCtx, expr: &Expression) -> Result<(), AdapterError>;

    /// Side-effect-free read returned by value.
    async fn eval_value(&self, ctx: &ExecCtx, expr: &Expression) -> Result<Value, AdapterError>;

    /// Reads a node reference; `None` when the function returned `null`.
    async fn eval_element(
        &self,
        ctx: &ExecCtx,
        expr: &Expression,
    ) -> Result<Option<RemoteObjectId>, AdapterError>;

    /// Reads an array of node references.
    async fn eval_elements(
        &self,
        ctx: &ExecCtx,
        expr: &Expression,
    ) -> Result<Vec<RemoteObjectId>, AdapterError>;
}

/// Keyboard text entry parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeParams {
    pub text: String,
    /// Empty the target before typing.
    pub clear: bool,
    /// Pause between keystrokes.
    pub delay: Duration,
}

impl TypeParams {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            clear: false,
            delay: Duration::from_millis(DEFAULT_KEYBOARD_DELAY_MS),
        }
    }

    pub fn with_clear(mut self, clear: bool) -> Self {
        self.clear = clear;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Pointer and keyboard primitives.
///
/// `*_by_selector` variants resolve the target relative to `id` and act on it
/// within the same gateway call; a selector that matches nothing fails with
/// `AdapterErrorKind::TargetNotFound`.
#[async_trait]
pub trait InputPort: Send + Sync {
    async fn click(&self, ctx: &ExecCtx, id: &RemoteObjectId, count: u32)
        -> Result<(), AdapterError>;
    async fn click_by_selector(
        &self,
        ctx: &ExecCtx,
        id: &RemoteObjectId,
        selector: &QuerySelector,
        count: u32,
    ) -> Result<(), AdapterError>;

    async fn type_text(
        &self,
        ctx: &ExecCtx,
        id: &RemoteObjectId,
        params: &TypeParams,
    ) -> Result<(), AdapterError>;
    async fn type_by_selector(
        &self,
        ctx: &ExecCtx,
        id: &RemoteObjectId,
        selector: &QuerySelector,
        params: &TypeParams,
    ) -> Result<(), AdapterError>;

    async fn press(
        &self,
        ctx: &ExecCtx,
        id: &RemoteObjectId,
        keys: &[String],
        count: u32,
    ) -> Result<(), AdapterError>;
    async fn press_by_selector(
        &self,
        ctx: &ExecCtx,
        id: &RemoteObjectId,
        selector: &QuerySelector,
        keys: &[String],
        count: u32,
    ) -> Result<(), AdapterError>;

    async fn clear(&self, ctx: &ExecCtx, id: &RemoteObjectId) -> Result<(), AdapterError>;
    async fn clear_by_selector(
        &self,
        ctx: &ExecCtx,
        id: &RemoteObjectId,
        selector: &QuerySelector,
    ) -> Result<(), AdapterError>;

    /// Returns the values that were actually applied.
    async fn select(
        &self,
        ctx: &ExecCtx,
        id: &RemoteObjectId,
        values: &[String],
    ) -> Result<Vec<String>, AdapterError>;
    async fn select_by_selector(
        &self,
        ctx: &ExecCtx,
        id: &RemoteObjectId,
        selector: &QuerySelector,
        values: &[String],
    ) -> Result<Vec<String>, AdapterError>;

    /// Scrolls the window by the offsets in `options`.
    async fn scroll_by(&self, ctx: &ExecCtx, options: &ScrollOptions) -> Result<(), AdapterError>;
    async fn scroll_into_view(
        &self,
        ctx: &ExecCtx,
        id: &RemoteObjectId,
        options: &ScrollOptions,
    ) -> Result<(), AdapterError>;
    async fn scroll_top(&self, ctx: &ExecCtx, options: &ScrollOptions) -> Result<(), AdapterError>;
    async fn scroll_bottom(
        &self,
        ctx: &ExecCtx,
        options: &ScrollOptions,
    ) -> Result<(), AdapterError>;
    async fn scroll_into_view_by_selector(
        &self,
        ctx: &ExecCtx,
        id: &RemoteObjectId,
        selector: &QuerySelector,
        options: &ScrollOptions,
    ) -> Result<(), AdapterError>;

    async fn focus(&self, ctx: &ExecCtx, id: &RemoteObjectId) -> Result<(), AdapterError>;
    async fn focus_by_selector(
        &self,
        ctx: &ExecCtx,
        id: &RemoteObjectId,
        selector: &QuerySelector,
    ) -> Result<(), AdapterError>;

    async fn blur(&self, ctx: &ExecCtx, id: &RemoteObjectId) -> Result<(), AdapterError>;
    async fn blur_by_selector(
        &self,
        ctx: &ExecCtx,
        id: &RemoteObjectId,
        selector: &QuerySelector,
    ) -> Result<(), AdapterError>;

    async fn hover(&self, ctx: &ExecCtx, id: &RemoteObjectId) -> Result<(), AdapterError>;
    async fn hover_by_selector(
        &self,
        ctx: &ExecCtx,
        id: &RemoteObjectId,
        selector: &QuerySelector,
    ) -> Result<(), AdapterError>;

    async fn move_mouse_by_coordinates(
        &self,
        ctx: &ExecCtx,
        x: f64,
        y: f64,
    ) -> Result<(), AdapterError>;
}
