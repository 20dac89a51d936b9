//! Action dispatcher: routes a request onto one input primitive.

use std::sync::Arc;
use std::time::{Duration, Instant};

use cdp_adapter::{InputPort, TypeParams};
use domdriver_core_types::{ExecCtx, QuerySelector, RemoteObjectId, ScrollOptions, Value};
use tracing::{debug, info, instrument};

use crate::coerce;
use crate::errors::ActionError;
use crate::options::OptionResolver;
use crate::types::{ActionKind, ActionRequest, OptionSet};

/// Executes primitives against one remote node, or against descendants of
/// it when a request carries a valid selector.
#[derive(Clone)]
pub struct Dispatcher {
    id: RemoteObjectId,
    input: Arc<dyn InputPort>,
    resolver: OptionResolver,
}

impl Dispatcher {
    pub fn new(id: RemoteObjectId, input: Arc<dyn InputPort>) -> Self {
        Self {
            id,
            input,
            resolver: OptionResolver::default(),
        }
    }

    pub fn with_resolver(mut self, resolver: OptionResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn id(&self) -> &RemoteObjectId {
        &self.id
    }

    /// Generic entry point.
    ///
    /// The name is checked before anything else, so an unknown action never
    /// reaches a gateway. Every primitive yields `Value::Null` except `select`,
    /// which yields the array of values that were applied.
    #[instrument(skip_all, fields(object_id = %self.id, action = %request.name))]
    pub async fn dispatch(&self, ctx: &ExecCtx, request: &ActionRequest) -> Result<Value, ActionError> {
        let kind = ActionKind::from_name(&request.name)
            .ok_or_else(|| ActionError::InvalidOperation(request.name.clone()))?;
        let options = self.resolver.resolve(request.options.as_ref())?;
        let started = Instant::now();

        let result = self.route(ctx, kind, &request.args, &options).await;

        info!(
            action_id = %ctx.action_id,
            action = kind.name(),
            by_selector = options.valid_selector().is_some(),
            latency_ms = started.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "dispatch finished"
        );
        result
    }

    async fn route(
        &self,
        ctx: &ExecCtx,
        kind: ActionKind,
        args: &Value,
        options: &OptionSet,
    ) -> Result<Value, ActionError> {
        let selector = options.valid_selector();
        debug!(
            action = kind.name(),
            selector = selector.map(|s| s.to_string()).unwrap_or_default(),
            "routing primitive"
        );

        match kind {
            ActionKind::Click => {
                match selector {
                    Some(sel) => self.click_by_selector(ctx, sel, options.count).await?,
                    None => self.click(ctx, options.count).await?,
                }
                Ok(Value::Null)
            }
            ActionKind::Input => {
                let text = coerce::to_text(args)?;
                match selector {
                    Some(sel) => self.input_by_selector(ctx, sel, &text, options.delay).await?,
                    None => self.input(ctx, &text, options.delay).await?,
                }
                Ok(Value::Null)
            }
            ActionKind::Press => {
                let keys = coerce::to_string_list(args)?;
                match selector {
                    Some(sel) => self.press_by_selector(ctx, sel, &keys, options.count).await?,
                    None => self.press(ctx, &keys, options.count).await?,
                }
                Ok(Value::Null)
            }
            ActionKind::Clear => {
                match selector {
                    Some(sel) => self.clear_by_selector(ctx, sel).await?,
                    None => self.clear(ctx).await?,
                }
                Ok(Value::Null)
            }
            ActionKind::Select => {
                let values = coerce::to_string_list(args)?;
                let applied = match selector {
                    Some(sel) => self.select_by_selector(ctx, sel, &values).await?,
                    None => self.select(ctx, &values).await?,
                };
                Ok(Value::Array(applied.into_iter().map(Value::String).collect()))
            }
            ActionKind::Scroll => {
                match selector {
                    Some(sel) => self.scroll_by_selector(ctx, sel, &options.scroll).await?,
                    None => self.scroll(ctx, &options.scroll).await?,
                }
                Ok(Value::Null)
            }
            ActionKind::Focus => {
                match selector {
                    Some(sel) => self.focus_by_selector(ctx, sel).await?,
                    None => self.focus(ctx).await?,
                }
                Ok(Value::Null)
            }
            ActionKind::Blur => {
                match selector {
                    Some(sel) => self.blur_by_selector(ctx, sel).await?,
                    None => self.blur(ctx).await?,
                }
                Ok(Value::Null)
            }
            ActionKind::Hover => {
                match selector {
                    Some(sel) => self.hover_by_selector(ctx, sel).await?,
                    None => self.hover(ctx).await?,
                }
                Ok(Value::Null)
            }
        }
    }

    pub async fn click(&self, ctx: &ExecCtx, count: u32) -> Result<(), ActionError> {
        Ok(self.input.click(ctx, &self.id, count).await?)
    }

    pub async fn click_by_selector(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
        count: u32,
    ) -> Result<(), ActionError> {
        Ok(self
            .input
            .click_by_selector(ctx, &self.id, selector, count)
            .await?)
    }

    /// Types without clearing existing content first.
    pub async fn input(&self, ctx: &ExecCtx, text: &str, delay: Duration) -> Result<(), ActionError> {
        let params = TypeParams::new(text).with_delay(delay);
        Ok(self.input.type_text(ctx, &self.id, &params).await?)
    }

    pub async fn input_by_selector(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
        text: &str,
        delay: Duration,
    ) -> Result<(), ActionError> {
        let params = TypeParams::new(text).with_delay(delay);
        Ok(self
            .input
            .type_by_selector(ctx, &self.id, selector, &params)
            .await?)
    }

    pub async fn press(&self, ctx: &ExecCtx, keys: &[String], count: u32) -> Result<(), ActionError> {
        Ok(self.input.press(ctx, &self.id, keys, count).await?)
    }

    pub async fn press_by_selector(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
        keys: &[String],
        count: u32,
    ) -> Result<(), ActionError> {
        Ok(self
            .input
            .press_by_selector(ctx, &self.id, selector, keys, count)
            .await?)
    }

    pub async fn clear(&self, ctx: &ExecCtx) -> Result<(), ActionError> {
        Ok(self.input.clear(ctx, &self.id).await?)
    }

    pub async fn clear_by_selector(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
    ) -> Result<(), ActionError> {
        Ok(self.input.clear_by_selector(ctx, &self.id, selector).await?)
    }

    pub async fn select(&self, ctx: &ExecCtx, values: &[String]) -> Result<Vec<String>, ActionError> {
        Ok(self.input.select(ctx, &self.id, values).await?)
    }

    pub async fn select_by_selector(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
        values: &[String],
    ) -> Result<Vec<String>, ActionError> {
        Ok(self
            .input
            .select_by_selector(ctx, &self.id, selector, values)
            .await?)
    }

    /// Scrolls the window by the configured offsets.
    pub async fn scroll(&self, ctx: &ExecCtx, options: &ScrollOptions) -> Result<(), ActionError> {
        Ok(self.input.scroll_by(ctx, options).await?)
    }

    pub async fn scroll_into_view(
        &self,
        ctx: &ExecCtx,
        options: &ScrollOptions,
    ) -> Result<(), ActionError> {
        Ok(self.input.scroll_into_view(ctx, &self.id, options).await?)
    }

    pub async fn scroll_top(&self, ctx: &ExecCtx, options: &ScrollOptions) -> Result<(), ActionError> {
        Ok(self.input.scroll_top(ctx, options).await?)
    }

    pub async fn scroll_bottom(
        &self,
        ctx: &ExecCtx,
        options: &ScrollOptions,
    ) -> Result<(), ActionError> {
        Ok(self.input.scroll_bottom(ctx, options).await?)
    }

    pub async fn scroll_by_selector(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
        options: &ScrollOptions,
    ) -> Result<(), ActionError> {
        Ok(self
            .input
            .scroll_into_view_by_selector(ctx, &self.id, selector, options)
            .await?)
    }

    pub async fn focus(&self, ctx: &ExecCtx) -> Result<(), ActionError> {
        Ok(self.input.focus(ctx, &self.id).await?)
    }

    pub async fn focus_by_selector(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
    ) -> Result<(), ActionError> {
        Ok(self.input.focus_by_selector(ctx, &self.id, selector).await?)
    }

    pub async fn blur(&self, ctx: &ExecCtx) -> Result<(), ActionError> {
        Ok(self.input.blur(ctx, &self.id).await?)
    }

    pub async fn blur_by_selector(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
    ) -> Result<(), ActionError> {
        Ok(self.input.blur_by_selector(ctx, &self.id, selector).await?)
    }

    pub async fn hover(&self, ctx: &ExecCtx) -> Result<(), ActionError> {
        Ok(self.input.hover(ctx, &self.id).await?)
    }

    pub async fn hover_by_selector(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
    ) -> Result<(), ActionError> {
        Ok(self.input.hover_by_selector(ctx, &self.id, selector).await?)
    }

    pub async fn move_mouse_by_xy(&self, ctx: &ExecCtx, x: f64, y: f64) -> Result<(), ActionError> {
        Ok(self.input.move_mouse_by_coordinates(ctx, x, y).await?)
    }
}
