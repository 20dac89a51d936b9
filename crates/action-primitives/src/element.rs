//! Remote element handle.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use cdp_adapter::{templates, EvalPort, InputPort};
use domdriver_core_types::{
    ExecCtx, QuerySelector, RemoteObjectId, Value, WaitEvent, DEFAULT_KEYBOARD_DELAY_MS,
    DEFAULT_POLLING_MS, DEFAULT_WAIT_TIMEOUT_MS,
};
use serde_json::Map;
use tokio::sync::OnceCell;

use crate::dispatcher::Dispatcher;
use crate::errors::ActionError;
use crate::observer::ConditionObserver;
use crate::options::OptionResolver;
use crate::types::{ActionRequest, WaitCondition};

/// Timing knobs shared by every handle created from the same session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleSettings {
    pub polling: Duration,
    pub wait_timeout: Duration,
    pub keyboard_delay: Duration,
}

impl Default for HandleSettings {
    fn default() -> Self {
        Self {
            polling: Duration::from_millis(DEFAULT_POLLING_MS),
            wait_timeout: Duration::from_millis(DEFAULT_WAIT_TIMEOUT_MS),
            keyboard_delay: Duration::from_millis(DEFAULT_KEYBOARD_DELAY_MS),
        }
    }
}

/// One live node in the remote document.
///
/// Actions go through the held [`Dispatcher`], waits through the held
/// [`ConditionObserver`]; accessors talk to the evaluator directly. A stale
/// reference shows up as [`ActionError::TargetInvalid`] on the next call.
pub struct HtmlElement {
    id: RemoteObjectId,
    eval: Arc<dyn EvalPort>,
    input: Arc<dyn InputPort>,
    settings: HandleSettings,
    dispatcher: Dispatcher,
    observer: ConditionObserver,
    node_type: OnceCell<u16>,
    node_name: OnceCell<String>,
}

impl fmt::Debug for HtmlElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlElement")
            .field("id", &self.id)
            .field("node_name", &self.node_name.get())
            .finish()
    }
}

impl HtmlElement {
    pub fn new(
        id: RemoteObjectId,
        eval: Arc<dyn EvalPort>,
        input: Arc<dyn InputPort>,
        settings: HandleSettings,
    ) -> Self {
        let dispatcher = Dispatcher::new(id.clone(), input.clone())
            .with_resolver(OptionResolver::new(settings.keyboard_delay));
        let observer = ConditionObserver::new(id.clone(), eval.clone())
            .with_polling(settings.polling)
            .with_wait_timeout(settings.wait_timeout);
        Self {
            id,
            eval,
            input,
            settings,
            dispatcher,
            observer,
            node_type: OnceCell::new(),
            node_name: OnceCell::new(),
        }
    }

    /// Handle for another node, sharing this handle's ports and settings.
    fn adopt(&self, id: RemoteObjectId) -> HtmlElement {
        HtmlElement::new(id, self.eval.clone(), self.input.clone(), self.settings)
    }

    pub fn remote_id(&self) -> &RemoteObjectId {
        &self.id
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn observer(&self) -> &ConditionObserver {
        &self.observer
    }

    pub async fn dispatch(&self, ctx: &ExecCtx, request: &ActionRequest) -> Result<Value, ActionError> {
        self.dispatcher.dispatch(ctx, request).await
    }

    pub async fn wait_for(&self, ctx: &ExecCtx, condition: &WaitCondition) -> Result<(), ActionError> {
        self.observer.wait_for(ctx, condition).await
    }

    pub async fn wait_for_presence(&self, ctx: &ExecCtx, when: WaitEvent) -> Result<(), ActionError> {
        self.observer.wait_for_presence(ctx, when).await
    }

    pub async fn wait_for_element(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
        when: WaitEvent,
    ) -> Result<(), ActionError> {
        self.observer.wait_for_element(ctx, selector, when).await
    }

    pub async fn wait_for_element_all(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
        when: WaitEvent,
    ) -> Result<(), ActionError> {
        self.observer.wait_for_element_all(ctx, selector, when).await
    }

    pub async fn wait_for_class(
        &self,
        ctx: &ExecCtx,
        class: &str,
        when: WaitEvent,
    ) -> Result<(), ActionError> {
        self.observer.wait_for_class(ctx, class, when).await
    }

    pub async fn wait_for_class_by_selector(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
        class: &str,
        when: WaitEvent,
    ) -> Result<(), ActionError> {
        self.observer
            .wait_for_class_by_selector(ctx, selector, class, when)
            .await
    }

    pub async fn wait_for_class_by_selector_all(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
        class: &str,
        when: WaitEvent,
    ) -> Result<(), ActionError> {
        self.observer
            .wait_for_class_by_selector_all(ctx, selector, class, when)
            .await
    }

    pub async fn wait_for_attribute(
        &self,
        ctx: &ExecCtx,
        name: &str,
        value: &Value,
        when: WaitEvent,
    ) -> Result<(), ActionError> {
        self.observer.wait_for_attribute(ctx, name, value, when).await
    }

    pub async fn wait_for_attribute_by_selector(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
        name: &str,
        value: &Value,
        when: WaitEvent,
    ) -> Result<(), ActionError> {
        self.observer
            .wait_for_attribute_by_selector(ctx, selector, name, value, when)
            .await
    }

    pub async fn wait_for_attribute_by_selector_all(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
        name: &str,
        value: &Value,
        when: WaitEvent,
    ) -> Result<(), ActionError> {
        self.observer
            .wait_for_attribute_by_selector_all(ctx, selector, name, value, when)
            .await
    }

    pub async fn wait_for_style(
        &self,
        ctx: &ExecCtx,
        name: &str,
        value: &Value,
        when: WaitEvent,
    ) -> Result<(), ActionError> {
        self.observer.wait_for_style(ctx, name, value, when).await
    }

    pub async fn wait_for_style_by_selector(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
        name: &str,
        value: &Value,
        when: WaitEvent,
    ) -> Result<(), ActionError> {
        self.observer
            .wait_for_style_by_selector(ctx, selector, name, value, when)
            .await
    }

    pub async fn wait_for_style_by_selector_all(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
        name: &str,
        value: &Value,
        when: WaitEvent,
    ) -> Result<(), ActionError> {
        self.observer
            .wait_for_style_by_selector_all(ctx, selector, name, value, when)
            .await
    }

    // -- accessors ---------------------------------------------------------

    pub async fn get_value(&self, ctx: &ExecCtx) -> Result<Value, ActionError> {
        Ok(self.eval.eval_value(ctx, &templates::get_value(&self.id)).await?)
    }

    pub async fn set_value(&self, ctx: &ExecCtx, value: &Value) -> Result<(), ActionError> {
        Ok(self
            .eval
            .eval(ctx, &templates::set_value(&self.id, value))
            .await?)
    }

    /// Read once per handle; a node's type never changes.
    pub async fn get_node_type(&self, ctx: &ExecCtx) -> Result<u16, ActionError> {
        self.node_type
            .get_or_try_init(|| async {
                let value = self
                    .eval
                    .eval_value(ctx, &templates::get_node_type(&self.id))
                    .await?;
                value
                    .as_u64()
                    .and_then(|n| u16::try_from(n).ok())
                    .ok_or_else(|| unexpected("nodeType", &value))
            })
            .await
            .copied()
    }

    /// Read once per handle.
    pub async fn get_node_name(&self, ctx: &ExecCtx) -> Result<String, ActionError> {
        self.node_name
            .get_or_try_init(|| async {
                let value = self
                    .eval
                    .eval_value(ctx, &templates::get_node_name(&self.id))
                    .await?;
                value
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| unexpected("nodeName", &value))
            })
            .await
            .cloned()
    }

    /// Number of element children.
    pub async fn children_count(&self, ctx: &ExecCtx) -> Result<usize, ActionError> {
        let value = self
            .eval
            .eval_value(ctx, &templates::get_children_count(&self.id))
            .await?;
        to_count("children.length", &value)
    }

    /// Inline declarations only.
    pub async fn get_styles(&self, ctx: &ExecCtx) -> Result<Map<String, Value>, ActionError> {
        let value = self
            .eval
            .eval_value(ctx, &templates::get_styles(&self.id))
            .await?;
        to_map("style", value)
    }

    /// Inline value if declared, computed value otherwise, `null` if neither.
    pub async fn get_style(&self, ctx: &ExecCtx, name: &str) -> Result<Value, ActionError> {
        Ok(self
            .eval
            .eval_value(ctx, &templates::get_style(&self.id, name))
            .await?)
    }

    pub async fn set_styles(&self, ctx: &ExecCtx, styles: &Map<String, Value>) -> Result<(), ActionError> {
        Ok(self
            .eval
            .eval(ctx, &templates::set_styles(&self.id, styles))
            .await?)
    }

    pub async fn set_style(&self, ctx: &ExecCtx, name: &str, value: &str) -> Result<(), ActionError> {
        Ok(self
            .eval
            .eval(ctx, &templates::set_style(&self.id, name, value))
            .await?)
    }

    pub async fn remove_styles(&self, ctx: &ExecCtx, names: &[String]) -> Result<(), ActionError> {
        Ok(self
            .eval
            .eval(ctx, &templates::remove_styles(&self.id, names))
            .await?)
    }

    pub async fn get_attributes(&self, ctx: &ExecCtx) -> Result<Map<String, Value>, ActionError> {
        let value = self
            .eval
            .eval_value(ctx, &templates::get_attributes(&self.id))
            .await?;
        to_map("attributes", value)
    }

    /// `null` when the attribute is absent.
    pub async fn get_attribute(&self, ctx: &ExecCtx, name: &str) -> Result<Value, ActionError> {
        Ok(self
            .eval
            .eval_value(ctx, &templates::get_attribute(&self.id, name))
            .await?)
    }

    pub async fn set_attributes(&self, ctx: &ExecCtx, attrs: &Map<String, Value>) -> Result<(), ActionError> {
        Ok(self
            .eval
            .eval(ctx, &templates::set_attributes(&self.id, attrs))
            .await?)
    }

    pub async fn set_attribute(&self, ctx: &ExecCtx, name: &str, value: &str) -> Result<(), ActionError> {
        Ok(self
            .eval
            .eval(ctx, &templates::set_attribute(&self.id, name, value))
            .await?)
    }

    pub async fn remove_attributes(&self, ctx: &ExecCtx, names: &[String]) -> Result<(), ActionError> {
        Ok(self
            .eval
            .eval(ctx, &templates::remove_attributes(&self.id, names))
            .await?)
    }

    pub async fn get_child_nodes(&self, ctx: &ExecCtx) -> Result<Vec<HtmlElement>, ActionError> {
        let ids = self
            .eval
            .eval_elements(ctx, &templates::get_children(&self.id))
            .await?;
        Ok(ids.into_iter().map(|id| self.adopt(id)).collect())
    }

    pub async fn get_child_node(&self, ctx: &ExecCtx, index: usize) -> Result<Option<HtmlElement>, ActionError> {
        let id = self
            .eval
            .eval_element(ctx, &templates::get_child_by_index(&self.id, index))
            .await?;
        Ok(id.map(|id| self.adopt(id)))
    }

    pub async fn get_parent_element(&self, ctx: &ExecCtx) -> Result<Option<HtmlElement>, ActionError> {
        let id = self
            .eval
            .eval_element(ctx, &templates::get_parent(&self.id))
            .await?;
        Ok(id.map(|id| self.adopt(id)))
    }

    pub async fn get_previous_element_sibling(
        &self,
        ctx: &ExecCtx,
    ) -> Result<Option<HtmlElement>, ActionError> {
        let id = self
            .eval
            .eval_element(ctx, &templates::get_previous_element_sibling(&self.id))
            .await?;
        Ok(id.map(|id| self.adopt(id)))
    }

    pub async fn get_next_element_sibling(
        &self,
        ctx: &ExecCtx,
    ) -> Result<Option<HtmlElement>, ActionError> {
        let id = self
            .eval
            .eval_element(ctx, &templates::get_next_element_sibling(&self.id))
            .await?;
        Ok(id.map(|id| self.adopt(id)))
    }

    pub async fn query_selector(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
    ) -> Result<Option<HtmlElement>, ActionError> {
        let id = self
            .eval
            .eval_element(ctx, &templates::query_selector(&self.id, selector))
            .await?;
        Ok(id.map(|id| self.adopt(id)))
    }

    pub async fn query_selector_all(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
    ) -> Result<Vec<HtmlElement>, ActionError> {
        let ids = self
            .eval
            .eval_elements(ctx, &templates::query_selector_all(&self.id, selector))
            .await?;
        Ok(ids.into_iter().map(|id| self.adopt(id)).collect())
    }

    /// Scalar results as-is; node sets as an array of their text contents.
    pub async fn xpath(&self, ctx: &ExecCtx, expression: &str) -> Result<Value, ActionError> {
        Ok(self
            .eval
            .eval_value(ctx, &templates::xpath(&self.id, expression))
            .await?)
    }

    pub async fn get_inner_text(&self, ctx: &ExecCtx) -> Result<String, ActionError> {
        let value = self
            .eval
            .eval_value(ctx, &templates::get_inner_text(&self.id))
            .await?;
        Ok(to_text(value))
    }

    pub async fn set_inner_text(&self, ctx: &ExecCtx, text: &str) -> Result<(), ActionError> {
        Ok(self
            .eval
            .eval(ctx, &templates::set_inner_text(&self.id, text))
            .await?)
    }

    pub async fn get_inner_text_by_selector(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
    ) -> Result<String, ActionError> {
        let value = self
            .eval
            .eval_value(ctx, &templates::get_inner_text_by_selector(&self.id, selector))
            .await?;
        found(selector, value).map(to_text)
    }

    pub async fn set_inner_text_by_selector(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
        text: &str,
    ) -> Result<(), ActionError> {
        let value = self
            .eval
            .eval_value(
                ctx,
                &templates::set_inner_text_by_selector(&self.id, selector, text),
            )
            .await?;
        found_flag(selector, &value)
    }

    pub async fn get_inner_text_by_selector_all(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
    ) -> Result<Vec<String>, ActionError> {
        let value = self
            .eval
            .eval_value(
                ctx,
                &templates::get_inner_text_by_selector_all(&self.id, selector),
            )
            .await?;
        to_text_list("innerText", value)
    }

    pub async fn get_inner_html(&self, ctx: &ExecCtx) -> Result<String, ActionError> {
        let value = self
            .eval
            .eval_value(ctx, &templates::get_inner_html(&self.id))
            .await?;
        Ok(to_text(value))
    }

    pub async fn set_inner_html(&self, ctx: &ExecCtx, html: &str) -> Result<(), ActionError> {
        Ok(self
            .eval
            .eval(ctx, &templates::set_inner_html(&self.id, html))
            .await?)
    }

    pub async fn get_inner_html_by_selector(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
    ) -> Result<String, ActionError> {
        let value = self
            .eval
            .eval_value(ctx, &templates::get_inner_html_by_selector(&self.id, selector))
            .await?;
        found(selector, value).map(to_text)
    }

    pub async fn set_inner_html_by_selector(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
        html: &str,
    ) -> Result<(), ActionError> {
        let value = self
            .eval
            .eval_value(
                ctx,
                &templates::set_inner_html_by_selector(&self.id, selector, html),
            )
            .await?;
        found_flag(selector, &value)
    }

    pub async fn get_inner_html_by_selector_all(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
    ) -> Result<Vec<String>, ActionError> {
        let value = self
            .eval
            .eval_value(
                ctx,
                &templates::get_inner_html_by_selector_all(&self.id, selector),
            )
            .await?;
        to_text_list("innerHTML", value)
    }

    pub async fn count_by_selector(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
    ) -> Result<usize, ActionError> {
        let value = self
            .eval
            .eval_value(ctx, &templates::count_by_selector(&self.id, selector))
            .await?;
        to_count("count", &value)
    }

    pub async fn exists_by_selector(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
    ) -> Result<bool, ActionError> {
        let value = self
            .eval
            .eval_value(ctx, &templates::exists_by_selector(&self.id, selector))
            .await?;
        value.as_bool().ok_or_else(|| unexpected("exists", &value))
    }
}

fn unexpected(what: &str, value: &Value) -> ActionError {
    ActionError::Internal(format!("unexpected {what} result: {value}"))
}

fn not_found(selector: &QuerySelector) -> ActionError {
    ActionError::TargetNotFound(format!("selector '{selector}' matched nothing"))
}

fn found(selector: &QuerySelector, value: Value) -> Result<Value, ActionError> {
    if value.is_null() {
        Err(not_found(selector))
    } else {
        Ok(value)
    }
}

fn found_flag(selector: &QuerySelector, value: &Value) -> Result<(), ActionError> {
    match value {
        Value::Bool(true) => Ok(()),
        _ => Err(not_found(selector)),
    }
}

fn to_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn to_text_list(what: &str, value: Value) -> Result<Vec<String>, ActionError> {
    match value {
        Value::Array(items) => Ok(items.into_iter().map(to_text).collect()),
        other => Err(unexpected(what, &other)),
    }
}

fn to_count(what: &str, value: &Value) -> Result<usize, ActionError> {
    value
        .as_u64()
        .map(|n| n as usize)
        .ok_or_else(|| unexpected(what, value))
}

fn to_map(what: &str, value: Value) -> Result<Map<String, Value>, ActionError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(unexpected(what, &other)),
    }
}
