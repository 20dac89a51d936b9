//! Named wait operations built on [`PollTask`].

use std::sync::Arc;
use std::time::Duration;

use cdp_adapter::{templates, EvalPort, Expression};
use domdriver_core_types::{
    ExecCtx, QuerySelector, RemoteObjectId, Value, WaitEvent, DEFAULT_POLLING_MS,
    DEFAULT_WAIT_TIMEOUT_MS,
};
use tracing::instrument;

use crate::errors::ActionError;
use crate::types::{ConditionKind, ConditionTarget, WaitCondition};
use crate::waiting::PollTask;

/// Waits on conditions about one remote node and its descendants.
///
/// A context without a deadline is bounded by the observer's wait timeout.
#[derive(Clone)]
pub struct ConditionObserver {
    id: RemoteObjectId,
    eval: Arc<dyn EvalPort>,
    polling: Duration,
    wait_timeout: Duration,
}

impl ConditionObserver {
    pub fn new(id: RemoteObjectId, eval: Arc<dyn EvalPort>) -> Self {
        Self {
            id,
            eval,
            polling: Duration::from_millis(DEFAULT_POLLING_MS),
            wait_timeout: Duration::from_millis(DEFAULT_WAIT_TIMEOUT_MS),
        }
    }

    pub fn with_polling(mut self, polling: Duration) -> Self {
        self.polling = polling;
        self
    }

    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    pub fn id(&self) -> &RemoteObjectId {
        &self.id
    }

    /// The expression a condition compiles to.
    pub fn expression(&self, condition: &WaitCondition) -> Expression {
        let id = &self.id;
        let when = condition.when;
        match (&condition.kind, &condition.target) {
            (ConditionKind::Presence, ConditionTarget::Element) => {
                templates::wait_for_connected(id, when)
            }
            (ConditionKind::Presence, ConditionTarget::Selector(sel)) => {
                templates::wait_for_element(id, sel, when)
            }
            (ConditionKind::Presence, ConditionTarget::SelectorAll(sel)) => {
                templates::wait_for_element_all(id, sel, when)
            }
            (ConditionKind::Class { name }, ConditionTarget::Element) => {
                templates::wait_for_class(id, name, when)
            }
            (ConditionKind::Class { name }, ConditionTarget::Selector(sel)) => {
                templates::wait_for_class_by_selector(id, sel, name, when)
            }
            (ConditionKind::Class { name }, ConditionTarget::SelectorAll(sel)) => {
                templates::wait_for_class_by_selector_all(id, sel, name, when)
            }
            (ConditionKind::Attribute { name, expected }, ConditionTarget::Element) => {
                templates::wait_for_attribute(id, name, expected, when)
            }
            (ConditionKind::Attribute { name, expected }, ConditionTarget::Selector(sel)) => {
                templates::wait_for_attribute_by_selector(id, sel, name, expected, when)
            }
            (ConditionKind::Attribute { name, expected }, ConditionTarget::SelectorAll(sel)) => {
                templates::wait_for_attribute_by_selector_all(id, sel, name, expected, when)
            }
            (ConditionKind::Style { name, expected }, ConditionTarget::Element) => {
                templates::wait_for_style(id, name, expected, when)
            }
            (ConditionKind::Style { name, expected }, ConditionTarget::Selector(sel)) => {
                templates::wait_for_style_by_selector(id, sel, name, expected, when)
            }
            (ConditionKind::Style { name, expected }, ConditionTarget::SelectorAll(sel)) => {
                templates::wait_for_style_by_selector_all(id, sel, name, expected, when)
            }
        }
    }

    /// Polls until `condition` holds. `Ok(())` only when it was observed.
    #[instrument(skip_all, fields(object_id = %self.id, condition = %condition))]
    pub async fn wait_for(&self, ctx: &ExecCtx, condition: &WaitCondition) -> Result<(), ActionError> {
        let bounded;
        let ctx = if ctx.deadline.is_some() {
            ctx
        } else {
            bounded = ctx.child_with_timeout(self.wait_timeout);
            &bounded
        };

        PollTask::new(self.eval.clone(), self.expression(condition))
            .with_polling(self.polling)
            .with_description(format!("{condition} (element {})", self.id))
            .run(ctx)
            .await
            .map(|_| ())
    }

    /// `Exists`: the handle is attached to the document. `NotExists`: detached.
    pub async fn wait_for_presence(&self, ctx: &ExecCtx, when: WaitEvent) -> Result<(), ActionError> {
        self.wait_for(
            ctx,
            &WaitCondition::new(ConditionKind::Presence, ConditionTarget::Element, when),
        )
        .await
    }

    pub async fn wait_for_element(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
        when: WaitEvent,
    ) -> Result<(), ActionError> {
        self.wait_for(
            ctx,
            &WaitCondition::new(
                ConditionKind::Presence,
                ConditionTarget::Selector(selector.clone()),
                when,
            ),
        )
        .await
    }

    /// `Exists` once at least one node matches, `NotExists` once none does.
    pub async fn wait_for_element_all(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
        when: WaitEvent,
    ) -> Result<(), ActionError> {
        self.wait_for(
            ctx,
            &WaitCondition::new(
                ConditionKind::Presence,
                ConditionTarget::SelectorAll(selector.clone()),
                when,
            ),
        )
        .await
    }

    pub async fn wait_for_class(
        &self,
        ctx: &ExecCtx,
        class: &str,
        when: WaitEvent,
    ) -> Result<(), ActionError> {
        self.wait_for(ctx, &class_condition(class, ConditionTarget::Element, when))
            .await
    }

    pub async fn wait_for_class_by_selector(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
        class: &str,
        when: WaitEvent,
    ) -> Result<(), ActionError> {
        self.wait_for(
            ctx,
            &class_condition(class, ConditionTarget::Selector(selector.clone()), when),
        )
        .await
    }

    /// Every matching node must (or must not) carry the class; an empty match
    /// set never satisfies.
    pub async fn wait_for_class_by_selector_all(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
        class: &str,
        when: WaitEvent,
    ) -> Result<(), ActionError> {
        self.wait_for(
            ctx,
            &class_condition(class, ConditionTarget::SelectorAll(selector.clone()), when),
        )
        .await
    }

    /// `value = null` waits for the attribute's presence; a boolean compares
    /// presence against it; anything else compares the string value.
    pub async fn wait_for_attribute(
        &self,
        ctx: &ExecCtx,
        name: &str,
        value: &Value,
        when: WaitEvent,
    ) -> Result<(), ActionError> {
        self.wait_for(
            ctx,
            &attribute_condition(name, value, ConditionTarget::Element, when),
        )
        .await
    }

    pub async fn wait_for_attribute_by_selector(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
        name: &str,
        value: &Value,
        when: WaitEvent,
    ) -> Result<(), ActionError> {
        self.wait_for(
            ctx,
            &attribute_condition(name, value, ConditionTarget::Selector(selector.clone()), when),
        )
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
        self.wait_for(
            ctx,
            &attribute_condition(
                name,
                value,
                ConditionTarget::SelectorAll(selector.clone()),
                when,
            ),
        )
        .await
    }

    pub async fn wait_for_style(
        &self,
        ctx: &ExecCtx,
        name: &str,
        value: &Value,
        when: WaitEvent,
    ) -> Result<(), ActionError> {
        self.wait_for(ctx, &style_condition(name, value, ConditionTarget::Element, when))
            .await
    }

    pub async fn wait_for_style_by_selector(
        &self,
        ctx: &ExecCtx,
        selector: &QuerySelector,
        name: &str,
        value: &Value,
        when: WaitEvent,
    ) -> Result<(), ActionError> {
        self.wait_for(
            ctx,
            &style_condition(name, value, ConditionTarget::Selector(selector.clone()), when),
        )
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
        self.wait_for(
            ctx,
            &style_condition(
                name,
                value,
                ConditionTarget::SelectorAll(selector.clone()),
                when,
            ),
        )
        .await
    }
}

fn class_condition(class: &str, target: ConditionTarget, when: WaitEvent) -> WaitCondition {
    WaitCondition::new(
        ConditionKind::Class {
            name: class.to_string(),
        },
        target,
        when,
    )
}

fn attribute_condition(
    name: &str,
    value: &Value,
    target: ConditionTarget,
    when: WaitEvent,
) -> WaitCondition {
    WaitCondition::new(
        ConditionKind::Attribute {
            name: name.to_string(),
            expected: value.clone(),
        },
        target,
        when,
    )
}

fn style_condition(
    name: &str,
    value: &Value,
    target: ConditionTarget,
    when: WaitEvent,
) -> WaitCondition {
    WaitCondition::new(
        ConditionKind::Style {
            name: name.to_string(),
            expected: value.clone(),
        },
        target,
        when,
    )
}
