//! Core data types for action primitives

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use domdriver_core_types::{
    QuerySelector, ScrollOptions, Value, WaitEvent, DEFAULT_KEYBOARD_DELAY_MS,
};
use serde::{Deserialize, Serialize};
use serde_json::Map;

use crate::errors::ActionError;

/// Untyped action request as received from the caller.
///
/// `options` is consulted only for recognized keys; anything else is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub name: String,
    #[serde(default)]
    pub args: Value,
    #[serde(default)]
    pub options: Option<Map<String, Value>>,
}

impl ActionRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_args(mut self, args: impl Into<Value>) -> Self {
        self.args = args.into();
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }
}

/// The closed set of primitives a request can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Click,
    Input,
    Press,
    Clear,
    Select,
    Scroll,
    Focus,
    Blur,
    Hover,
}

/// External action names. The first entry for a kind is its canonical name.
pub const ACTION_NAMES: &[(&str, ActionKind)] = &[
    ("click", ActionKind::Click),
    ("input", ActionKind::Input),
    ("type", ActionKind::Input),
    ("press", ActionKind::Press),
    ("clear", ActionKind::Clear),
    ("select", ActionKind::Select),
    ("scroll", ActionKind::Scroll),
    ("focus", ActionKind::Focus),
    ("blur", ActionKind::Blur),
    ("hover", ActionKind::Hover),
];

impl ActionKind {
    /// Names are matched exactly; there is no case folding.
    pub fn from_name(name: &str) -> Option<Self> {
        ACTION_NAMES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, kind)| *kind)
    }

    pub fn name(&self) -> &'static str {
        ACTION_NAMES
            .iter()
            .find(|(_, kind)| kind == self)
            .map(|(name, _)| *name)
            .unwrap_or("unknown")
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActionKind {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ActionError::InvalidOperation(s.to_string()))
    }
}

/// Resolved, typed view of a request's option bag.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSet {
    /// Present even when invalid; the dispatcher checks validity when routing.
    pub selector: Option<QuerySelector>,
    /// Repeat count for click and press, at least 1.
    pub count: u32,
    /// Inter-keystroke pause for input.
    pub delay: Duration,
    pub scroll: ScrollOptions,
}

impl Default for OptionSet {
    fn default() -> Self {
        Self {
            selector: None,
            count: 1,
            delay: Duration::from_millis(DEFAULT_KEYBOARD_DELAY_MS),
            scroll: ScrollOptions::default(),
        }
    }
}

impl OptionSet {
    /// The selector to route through, if any; blank selectors are ignored.
    pub fn valid_selector(&self) -> Option<&QuerySelector> {
        self.selector.as_ref().filter(|sel| sel.is_valid())
    }
}

/// What a wait condition inspects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConditionKind {
    /// Node presence.
    Presence,
    /// Membership of a class in `classList`.
    Class { name: String },
    /// Attribute value; `expected = null` means "attribute present".
    Attribute { name: String, expected: Value },
    /// Computed style value.
    Style { name: String, expected: Value },
}

/// Which nodes a wait condition is evaluated against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "selector", rename_all = "snake_case")]
pub enum ConditionTarget {
    /// The handle's own node.
    Element,
    /// First descendant matching the selector.
    Selector(QuerySelector),
    /// Every descendant matching the selector.
    SelectorAll(QuerySelector),
}

/// Fully describes one wait: the predicate, its subject and its polarity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitCondition {
    pub kind: ConditionKind,
    pub target: ConditionTarget,
    #[serde(default)]
    pub when: WaitEvent,
}

impl WaitCondition {
    pub fn new(kind: ConditionKind, target: ConditionTarget, when: WaitEvent) -> Self {
        Self { kind, target, when }
    }
}

impl fmt::Display for WaitCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ConditionKind::Presence => write!(f, "presence")?,
            ConditionKind::Class { name } => write!(f, "class '{name}'")?,
            ConditionKind::Attribute { name, expected } => {
                write!(f, "attribute '{name}' = {expected}")?
            }
            ConditionKind::Style { name, expected } => write!(f, "style '{name}' = {expected}")?,
        }
        write!(f, " {}", self.when)?;
        match &self.target {
            ConditionTarget::Element => Ok(()),
            ConditionTarget::Selector(sel) => write!(f, " on {sel}"),
            ConditionTarget::SelectorAll(sel) => write!(f, " on all {sel}"),
        }
    }
}
