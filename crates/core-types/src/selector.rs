use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorKind {
    #[default]
    Css,
    Xpath,
}

/// Query used to resolve descendants relative to a reference node.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct QuerySelector {
    pub kind: SelectorKind,
    pub value: String,
}

impl QuerySelector {
    pub fn css(value: impl Into<String>) -> Self {
        Self {
            kind: SelectorKind::Css,
            value: value.into(),
        }
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Self {
            kind: SelectorKind::Xpath,
            value: value.into(),
        }
    }

    /// A selector is usable only when it carries a non-blank query.
    pub fn is_valid(&self) -> bool {
        !self.value.trim().is_empty()
    }
}

impl fmt::Display for QuerySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SelectorKind::Css => write!(f, "css:{}", self.value),
            SelectorKind::Xpath => write!(f, "xpath:{}", self.value),
        }
    }
}
