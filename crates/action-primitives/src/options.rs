//! Option resolution: one pass from the untyped bag to an [`OptionSet`].

use std::time::Duration;

use domdriver_core_types::{ScrollAlignment, ScrollBehavior, Value};
use serde_json::Map;
use tracing::debug;

use crate::coerce;
use crate::errors::ActionError;
use crate::types::OptionSet;

/// Look up `key` and convert it, falling back to `default` when the bag is
/// absent, the key is missing or its value is `null`.
pub fn option_or<T>(
    options: Option<&Map<String, Value>>,
    key: &str,
    default: T,
    convert: impl FnOnce(&str, &Value) -> Result<T, ActionError>,
) -> Result<T, ActionError> {
    match options.and_then(|map| map.get(key)) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => convert(key, value),
    }
}

/// Parse a keyword option. Only a non-string value is a coercion failure; an
/// unknown keyword falls back to `default`.
fn keyword_or<T>(options: Option<&Map<String, Value>>, key: &str, default: T) -> Result<T, ActionError>
where
    T: std::str::FromStr + Copy,
    T::Err: std::fmt::Display,
{
    option_or(options, key, default, |key, value| {
        let raw = coerce::to_str(key, value)?;
        Ok(raw.parse::<T>().unwrap_or_else(|err| {
            debug!(option = key, error = %err, "unknown keyword, using default");
            default
        }))
    })
}

/// Resolves every recognized key at once. Unrecognized keys are ignored.
#[derive(Debug, Clone, Copy)]
pub struct OptionResolver {
    default_delay: Duration,
}

impl Default for OptionResolver {
    fn default() -> Self {
        Self {
            default_delay: OptionSet::default().delay,
        }
    }
}

impl OptionResolver {
    pub fn new(default_delay: Duration) -> Self {
        Self { default_delay }
    }

    pub fn resolve(&self, options: Option<&Map<String, Value>>) -> Result<OptionSet, ActionError> {
        let base = OptionSet {
            delay: self.default_delay,
            ..OptionSet::default()
        };

        let selector = option_or(options, "selector", None, |key, value| {
            coerce::to_selector(key, value).map(Some)
        })?;

        let count = option_or(options, "count", u64::from(base.count), coerce::to_u64)?;
        if count < 1 {
            return Err(ActionError::TypeCoercion(format!(
                "count: must be at least 1, got {count}"
            )));
        }
        let count = u32::try_from(count)
            .map_err(|_| ActionError::TypeCoercion(format!("count: {count} is out of range")))?;

        let delay_ms = option_or(
            options,
            "delay",
            base.delay.as_millis() as u64,
            coerce::to_u64,
        )?;

        let mut scroll = base.scroll;
        scroll.top = option_or(options, "top", scroll.top, coerce::to_f64)?;
        scroll.left = option_or(options, "left", scroll.left, coerce::to_f64)?;
        scroll.behavior = keyword_or::<ScrollBehavior>(options, "behavior", scroll.behavior)?;
        scroll.block = keyword_or::<ScrollAlignment>(options, "block", scroll.block)?;
        scroll.inline = keyword_or::<ScrollAlignment>(options, "inline", scroll.inline)?;

        Ok(OptionSet {
            selector,
            count,
            delay: Duration::from_millis(delay_ms),
            scroll,
        })
    }
}

/// Resolve with the built-in keyboard delay.
pub fn resolve_options(options: Option<&Map<String, Value>>) -> Result<OptionSet, ActionError> {
    OptionResolver::default().resolve(options)
}
