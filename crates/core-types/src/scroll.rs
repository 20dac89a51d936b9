use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Mirrors the DOM `ScrollBehavior` enumeration.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    #[default]
    Auto,
    Instant,
    Smooth,
}

impl ScrollBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrollBehavior::Auto => "auto",
            ScrollBehavior::Instant => "instant",
            ScrollBehavior::Smooth => "smooth",
        }
    }
}

impl FromStr for ScrollBehavior {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ScrollBehavior::Auto),
            "instant" => Ok(ScrollBehavior::Instant),
            "smooth" => Ok(ScrollBehavior::Smooth),
            other => Err(CoreError::unknown("scroll behavior", other)),
        }
    }
}

impl fmt::Display for ScrollBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mirrors the DOM `ScrollLogicalPosition` enumeration used by `scrollIntoView`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollAlignment {
    Start,
    #[default]
    Center,
    End,
    Nearest,
}

impl ScrollAlignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrollAlignment::Start => "start",
            ScrollAlignment::Center => "center",
            ScrollAlignment::End => "end",
            ScrollAlignment::Nearest => "nearest",
        }
    }
}

impl FromStr for ScrollAlignment {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(ScrollAlignment::Start),
            "center" => Ok(ScrollAlignment::Center),
            "end" => Ok(ScrollAlignment::End),
            "nearest" => Ok(ScrollAlignment::Nearest),
            other => Err(CoreError::unknown("scroll alignment", other)),
        }
    }
}

/// Offsets and animation settings for scroll primitives.
///
/// `top`/`left` drive offset scrolling of the window; `block`/`inline` only
/// matter when a node is scrolled into view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollOptions {
    pub top: f64,
    pub left: f64,
    pub behavior: ScrollBehavior,
    pub block: ScrollAlignment,
    pub inline: ScrollAlignment,
}
