//! CSS timing functions for the smoothing transition.
//!
//! The engine itself is position driven and never evaluates these curves.
//! They are parsed, validated and written back into each bound element's
//! `transition` declaration so the browser can smooth the jump between two
//! scroll passes:
//! - Linear
//! - Ease, EaseIn, EaseOut, EaseInOut (standard CSS curves)
//! - StepStart, StepEnd
//! - CubicBezier (custom bezier curves)
//! - Steps (stepped transitions)
//!
//! # Usage
//!
//! ```
//! use scroller_scene::animation::timing::TimingFunction;
//!
//! let ease: TimingFunction = "ease-out".parse().unwrap();
//! assert_eq!(ease, TimingFunction::EaseOut);
//!
//! let custom = TimingFunction::cubic_bezier(0.4, 0.0, 0.2, 1.0).unwrap();
//! assert_eq!(custom.to_string(), "cubic-bezier(0.4, 0, 0.2, 1)");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// Position for stepped transitions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPosition {
    /// Jump at the start of each interval (CSS `jump-start` / `start`).
    Start,
    /// Jump at the end of each interval (CSS `jump-end` / `end`).
    #[default]
    End,
    /// Jump at both start and end (CSS `jump-both`).
    Both,
    /// No jump at start or end (CSS `jump-none`).
    None,
}

impl StepPosition {
    fn as_css(self) -> &'static str {
        match self {
            Self::Start => "jump-start",
            Self::End => "jump-end",
            Self::Both => "jump-both",
            Self::None => "jump-none",
        }
    }

    fn parse(input: &str) -> Option<Self> {
        match input {
            "jump-start" | "start" => Some(Self::Start),
            "jump-end" | "end" => Some(Self::End),
            "jump-both" => Some(Self::Both),
            "jump-none" => Some(Self::None),
            _ => None,
        }
    }
}

/// CSS `transition-timing-function` value.
///
/// Serialized as its CSS text, so configuration files carry plain strings
/// such as `"ease-out"` or `"cubic-bezier(0.4, 0, 0.2, 1)"`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimingFunction {
    Linear,
    /// Equivalent to `cubic-bezier(0.25, 0.1, 0.25, 1.0)`.
    Ease,
    /// Equivalent to `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,
    /// Equivalent to `cubic-bezier(0, 0, 0.58, 1)`.
    #[default]
    EaseOut,
    /// Equivalent to `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,
    StepStart,
    StepEnd,
    /// Custom cubic bezier curve. x values are in [0, 1], y values are free.
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
    /// Stepped transition with `count >= 1` intervals.
    Steps { count: u32, position: StepPosition },
}

impl TimingFunction {
    /// Create a custom cubic bezier timing function.
    ///
    /// Fails if x1 or x2 are outside [0, 1].
    pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32) -> Result<Self, EngineError> {
        if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
            return Err(EngineError::TimingFunction(format!(
                "cubic-bezier({x1}, {y1}, {x2}, {y2})"
            )));
        }
        Ok(Self::CubicBezier { x1, y1, x2, y2 })
    }

    /// Create a stepped timing function. Fails if `count` is 0.
    pub fn steps(count: u32, position: StepPosition) -> Result<Self, EngineError> {
        if count == 0 {
            return Err(EngineError::TimingFunction(format!(
                "steps(0, {})",
                position.as_css()
            )));
        }
        Ok(Self::Steps { count, position })
    }
}

impl fmt::Display for TimingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("linear"),
            Self::Ease => f.write_str("ease"),
            Self::EaseIn => f.write_str("ease-in"),
            Self::EaseOut => f.write_str("ease-out"),
            Self::EaseInOut => f.write_str("ease-in-out"),
            Self::StepStart => f.write_str("step-start"),
            Self::StepEnd => f.write_str("step-end"),
            Self::CubicBezier { x1, y1, x2, y2 } => {
                write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
            Self::Steps { count, position } => write!(f, "steps({count}, {})", position.as_css()),
        }
    }
}

impl FromStr for TimingFunction {
    type Err = EngineError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let invalid = || EngineError::TimingFunction(input.to_string());

        match trimmed {
            "linear" => return Ok(Self::Linear),
            "ease" => return Ok(Self::Ease),
            "ease-in" => return Ok(Self::EaseIn),
            "ease-out" => return Ok(Self::EaseOut),
            "ease-in-out" => return Ok(Self::EaseInOut),
            "step-start" => return Ok(Self::StepStart),
            "step-end" => return Ok(Self::StepEnd),
            _ => {}
        }

        if let Some(inner) = function_args(trimmed, "cubic-bezier") {
            let points = inner
                .split(',')
                .map(|p| p.trim().parse::<f32>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| invalid())?;
            let [x1, y1, x2, y2] = points[..] else {
                return Err(invalid());
            };
            return Self::cubic_bezier(x1, y1, x2, y2).map_err(|_| invalid());
        }

        if let Some(inner) = function_args(trimmed, "steps") {
            let mut parts = inner.split(',').map(str::trim);
            let count = parts
                .next()
                .and_then(|c| c.parse::<u32>().ok())
                .ok_or_else(invalid)?;
            let position = match parts.next() {
                Some(p) => StepPosition::parse(p).ok_or_else(invalid)?,
                None => StepPosition::End,
            };
            if parts.next().is_some() {
                return Err(invalid());
            }
            return Self::steps(count, position).map_err(|_| invalid());
        }

        Err(invalid())
    }
}

fn function_args<'a>(input: &'a str, name: &str) -> Option<&'a str> {
    input
        .strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

impl TryFrom<String> for TimingFunction {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimingFunction> for String {
    fn from(value: TimingFunction) -> Self {
        value.to_string()
    }
}
