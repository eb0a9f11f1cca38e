//! Length values with a CSS unit.

use serde_json::Value;
use std::fmt;

/// Unit of a translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    #[default]
    Px,
    Percent,
}

impl Unit {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Percent => "%",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_css())
    }
}

/// A number paired with its unit, e.g. `50%` or `120px`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitValue {
    pub value: f64,
    pub unit: Unit,
}

impl UnitValue {
    pub fn px(value: f64) -> Self {
        Self {
            value,
            unit: Unit::Px,
        }
    }

    pub fn percent(value: f64) -> Self {
        Self {
            value,
            unit: Unit::Percent,
        }
    }

    /// Parse a CSS length: a trailing `%` means percent, a trailing `px` or no
    /// suffix means pixels.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Some(number) = input.strip_suffix('%') {
            return parse_finite(number).map(Self::percent);
        }
        parse_finite(input.strip_suffix("px").unwrap_or(input)).map(Self::px)
    }

    /// Bare JSON numbers are pixels; strings go through [`UnitValue::parse`].
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(Self::px),
            Value::String(s) => Self::parse(s),
            _ => None,
        }
    }
}

fn parse_finite(number: &str) -> Option<f64> {
    number
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

impl fmt::Display for UnitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}
