//! Transform deltas produced by one actor invocation.
//!
//! CSS has a single `transform` property, so translation, rotation and scale
//! cannot be written independently. Actors fill in a [`Morph`]; the leaf then
//! bakes it into one fragment, and the engine concatenates every fragment for
//! an element before writing it.

use super::units::Unit;

/// Pending transform deltas. `None` means the actor left the field untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Morph {
    pub translate_x: Option<f64>,
    pub translate_y: Option<f64>,
    pub unit_x: Unit,
    pub unit_y: Unit,
    /// Rotation in degrees.
    pub rotation: Option<f64>,
    pub scale: Option<f64>,
}

impl Morph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark every field untouched and fall back to pixel units.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_untouched(&self) -> bool {
        self.translate_x.is_none()
            && self.translate_y.is_none()
            && self.rotation.is_none()
            && self.scale.is_none()
    }

    pub fn translate_x(&mut self, value: f64, unit: Unit) {
        self.translate_x = Some(value);
        self.unit_x = unit;
    }

    pub fn translate_y(&mut self, value: f64, unit: Unit) {
        self.translate_y = Some(value);
        self.unit_y = unit;
    }

    pub fn rotate(&mut self, degrees: f64) {
        self.rotation = Some(degrees);
    }

    pub fn scale(&mut self, factor: f64) {
        self.scale = Some(factor);
    }

    /// Compose the touched fields into one transform fragment.
    ///
    /// Order is translate-x, translate-y, rotation, scale. Translations are
    /// rounded to whole units, rotation and scale keep two decimals. An
    /// untouched morph bakes to an empty string.
    pub fn bake(&self) -> String {
        let mut parts = Vec::with_capacity(4);
        if let Some(dx) = self.translate_x {
            parts.push(format!("translate3d({}{},0,0)", round_half_up(dx), self.unit_x));
        }
        if let Some(dy) = self.translate_y {
            parts.push(format!("translate3d(0, {}{},0)", round_half_up(dy), self.unit_y));
        }
        if let Some(r) = self.rotation {
            parts.push(format!("rotate3d(0,0,1,{:.2}deg)", r));
        }
        if let Some(s) = self.scale {
            parts.push(format!("scale3d({:.2},{:.2},1)", s, s));
        }
        parts.join(" ")
    }
}

/// Round to the nearest integer, ties toward positive infinity.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
