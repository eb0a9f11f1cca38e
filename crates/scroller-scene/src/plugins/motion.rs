//! Translation plugins.

use super::lerp;
use crate::animation::{Unit, UnitValue};
use crate::error::PluginError;
use crate::plugin::{Actor, Frame, InitContext, Plugin};

/// Translation from the element's origin by `[dx, dy]` over `len`.
///
/// Each axis keeps its own unit. A zero delta leaves that axis untouched, so
/// another actor may drive it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Move;

impl Plugin for Move {
    fn name(&self) -> &str {
        "move"
    }

    fn init(&self, cx: &mut InitContext<'_>) -> Result<Box<dyn Actor>, PluginError> {
        let [dx, dy] = cx.unit_pair(0)?;
        Ok(Box::new(MoveActor {
            dx,
            dy,
            length: cx.number(1)?,
        }))
    }
}

#[derive(Debug)]
struct MoveActor {
    dx: UnitValue,
    dy: UnitValue,
    length: f64,
}

impl Actor for MoveActor {
    fn length(&self) -> f64 {
        self.length
    }

    fn act(&mut self, frame: &mut Frame<'_>) {
        if self.dx.value != 0.0 {
            frame
                .morph
                .translate_x(self.dx.value * frame.percent, self.dx.unit);
        }
        if self.dy.value != 0.0 {
            frame
                .morph
                .translate_y(self.dy.value * frame.percent, self.dy.unit);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Translation along one axis from `start` to `end` over `len`.
/// Registered as `move_x` and `move_y`.
#[derive(Debug, Clone, Copy)]
pub struct MoveAxis {
    axis: Axis,
}

impl MoveAxis {
    pub fn new(axis: Axis) -> Self {
        Self { axis }
    }
}

impl Plugin for MoveAxis {
    fn name(&self) -> &str {
        match self.axis {
            Axis::X => "move_x",
            Axis::Y => "move_y",
        }
    }

    fn init(&self, cx: &mut InitContext<'_>) -> Result<Box<dyn Actor>, PluginError> {
        let start = cx.unit_value(0)?;
        let end = cx.unit_value(1)?;
        if start.unit != end.unit {
            return Err(PluginError::MixedUnits {
                start: start.unit,
                end: end.unit,
            });
        }
        Ok(Box::new(MoveAxisActor {
            axis: self.axis,
            start: start.value,
            end: end.value,
            unit: start.unit,
            length: cx.number(2)?,
        }))
    }
}

#[derive(Debug)]
struct MoveAxisActor {
    axis: Axis,
    start: f64,
    end: f64,
    unit: Unit,
    length: f64,
}

impl Actor for MoveAxisActor {
    fn length(&self) -> f64 {
        self.length
    }

    fn act(&mut self, frame: &mut Frame<'_>) {
        let value = lerp(self.start, self.end, frame.percent);
        match self.axis {
            Axis::X => frame.morph.translate_x(value, self.unit),
            Axis::Y => frame.morph.translate_y(value, self.unit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::plugin::Options;
    use crate::plugins::testing::{fragment, leaf};
    use serde_json::json;

    #[test]
    fn test_move_keeps_units_per_axis() {
        let (leaf, mut dom, _) = leaf(Move, vec![json!(["50%", "-200px"]), json!(100)], Options::new());
        let mut leaf = leaf.unwrap();

        assert_eq!(
            fragment(&mut leaf, &mut dom, 50.0),
            "translate3d(25%,0,0) translate3d(0, -100px,0)"
        );
    }

    #[test]
    fn test_move_skips_zero_axis() {
        let (leaf, mut dom, _) = leaf(Move, vec![json!([0, 80]), json!(40)], Options::new());
        let mut leaf = leaf.unwrap();
        assert_eq!(fragment(&mut leaf, &mut dom, 40.0), "translate3d(0, 80px,0)");
    }

    #[test]
    fn test_move_x_interpolates() {
        let (leaf, mut dom, _) = leaf(
            MoveAxis::new(Axis::X),
            vec![json!("-100%"), json!("0%"), json!(200)],
            Options::new(),
        );
        let mut leaf = leaf.unwrap();
        assert_eq!(fragment(&mut leaf, &mut dom, 50.0), "translate3d(-75%,0,0)");
    }

    #[test]
    fn test_move_y_interpolates() {
        let (leaf, mut dom, _) = leaf(
            MoveAxis::new(Axis::Y),
            vec![json!(10), json!("30px"), json!(20)],
            Options::new(),
        );
        let mut leaf = leaf.unwrap();
        assert_eq!(fragment(&mut leaf, &mut dom, 5.0), "translate3d(0, 15px,0)");
    }

    #[test]
    fn test_mixed_units_fail_fast() {
        let (leaf, _, _) = leaf(
            MoveAxis::new(Axis::X),
            vec![json!("0px"), json!("50%"), json!(100)],
            Options::new(),
        );
        let err = leaf.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Plugin {
                source: PluginError::MixedUnits {
                    start: Unit::Px,
                    end: Unit::Percent
                },
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "plugin `move_x`: start and end values have different units (px vs %)"
        );
    }
}
