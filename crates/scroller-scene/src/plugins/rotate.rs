use super::lerp;
use crate::error::PluginError;
use crate::plugin::{Actor, Frame, InitContext, Plugin};

/// Rotation from `start` to `end` degrees over `len`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rotate;

impl Plugin for Rotate {
    fn name(&self) -> &str {
        "rotate"
    }

    fn init(&self, cx: &mut InitContext<'_>) -> Result<Box<dyn Actor>, PluginError> {
        Ok(Box::new(RotateActor {
            start: cx.number(0)?,
            end: cx.number(1)?,
            length: cx.number(2)?,
        }))
    }
}

#[derive(Debug)]
struct RotateActor {
    start: f64,
    end: f64,
    length: f64,
}

impl Actor for RotateActor {
    fn length(&self) -> f64 {
        self.length
    }

    fn act(&mut self, frame: &mut Frame<'_>) {
        frame.morph.rotate(lerp(self.start, self.end, frame.percent));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::Options;
    use crate::plugins::testing::{fragment, leaf};
    use serde_json::json;

    #[test]
    fn test_rotate_interpolates() {
        let (leaf, mut dom, _) = leaf(Rotate, vec![json!(0), json!(90), json!(300)], Options::new());
        let mut leaf = leaf.unwrap();

        assert_eq!(fragment(&mut leaf, &mut dom, 0.0), "rotate3d(0,0,1,0.00deg)");
        assert_eq!(fragment(&mut leaf, &mut dom, 100.0), "rotate3d(0,0,1,30.00deg)");
        assert_eq!(fragment(&mut leaf, &mut dom, 900.0), "rotate3d(0,0,1,90.00deg)");
    }

    #[test]
    fn test_rotate_requires_length() {
        let (leaf, _, _) = leaf(Rotate, vec![json!(0), json!(90)], Options::new());
        assert!(leaf.is_err());
    }
}
