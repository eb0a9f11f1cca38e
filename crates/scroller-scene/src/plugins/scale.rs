use super::lerp;
use crate::error::PluginError;
use crate::plugin::{Actor, Frame, InitContext, Plugin};

/// Uniform scale from `start` to `end` over `len`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scale;

impl Plugin for Scale {
    fn name(&self) -> &str {
        "scale"
    }

    fn init(&self, cx: &mut InitContext<'_>) -> Result<Box<dyn Actor>, PluginError> {
        Ok(Box::new(ScaleActor {
            start: cx.number(0)?,
            end: cx.number(1)?,
            length: cx.number(2)?,
        }))
    }
}

#[derive(Debug)]
struct ScaleActor {
    start: f64,
    end: f64,
    length: f64,
}

impl Actor for ScaleActor {
    fn length(&self) -> f64 {
        self.length
    }

    fn act(&mut self, frame: &mut Frame<'_>) {
        frame.morph.scale(lerp(self.start, self.end, frame.percent));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::Options;
    use crate::plugins::testing::{fragment, leaf};
    use serde_json::json;

    #[test]
    fn test_scale_interpolates() {
        let (leaf, mut dom, _) = leaf(Scale, vec![json!(1), json!(2), json!(100)], Options::new());
        let mut leaf = leaf.unwrap();
        assert_eq!(fragment(&mut leaf, &mut dom, 25.0), "scale3d(1.25,1.25,1)");
    }
}
