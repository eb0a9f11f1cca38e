use super::lerp;
use crate::error::PluginError;
use crate::plugin::{Actor, Frame, InitContext, Plugin};

/// Opacity from `start` to `end` over `len`.
///
/// Opacity is its own CSS property, so the actor writes it directly instead
/// of going through the morph.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fade;

impl Plugin for Fade {
    fn name(&self) -> &str {
        "fade"
    }

    fn init(&self, cx: &mut InitContext<'_>) -> Result<Box<dyn Actor>, PluginError> {
        let target = cx.target()?;
        let start = cx.number(0)?;
        let end = cx.number(1)?;
        let length = cx.number(2)?;
        cx.dom.set_style(target, "opacity", &start.to_string());
        Ok(Box::new(FadeActor { start, end, length }))
    }
}

#[derive(Debug)]
struct FadeActor {
    start: f64,
    end: f64,
    length: f64,
}

impl Actor for FadeActor {
    fn length(&self) -> f64 {
        self.length
    }

    fn act(&mut self, frame: &mut Frame<'_>) {
        let Some(target) = frame.target else {
            return;
        };
        let opacity = lerp(self.start, self.end, frame.percent);
        frame.dom.set_style(target, "opacity", &opacity.to_string());
    }
}
