use crate::error::PluginError;
use crate::plugin::{Actor, Frame, InitContext, Plugin};

/// Takes up `len` of scroll distance without animating anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Delay;

impl Plugin for Delay {
    fn name(&self) -> &str {
        "delay"
    }

    fn binds_element(&self) -> bool {
        false
    }

    fn init(&self, cx: &mut InitContext<'_>) -> Result<Box<dyn Actor>, PluginError> {
        Ok(Box::new(DelayActor {
            length: cx.number(0)?,
        }))
    }
}

#[derive(Debug)]
struct DelayActor {
    length: f64,
}

impl Actor for DelayActor {
    fn length(&self) -> f64 {
        self.length
    }

    fn act(&mut self, _frame: &mut Frame<'_>) {}
}
