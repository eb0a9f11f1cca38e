//! Full-viewport slides.

use crate::animation::Unit;
use crate::error::PluginError;
use crate::plugin::{Actor, Frame, InitContext, Options, Plugin};

/// Pins the element just below the viewport and moves it up by its own
/// height. The first slide of a page starts on screen instead, so it only
/// travels by the part that overflows the viewport.
///
/// Arguments: optional `"first"`. Options: `offset` (px, default 0) is added
/// to the vertical translation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Slide;

impl Plugin for Slide {
    fn name(&self) -> &str {
        "slide"
    }

    fn options(&self) -> Options {
        Options::from([("offset".to_string(), 0.into())])
    }

    fn init(&self, cx: &mut InitContext<'_>) -> Result<Box<dyn Actor>, PluginError> {
        let target = cx.target()?;
        let offset = cx.option_number("offset")?;
        let viewport = cx.dom.viewport_height();

        cx.dom.set_style(target, "position", "fixed");
        cx.dom.set_style(target, "top", "100%");
        cx.dom.set_style(target, "height", &format!("{viewport}px"));

        let mut length = cx.dom.outer_height(target);
        if cx.text(0) == Some("first") {
            length -= viewport;
            cx.dom.set_style(target, "top", "0");
        }

        Ok(Box::new(SlideActor { length, offset }))
    }
}

#[derive(Debug)]
struct SlideActor {
    length: f64,
    offset: f64,
}

impl Actor for SlideActor {
    fn length(&self) -> f64 {
        self.length
    }

    fn act(&mut self, frame: &mut Frame<'_>) {
        frame
            .morph
            .translate_y(self.offset - frame.position, Unit::Px);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::plugins::testing::{fragment, leaf};
    use serde_json::json;

    #[test]
    fn test_slide_pins_element() {
        let (leaf, dom, el) = leaf(Slide, Vec::new(), Slide.options());
        let leaf = leaf.unwrap();

        assert_eq!(leaf.length(), 1200.0);
        assert_eq!(dom.style(el, "position"), Some("fixed"));
        assert_eq!(dom.style(el, "top"), Some("100%"));
        assert_eq!(dom.style(el, "height"), Some("800px"));
    }

    #[test]
    fn test_first_slide_starts_on_screen() {
        let (leaf, dom, el) = leaf(Slide, vec![json!("first")], Slide.options());
        assert_eq!(leaf.unwrap().length(), 400.0);
        assert_eq!(dom.style(el, "top"), Some("0"));
    }

    #[test]
    fn test_slide_moves_up_with_offset() {
        let mut options = Slide.options();
        options.insert("offset".to_string(), json!(-50));
        let (leaf, mut dom, _) = leaf(Slide, Vec::new(), options);
        let mut leaf = leaf.unwrap();

        assert_eq!(fragment(&mut leaf, &mut dom, 300.0), "translate3d(0, -350px,0)");
        assert_eq!(fragment(&mut leaf, &mut dom, 5000.0), "translate3d(0, -1250px,0)");
    }

    #[test]
    fn test_slide_rejects_bad_offset() {
        let mut options = Slide.options();
        options.insert("offset".to_string(), json!("lots"));
        let (leaf, _, _) = leaf(Slide, Vec::new(), options);
        assert!(matches!(
            leaf,
            Err(EngineError::Plugin {
                source: PluginError::InvalidOption { .. },
                ..
            })
        ));
    }
}
