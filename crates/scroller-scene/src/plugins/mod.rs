//! Built-in plugins.
//!
//! | name     | arguments                  | effect                              |
//! |----------|----------------------------|-------------------------------------|
//! | `slide`  | `[type]`                   | slides a pinned element up into view |
//! | `rotate` | `start, end, len`          | rotation in degrees                 |
//! | `move`   | `[dx, dy], len`            | translation from the origin         |
//! | `move_x` | `start, end, len`          | horizontal translation              |
//! | `move_y` | `start, end, len`          | vertical translation                |
//! | `scale`  | `start, end, len`          | uniform scale                       |
//! | `fade`   | `start, end, len`          | opacity                             |
//! | `delay`  | `len`                      | nothing, only takes up distance     |

mod delay;
mod fade;
mod motion;
mod rotate;
mod scale;
mod slide;

pub use delay::Delay;
pub use fade::Fade;
pub use motion::{Axis, Move, MoveAxis};
pub use rotate::Rotate;
pub use scale::Scale;
pub use slide::Slide;

use crate::plugin::PluginRegistry;

/// Register every built-in plugin.
pub fn register_builtins(registry: &mut PluginRegistry) {
    registry.register(Slide);
    registry.register(Rotate);
    registry.register(Move);
    registry.register(MoveAxis::new(Axis::X));
    registry.register(MoveAxis::new(Axis::Y));
    registry.register(Scale);
    registry.register(Fade);
    registry.register(Delay);
}

/// `start + (end - start) * percent`
pub(crate) fn lerp(start: f64, end: f64, percent: f64) -> f64 {
    start + (end - start) * percent
}
