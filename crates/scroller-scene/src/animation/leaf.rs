//! Leaf actor: one plugin bound to one element.

use serde_json::Value;
use std::fmt;
use std::rc::Rc;

use super::morph::Morph;
use super::pass::Pass;
use crate::dom::{Dom, TargetHandle};
use crate::error::{EngineError, Result};
use crate::plugin::{Actor, Frame, InitContext, Options, Plugin};

/// A single animatable unit.
///
/// The leaf keeps everything needed to re-run the plugin's `init` (captured
/// arguments and resolved options), so geometry-dependent lengths can be
/// refreshed after the page layout changes.
pub struct Leaf {
    plugin: Rc<dyn Plugin>,
    name: String,
    target: Option<TargetHandle>,
    args: Vec<Value>,
    options: Options,
    actor: Box<dyn Actor>,
    length: f64,
    morph: Morph,
}

impl Leaf {
    /// Bind `plugin` to `target` and run its `init`.
    pub fn new(
        plugin: Rc<dyn Plugin>,
        target: Option<TargetHandle>,
        args: Vec<Value>,
        options: Options,
        dom: &mut dyn Dom,
    ) -> Result<Self> {
        let name = plugin.name().to_string();
        let (actor, length) = run_init(plugin.as_ref(), &name, target, &args, &options, dom)?;
        Ok(Self {
            plugin,
            name,
            target,
            args,
            options,
            actor,
            length,
            morph: Morph::default(),
        })
    }

    /// Re-run the plugin's `init`, refreshing the length and clearing the morph.
    pub fn init(&mut self, dom: &mut dyn Dom) -> Result<f64> {
        let fresh = self.prepare(dom)?;
        Ok(self.apply(fresh))
    }

    /// Run the plugin's `init` without touching this leaf.
    ///
    /// Style writes made by the plugin still reach `dom`.
    pub(crate) fn prepare(&self, dom: &mut dyn Dom) -> Result<Initialized> {
        let (actor, length) = run_init(
            self.plugin.as_ref(),
            &self.name,
            self.target,
            &self.args,
            &self.options,
            dom,
        )?;
        Ok(Initialized { actor, length })
    }

    /// Swap in a prepared actor. Returns the new length.
    pub(crate) fn apply(&mut self, fresh: Initialized) -> f64 {
        self.actor = fresh.actor;
        self.length = fresh.length;
        self.morph.reset();
        self.length
    }

    pub fn plugin_name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> Option<TargetHandle> {
        self.target
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Morph baked by the most recent invocation.
    pub fn morph(&self) -> &Morph {
        &self.morph
    }

    /// Animate to `position` inside this leaf's window.
    ///
    /// Returns the consumed distance, `min(position, length)`, or 0 when this
    /// is a boundary evaluation and another leaf of the same plugin already
    /// animated the same element this pass.
    pub fn animate(&mut self, position: f64, pass: &mut Pass<'_>) -> f64 {
        if !pass.locks.acquire(&self.name, self.target, position) {
            tracing::trace!(plugin = %self.name, target = ?self.target, "boundary already animated");
            return 0.0;
        }

        let delta = position.min(self.length);
        self.morph.reset();
        let mut frame = Frame {
            target: self.target,
            morph: &mut self.morph,
            percent: delta / self.length,
            position: delta,
            dom: &mut *pass.dom,
        };
        self.actor.act(&mut frame);

        if let Some(target) = self.target {
            pass.transforms.push(target, self.morph.bake());
        }
        delta
    }
}

/// Actor and length from an `init` that has not been applied yet.
pub(crate) struct Initialized {
    actor: Box<dyn Actor>,
    length: f64,
}

fn run_init(
    plugin: &dyn Plugin,
    name: &str,
    target: Option<TargetHandle>,
    args: &[Value],
    options: &Options,
    dom: &mut dyn Dom,
) -> Result<(Box<dyn Actor>, f64)> {
    let mut cx = InitContext {
        target,
        dom,
        args,
        options,
    };
    let actor = plugin.init(&mut cx).map_err(|source| EngineError::Plugin {
        plugin: name.to_string(),
        source,
    })?;

    let length = actor.length();
    if !(length.is_finite() && length > 0.0) {
        return Err(EngineError::DegenerateLeaf {
            plugin: name.to_string(),
            length,
        });
    }
    Ok((actor, length))
}

impl fmt::Debug for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Leaf")
            .field("plugin", &self.name)
            .field("target", &self.target)
            .field("length", &self.length)
            .field("args", &self.args)
            .field("options", &self.options)
            .field("actor", &self.actor)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::pass::{LockTable, PendingTransforms};
    use crate::dom::MemoryDom;
    use crate::plugin::PluginDescriptor;
    use serde_json::json;
    use std::cell::RefCell;

    fn slider(calls: Rc<RefCell<Vec<(f64, f64)>>>) -> Rc<dyn Plugin> {
        Rc::new(PluginDescriptor::new(
            "slider",
            |cx| cx.number(0),
            move |frame, _, _| {
                calls.borrow_mut().push((frame.percent, frame.position));
                frame.morph.translate_x(frame.position, crate::Unit::Px);
            },
        ))
    }

    #[test]
    fn test_clamps_to_length() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut dom = MemoryDom::new(600.0);
        let target = dom.insert("#a", 10.0);
        let mut leaf = Leaf::new(
            slider(Rc::clone(&calls)),
            Some(target),
            vec![json!(100)],
            Options::new(),
            &mut dom,
        )
        .unwrap();

        let mut locks = LockTable::new();
        let mut transforms = PendingTransforms::new();
        let mut pass = Pass {
            locks: &mut locks,
            transforms: &mut transforms,
            dom: &mut dom,
        };

        assert_eq!(leaf.animate(150.0, &mut pass), 100.0);
        assert_eq!(calls.borrow().as_slice(), &[(1.0, 100.0)]);
        assert_eq!(
            transforms.joined(target).as_deref(),
            Some("translate3d(100px,0,0)")
        );
    }

    #[test]
    fn test_partial_percent() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut dom = MemoryDom::new(600.0);
        let mut leaf = Leaf::new(
            slider(Rc::clone(&calls)),
            None,
            vec![json!(200)],
            Options::new(),
            &mut dom,
        )
        .unwrap();

        let mut locks = LockTable::new();
        let mut transforms = PendingTransforms::new();
        let mut pass = Pass {
            locks: &mut locks,
            transforms: &mut transforms,
            dom: &mut dom,
        };

        assert_eq!(leaf.animate(50.0, &mut pass), 50.0);
        assert_eq!(calls.borrow()[0], (0.25, 50.0));
        // element-less leaves never produce transform fragments
        assert!(transforms.is_empty());
    }

    #[test]
    fn test_non_positive_length_is_rejected() {
        let mut dom = MemoryDom::new(600.0);
        for length in [0.0, -5.0, f64::NAN] {
            let plugin: Rc<dyn Plugin> = Rc::new(PluginDescriptor::new(
                "flat",
                move |_| Ok(length),
                |_, _, _| {},
            ));
            let err = Leaf::new(plugin, None, Vec::new(), Options::new(), &mut dom).unwrap_err();
            assert!(matches!(err, EngineError::DegenerateLeaf { .. }));
        }
    }

    #[test]
    fn test_plugin_errors_are_wrapped() {
        let mut dom = MemoryDom::new(600.0);
        let plugin: Rc<dyn Plugin> =
            Rc::new(PluginDescriptor::new("needs_arg", |cx| cx.number(0), |_, _, _| {}));
        let err = Leaf::new(plugin, None, Vec::new(), Options::new(), &mut dom).unwrap_err();
        assert_eq!(err.to_string(), "plugin `needs_arg`: missing argument #0");
    }

    #[test]
    fn test_init_refreshes_geometry() {
        let mut dom = MemoryDom::new(600.0);
        let target = dom.insert("#a", 300.0);
        let plugin: Rc<dyn Plugin> = Rc::new(PluginDescriptor::new(
            "tall",
            |cx| {
                let target = cx.target()?;
                Ok(cx.dom.outer_height(target))
            },
            |_, _, _| {},
        ));
        let mut leaf = Leaf::new(plugin, Some(target), Vec::new(), Options::new(), &mut dom).unwrap();
        assert_eq!(leaf.length(), 300.0);

        dom.insert("#a", 450.0);
        assert_eq!(leaf.init(&mut dom).unwrap(), 450.0);
        assert_eq!(leaf.length(), 450.0);
        assert!(leaf.morph().is_untouched());
    }
}
