//! Engine driver.
//!
//! The [`Engine`] is the central coordinator. It handles:
//! - Building leaf actors from registered plugins ([`Engine::actor`])
//! - Installing the active tree ([`Engine::set_tree`], [`Engine::queue`], [`Engine::parallel`])
//! - Running one pass per scroll position ([`Engine::animate`])
//! - Re-initializing leaves after the layout changed ([`Engine::reinit`])
//!
//! # Usage
//!
//! ```
//! use scroller_scene::{Engine, MemoryDom};
//! use serde_json::json;
//!
//! let mut dom = MemoryDom::new(800.0);
//! let title = dom.insert("#title", 120.0);
//!
//! let mut engine = Engine::new(dom);
//! let rise = engine
//!     .actor("move_y", "#title")
//!     .args([json!(0), json!("-120px"), json!(300)])
//!     .build()?;
//! let spin = engine
//!     .actor("rotate", "#title")
//!     .args([json!(0), json!(90), json!(1)])
//!     .build()?
//!     .synchronize();
//! engine.parallel(vec![rise, spin])?;
//!
//! engine.animate(150.0);
//! assert_eq!(
//!     engine.dom().style(title, "transform"),
//!     Some("translate3d(0, -60px,0) rotate3d(0,0,1,45.00deg)")
//! );
//! # Ok::<(), scroller_scene::EngineError>(())
//! ```

use serde_json::Value;
use std::fmt;
use std::rc::Rc;

use scroller_config::TransitionConfig;

use crate::animation::{LockTable, Node, Pass, PendingTransforms, TimingFunction};
use crate::dom::Dom;
use crate::error::{EngineError, Result};
use crate::plugin::{Plugin, PluginRegistry};
use crate::Leaf;

/// Browser-side smoothing declared on every bound element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub transition_ms: u32,
    pub timing: TimingFunction,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            transition_ms: 180,
            timing: TimingFunction::EaseOut,
        }
    }
}

impl EngineConfig {
    /// Build from file settings, parsing the timing function.
    pub fn from_settings(settings: &TransitionConfig) -> Result<Self> {
        Ok(Self {
            transition_ms: settings.duration_ms,
            timing: settings.timing_function.parse()?,
        })
    }

    /// CSS `transition` value for `property`, e.g. `transform 180ms ease-out 0ms`.
    pub fn transition_css(&self, property: &str) -> String {
        format!("{property} {}ms {} 0ms", self.transition_ms, self.timing)
    }
}

/// Partial configuration. Fields left `None` keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConfigPatch {
    pub transition_ms: Option<u32>,
    pub timing: Option<TimingFunction>,
}

impl ConfigPatch {
    pub fn transition_ms(mut self, ms: u32) -> Self {
        self.transition_ms = Some(ms);
        self
    }

    pub fn timing(mut self, timing: TimingFunction) -> Self {
        self.timing = Some(timing);
        self
    }
}

type OnScroll = dyn FnMut(f64, f64);

/// Owns the document, the plugin registry and the active animation tree.
pub struct Engine<D: Dom> {
    dom: D,
    registry: PluginRegistry,
    config: EngineConfig,
    onscroll: Box<OnScroll>,
    tree: Option<Node>,
    /// Position of the previous pass.
    position: f64,
    locks: LockTable,
    transforms: PendingTransforms,
}

impl<D: Dom> Engine<D> {
    /// Create an engine with the built-in plugins and default configuration.
    pub fn new(dom: D) -> Self {
        Self::with_registry(dom, PluginRegistry::with_builtins())
    }

    pub fn with_registry(dom: D, registry: PluginRegistry) -> Self {
        Self {
            dom,
            registry,
            config: EngineConfig::default(),
            onscroll: Box::new(|_, _| {}),
            tree: None,
            position: 0.0,
            locks: LockTable::new(),
            transforms: PendingTransforms::new(),
        }
    }

    /// Shallow-merge `patch` into the configuration.
    ///
    /// Only actors built afterwards pick up the new transition.
    pub fn configure(&mut self, patch: ConfigPatch) -> &mut Self {
        if let Some(ms) = patch.transition_ms {
            self.config.transition_ms = ms;
        }
        if let Some(timing) = patch.timing {
            self.config.timing = timing;
        }
        tracing::debug!(config = ?self.config, "engine configured");
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Called at the start of every pass with `(position, position - last)`.
    pub fn onscroll(&mut self, callback: impl FnMut(f64, f64) + 'static) -> &mut Self {
        self.onscroll = Box::new(callback);
        self
    }

    /// Register a plugin, replacing any plugin of the same name.
    pub fn register(&mut self, plugin: impl Plugin + 'static) -> Option<Rc<dyn Plugin>> {
        self.registry.register(plugin)
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    /// Start building a leaf of `plugin` bound to the element at `selector`.
    pub fn actor(&mut self, plugin: &str, selector: &str) -> ActorBuilder<'_, D> {
        ActorBuilder::new(self, plugin, Some(selector.to_string()))
    }

    /// Start building a leaf of an element-less plugin such as `delay`.
    pub fn detached(&mut self, plugin: &str) -> ActorBuilder<'_, D> {
        ActorBuilder::new(self, plugin, None)
    }

    /// Install `tree`, returning the previous one.
    pub fn set_tree(&mut self, tree: Node) -> Option<Node> {
        tracing::debug!(
            length = tree.length(),
            leaves = tree.leaf_count(),
            "installed animation tree"
        );
        self.tree.replace(tree)
    }

    /// Install a sequential tree over `children`.
    pub fn queue(&mut self, children: Vec<Node>) {
        self.set_tree(Node::sequence(children));
    }

    /// Install a concurrent tree over `children`.
    pub fn parallel(&mut self, children: Vec<Node>) -> Result<()> {
        let tree = Node::concurrent(children)?;
        self.set_tree(tree);
        Ok(())
    }

    pub fn tree(&self) -> Option<&Node> {
        self.tree.as_ref()
    }

    /// Length of the installed tree, 0 without one.
    pub fn length(&self) -> f64 {
        self.tree.as_ref().map_or(0.0, Node::length)
    }

    /// Position of the most recent pass.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Re-run every leaf's `init` against the current layout and recompute
    /// composite lengths. Returns the new tree length.
    ///
    /// On error the tree keeps its previous actors and lengths.
    pub fn reinit(&mut self) -> Result<f64> {
        let Some(tree) = self.tree.as_mut() else {
            return Ok(0.0);
        };
        let length = tree.reinit(&mut self.dom)?;
        tracing::debug!(length, "re-initialized animation tree");
        Ok(length)
    }

    /// Run one pass at `position`.
    pub fn animate(&mut self, position: f64) {
        let delta = position - self.position;
        (self.onscroll)(position, delta);
        self.position = position;

        self.locks.clear();
        self.transforms.clear();

        let Some(tree) = self.tree.as_mut() else {
            tracing::trace!(position, "no tree installed");
            return;
        };

        let mut pass = Pass {
            locks: &mut self.locks,
            transforms: &mut self.transforms,
            dom: &mut self.dom,
        };
        let consumed = tree.animate(position, &mut pass);
        let written = self.transforms.commit(&mut self.dom);
        tracing::trace!(position, delta, consumed, written, "pass complete");
    }
}

impl<D: Dom + fmt::Debug> fmt::Debug for Engine<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("dom", &self.dom)
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("tree", &self.tree)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

/// Collects arguments and options for one leaf.
///
/// Nothing is checked until [`ActorBuilder::build`].
#[must_use = "call `build` to create the leaf"]
pub struct ActorBuilder<'e, D: Dom> {
    engine: &'e mut Engine<D>,
    plugin: String,
    selector: Option<String>,
    args: Vec<Value>,
    options: Vec<(String, Value)>,
}

impl<'e, D: Dom> ActorBuilder<'e, D> {
    fn new(engine: &'e mut Engine<D>, plugin: &str, selector: Option<String>) -> Self {
        Self {
            engine,
            plugin: plugin.to_string(),
            selector,
            args: Vec::new(),
            options: Vec::new(),
        }
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn args<I>(mut self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.args.extend(values.into_iter().map(Into::into));
        self
    }

    /// Override a declared option. Later calls win.
    pub fn option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.push((name.into(), value.into()));
        self
    }

    /// Resolve the target, declare the smoothing transition on it and run
    /// the plugin's `init`.
    pub fn build(self) -> Result<Node> {
        let Self {
            engine,
            plugin: name,
            selector,
            args,
            options: overrides,
        } = self;

        let plugin = engine
            .registry
            .get(&name)
            .ok_or_else(|| EngineError::UnknownPlugin(name.clone()))?;

        let mut options = plugin.options();
        for (option, value) in overrides {
            match options.get_mut(&option) {
                Some(slot) => *slot = value,
                None => {
                    return Err(EngineError::UnknownOption {
                        plugin: name,
                        option,
                    });
                }
            }
        }

        let target = if plugin.binds_element() {
            let selector = selector.ok_or_else(|| EngineError::MissingTarget(name.clone()))?;
            let target = engine
                .dom
                .resolve(&selector)
                .map_err(|source| EngineError::Resolve {
                    selector: selector.clone(),
                    source,
                })?;

            let config = engine.config;
            engine
                .dom
                .set_style(target, "transition", &config.transition_css("transform"));
            engine.dom.set_style(
                target,
                "-webkit-transition",
                &config.transition_css("-webkit-transform"),
            );
            Some(target)
        } else {
            if let Some(selector) = &selector {
                tracing::warn!(plugin = %name, %selector, "plugin is not bound to elements, ignoring selector");
            }
            None
        };

        let leaf = Leaf::new(plugin, target, args, options, &mut engine.dom)?;
        tracing::debug!(plugin = %name, length = leaf.length(), "built actor");
        Ok(Node::from(leaf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{DomError, MemoryDom, TargetHandle};
    use crate::plugin::PluginDescriptor;
    use serde_json::json;
    use std::cell::RefCell;

    fn engine() -> (Engine<MemoryDom>, TargetHandle, TargetHandle) {
        let mut dom = MemoryDom::new(800.0);
        let a = dom.insert("#a", 1200.0);
        let b = dom.insert("#b", 300.0);
        (Engine::new(dom), a, b)
    }

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.transition_ms, 180);
        assert_eq!(config.timing, TimingFunction::EaseOut);
        assert_eq!(
            config.transition_css("transform"),
            "transform 180ms ease-out 0ms"
        );
    }

    #[test]
    fn test_config_from_settings() {
        let settings = TransitionConfig {
            duration_ms: 250,
            timing_function: "cubic-bezier(0.4, 0, 0.2, 1)".to_string(),
        };
        let config = EngineConfig::from_settings(&settings).unwrap();
        assert_eq!(config.transition_ms, 250);
        assert_eq!(
            config.transition_css("transform"),
            "transform 250ms cubic-bezier(0.4, 0, 0.2, 1) 0ms"
        );

        let bad = TransitionConfig {
            duration_ms: 250,
            timing_function: "wobbly".to_string(),
        };
        assert!(matches!(
            EngineConfig::from_settings(&bad),
            Err(EngineError::TimingFunction(_))
        ));
    }

    #[test]
    fn test_configure_merges_shallowly() {
        let (mut engine, _, _) = engine();
        engine.configure(ConfigPatch::default().transition_ms(90));
        assert_eq!(engine.config().transition_ms, 90);
        assert_eq!(engine.config().timing, TimingFunction::EaseOut);

        engine.configure(ConfigPatch::default().timing(TimingFunction::Linear));
        assert_eq!(engine.config().transition_ms, 90);
        assert_eq!(engine.config().timing, TimingFunction::Linear);
    }

    #[test]
    fn test_build_declares_transition() {
        let (mut engine, a, _) = engine();
        engine.configure(ConfigPatch::default().transition_ms(300));
        engine
            .actor("rotate", "#a")
            .args([0, 90, 100])
            .build()
            .unwrap();

        assert_eq!(
            engine.dom().style(a, "transition"),
            Some("transform 300ms ease-out 0ms")
        );
        assert_eq!(
            engine.dom().style(a, "-webkit-transition"),
            Some("-webkit-transform 300ms ease-out 0ms")
        );
    }

    #[test]
    fn test_build_errors() {
        let (mut engine, _, _) = engine();

        assert!(matches!(
            engine.actor("wiggle", "#a").build(),
            Err(EngineError::UnknownPlugin(name)) if name == "wiggle"
        ));
        assert!(matches!(
            engine.actor("slide", "#a").option("speed", 2).build(),
            Err(EngineError::UnknownOption { option, .. }) if option == "speed"
        ));
        assert!(matches!(
            engine.detached("rotate").args([0, 90, 100]).build(),
            Err(EngineError::MissingTarget(_))
        ));
        assert!(matches!(
            engine.actor("rotate", "#nope").args([0, 90, 100]).build(),
            Err(EngineError::Resolve {
                source: DomError::NotFound(_),
                ..
            })
        ));
    }

    #[test]
    fn test_options_override_defaults() {
        let (mut engine, a, _) = engine();
        let node = engine
            .actor("slide", "#a")
            .option("offset", 40)
            .build()
            .unwrap();
        let leaf = node.as_leaf().unwrap();
        assert_eq!(leaf.options().get("offset"), Some(&json!(40)));

        engine.set_tree(node);
        engine.animate(100.0);
        assert_eq!(
            engine.dom().style(a, "transform"),
            Some("translate3d(0, -60px,0)")
        );
    }

    #[test]
    fn test_detached_ignores_selector() {
        let (mut engine, _, _) = engine();
        engine.dom_mut().drain_writes();
        let node = engine.actor("delay", "#a").arg(50).build().unwrap();
        assert_eq!(node.as_leaf().unwrap().target(), None);
        assert!(engine.dom().writes().is_empty());
    }

    #[test]
    fn test_onscroll_gets_position_and_delta() {
        let (mut engine, _, _) = engine();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        engine.onscroll(move |position, delta| log.borrow_mut().push((position, delta)));

        engine.animate(100.0);
        engine.animate(60.0);
        assert_eq!(*seen.borrow(), vec![(100.0, 100.0), (60.0, -40.0)]);
        assert_eq!(engine.position(), 60.0);
    }

    #[test]
    fn test_pass_without_tree_writes_nothing() {
        let (mut engine, _, _) = engine();
        engine.animate(500.0);
        assert!(engine.dom().writes().is_empty());
        assert_eq!(engine.length(), 0.0);
    }

    #[test]
    fn test_one_transform_write_per_element() {
        let (mut engine, a, b) = engine();
        let x = engine
            .actor("move_x", "#a")
            .args([json!("0%"), json!("100%"), json!(200)])
            .build()
            .unwrap();
        let r = engine
            .actor("rotate", "#a")
            .args([0, 180, 200])
            .build()
            .unwrap();
        let s = engine
            .actor("scale", "#b")
            .args([1, 3, 200])
            .build()
            .unwrap();
        engine.parallel(vec![x, r, s]).unwrap();
        engine.dom_mut().drain_writes();

        engine.animate(100.0);
        let writes = engine.dom_mut().drain_writes();
        let transforms: Vec<_> = writes
            .iter()
            .filter(|w| w.property == "transform")
            .map(|w| (w.target, w.value.as_str()))
            .collect();
        assert_eq!(
            transforms,
            vec![
                (a, "translate3d(50%,0,0) rotate3d(0,0,1,90.00deg)"),
                (b, "scale3d(2.00,2.00,1)"),
            ]
        );
        assert_eq!(writes.len(), 4);
    }

    #[test]
    fn test_queue_boundary_runs_first_leaf_only() {
        let (mut engine, a, _) = engine();
        let up = engine
            .actor("move_y", "#a")
            .args([0, -100, 100])
            .build()
            .unwrap();
        let back = engine
            .actor("move_y", "#a")
            .args([0, 100, 100])
            .build()
            .unwrap();
        engine.queue(vec![up, back]);
        assert_eq!(engine.length(), 200.0);

        engine.animate(100.0);
        assert_eq!(
            engine.dom().style(a, "transform"),
            Some("translate3d(0, -100px,0)")
        );

        engine.animate(150.0);
        assert_eq!(
            engine.dom().style(a, "transform"),
            Some("translate3d(0, -100px,0) translate3d(0, 50px,0)")
        );
    }

    #[test]
    fn test_installing_replaces_tree() {
        let (mut engine, _, _) = engine();
        let first = engine.detached("delay").arg(100).build().unwrap();
        let second = engine.detached("delay").arg(300).build().unwrap();

        assert!(engine.set_tree(first).is_none());
        let previous = engine.set_tree(second).unwrap();
        assert_eq!(previous.length(), 100.0);
        assert_eq!(engine.length(), 300.0);
    }

    #[test]
    fn test_parallel_needs_rigid_child() {
        let (mut engine, _, _) = engine();
        let only = engine.detached("delay").arg(100).build().unwrap().synchronize();
        assert!(matches!(
            engine.parallel(vec![only]),
            Err(EngineError::NoRigidChild)
        ));
        assert!(engine.tree().is_none());
    }

    #[test]
    fn test_reinit_follows_layout() {
        let (mut engine, _, _) = engine();
        let slide = engine.actor("slide", "#a").arg("first").build().unwrap();
        engine.queue(vec![slide]);
        assert_eq!(engine.length(), 400.0);

        engine.dom_mut().set_viewport_height(600.0);
        assert_eq!(engine.reinit().unwrap(), 600.0);
        assert_eq!(engine.length(), 600.0);
    }

    #[test]
    fn test_failed_reinit_keeps_tree() {
        let mut dom = MemoryDom::new(800.0);
        dom.insert("#a", 1200.0);
        let b = dom.insert("#b", 1000.0);
        let mut engine = Engine::new(dom);
        let first = engine.actor("slide", "#a").build().unwrap();
        let second = engine.actor("slide", "#b").arg("first").build().unwrap();
        engine.queue(vec![first, second]);
        assert_eq!(engine.length(), 1400.0);

        // #a shrinks, #b fits the taller viewport exactly and collapses to 0
        engine.dom_mut().insert("#a", 500.0);
        engine.dom_mut().set_viewport_height(1000.0);
        let err = engine.reinit().unwrap_err();
        assert_eq!(
            err.to_string(),
            "plugin `slide` reported a non-positive length (0)"
        );

        let lengths: Vec<f64> = match engine.tree().map(Node::kind) {
            Some(crate::animation::NodeKind::Sequence(sequence)) => {
                sequence.children().iter().map(Node::length).collect()
            }
            _ => Vec::new(),
        };
        assert_eq!(lengths, vec![1200.0, 200.0]);
        assert_eq!(engine.length(), 1400.0);

        // passes keep running on the previous geometry
        engine.animate(1300.0);
        assert_eq!(
            engine.dom().style(b, "transform"),
            Some("translate3d(0, -100px,0)")
        );
    }

    #[test]
    fn test_custom_plugin() {
        let (mut engine, _, b) = engine();
        let replaced = engine.register(PluginDescriptor::new(
            "lift",
            |cx| cx.number(0),
            |frame, _, options| {
                let unit = options["px"].as_f64().unwrap_or(1.0);
                frame
                    .morph
                    .translate_y(-unit * frame.position, crate::Unit::Px);
            },
        ).option("px", 2));
        assert!(replaced.is_none());

        let lift = engine.actor("lift", "#b").arg(50).build().unwrap();
        engine.set_tree(lift);
        engine.animate(20.0);
        assert_eq!(
            engine.dom().style(b, "transform"),
            Some("translate3d(0, -40px,0)")
        );
    }
}
