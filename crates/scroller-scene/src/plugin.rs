//! Plugin interface and registry.
//!
//! A plugin is a named animation behavior. When an actor is built, the
//! plugin's `init` runs once with the captured arguments and options and
//! returns an [`Actor`]: the per-element interpolation state together with
//! the length (in scroll units) over which it animates. During a pass the
//! leaf hands the actor a [`Frame`] carrying the percent complete and the
//! clamped position.
//!
//! Options are declared up front as `{name: default}` pairs. Values set on
//! the actor builder override the defaults before `init` runs; names the
//! plugin did not declare are rejected.

use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

use crate::animation::{Morph, UnitValue};
use crate::dom::{Dom, TargetHandle};
use crate::error::PluginError;

/// Resolved option values, keyed by option name.
pub type Options = BTreeMap<String, Value>;

/// Everything a plugin may look at while initializing.
pub struct InitContext<'a> {
    /// Element the actor is bound to; `None` for element-less plugins.
    pub target: Option<TargetHandle>,
    pub dom: &'a mut dyn Dom,
    pub args: &'a [Value],
    pub options: &'a Options,
}

impl InitContext<'_> {
    /// The bound element, for plugins that cannot work without one.
    pub fn target(&self) -> Result<TargetHandle, PluginError> {
        self.target.ok_or(PluginError::MissingTarget)
    }

    pub fn arg(&self, index: usize) -> Result<&Value, PluginError> {
        self.args
            .get(index)
            .ok_or(PluginError::MissingArgument(index))
    }

    /// Numeric argument. Numeric strings are accepted.
    pub fn number(&self, index: usize) -> Result<f64, PluginError> {
        let value = self.arg(index)?;
        as_number(value).ok_or_else(|| PluginError::InvalidArgument {
            index,
            expected: "a number",
            found: value.to_string(),
        })
    }

    /// Optional string argument.
    pub fn text(&self, index: usize) -> Option<&str> {
        self.args.get(index).and_then(Value::as_str)
    }

    /// Length argument such as `"50%"`, `"12px"` or `12`.
    pub fn unit_value(&self, index: usize) -> Result<UnitValue, PluginError> {
        let value = self.arg(index)?;
        UnitValue::from_value(value).ok_or_else(|| PluginError::InvalidArgument {
            index,
            expected: "a length (px or %)",
            found: value.to_string(),
        })
    }

    /// Two-element array of lengths, e.g. `["10%", "0px"]`.
    pub fn unit_pair(&self, index: usize) -> Result<[UnitValue; 2], PluginError> {
        let value = self.arg(index)?;
        let invalid = || PluginError::InvalidArgument {
            index,
            expected: "a pair of lengths",
            found: value.to_string(),
        };
        match value.as_array().map(Vec::as_slice) {
            Some([x, y]) => Ok([
                UnitValue::from_value(x).ok_or_else(invalid)?,
                UnitValue::from_value(y).ok_or_else(invalid)?,
            ]),
            _ => Err(invalid()),
        }
    }

    pub fn option_number(&self, name: &str) -> Result<f64, PluginError> {
        let value = self.options.get(name).unwrap_or(&Value::Null);
        as_number(value).ok_or_else(|| PluginError::InvalidOption {
            name: name.to_string(),
            expected: "a number",
            found: value.to_string(),
        })
    }
}

fn as_number(value: &Value) -> Option<f64> {
    let number: Option<f64> = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Per-invocation view handed to an actor.
pub struct Frame<'a> {
    pub target: Option<TargetHandle>,
    /// Transform deltas, reset before every invocation.
    pub morph: &'a mut Morph,
    /// `position / length`, in [0, 1] for non-negative positions.
    pub percent: f64,
    /// Position inside the actor's window, clamped to its length.
    pub position: f64,
    /// For effects outside `transform`, such as opacity.
    pub dom: &'a mut dyn Dom,
}

/// Initialized interpolation state of one leaf.
pub trait Actor: fmt::Debug {
    /// Scroll distance over which the actor completes. Must be positive.
    fn length(&self) -> f64;

    /// Apply the animation state for the current frame.
    fn act(&mut self, frame: &mut Frame<'_>);
}

/// A named animation behavior.
pub trait Plugin {
    /// Registry name, also the boundary lock key.
    fn name(&self) -> &str;

    /// Declared options with their defaults.
    fn options(&self) -> Options {
        Options::new()
    }

    /// Whether actors of this plugin are bound to an element. Element-less
    /// plugins (such as `delay`) ignore any selector and never write styles.
    fn binds_element(&self) -> bool {
        true
    }

    fn init(&self, cx: &mut InitContext<'_>) -> Result<Box<dyn Actor>, PluginError>;
}

type InitFn = dyn Fn(&mut InitContext<'_>) -> Result<f64, PluginError>;
type ActFn = dyn Fn(&mut Frame<'_>, &[Value], &Options);

/// Closure-based plugin.
///
/// `init` returns the length; `actor` receives the frame together with the
/// captured arguments and resolved options.
///
/// ```
/// use scroller_scene::PluginDescriptor;
///
/// let spin = PluginDescriptor::new(
///     "spin",
///     |cx| cx.number(0),
///     |frame, _args, options| {
///         let turns = options["turns"].as_f64().unwrap_or(1.0);
///         frame.morph.rotate(360.0 * turns * frame.percent);
///     },
/// )
/// .option("turns", 1);
/// ```
#[derive(Clone)]
pub struct PluginDescriptor {
    name: String,
    options: Options,
    binds_element: bool,
    init: Rc<InitFn>,
    actor: Rc<ActFn>,
}

impl PluginDescriptor {
    pub fn new(
        name: impl Into<String>,
        init: impl Fn(&mut InitContext<'_>) -> Result<f64, PluginError> + 'static,
        actor: impl Fn(&mut Frame<'_>, &[Value], &Options) + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            options: Options::new(),
            binds_element: true,
            init: Rc::new(init),
            actor: Rc::new(actor),
        }
    }

    /// Declare an option and its default value.
    pub fn option(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.options.insert(name.into(), default.into());
        self
    }

    /// Actors of this plugin are not bound to any element.
    pub fn detached(mut self) -> Self {
        self.binds_element = false;
        self
    }
}

impl fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("name", &self.name)
            .field("options", &self.options)
            .field("binds_element", &self.binds_element)
            .finish_non_exhaustive()
    }
}

impl Plugin for PluginDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn options(&self) -> Options {
        self.options.clone()
    }

    fn binds_element(&self) -> bool {
        self.binds_element
    }

    fn init(&self, cx: &mut InitContext<'_>) -> Result<Box<dyn Actor>, PluginError> {
        let length = (self.init)(cx)?;
        Ok(Box::new(DescriptorActor {
            length,
            args: cx.args.to_vec(),
            options: cx.options.clone(),
            actor: Rc::clone(&self.actor),
        }))
    }
}

struct DescriptorActor {
    length: f64,
    args: Vec<Value>,
    options: Options,
    actor: Rc<ActFn>,
}

impl fmt::Debug for DescriptorActor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DescriptorActor")
            .field("length", &self.length)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

impl Actor for DescriptorActor {
    fn length(&self) -> f64 {
        self.length
    }

    fn act(&mut self, frame: &mut Frame<'_>) {
        (self.actor)(frame, &self.args, &self.options);
    }
}

/// Plugins available to an engine, by name.
#[derive(Default, Clone)]
pub struct PluginRegistry {
    plugins: HashMap<String, Rc<dyn Plugin>>,
}

impl PluginRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in plugins.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::plugins::register_builtins(&mut registry);
        registry
    }

    /// Register a plugin, replacing and returning any plugin of the same name.
    pub fn register(&mut self, plugin: impl Plugin + 'static) -> Option<Rc<dyn Plugin>> {
        let plugin: Rc<dyn Plugin> = Rc::new(plugin);
        let name = plugin.name().to_string();
        let previous = self.plugins.insert(name.clone(), plugin);
        if previous.is_some() {
            tracing::debug!(plugin = %name, "replaced registered plugin");
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<Rc<dyn Plugin>> {
        self.plugins.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.plugins.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.names())
            .finish()
    }
}
