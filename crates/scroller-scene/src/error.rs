//! Error types for tree construction.
//!
//! Everything here surfaces while actors and composites are being built.
//! A pass over a validly constructed tree cannot fail.

use thiserror::Error;

use crate::animation::Unit;
use crate::dom::DomError;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors raised while building actors, composites or the engine configuration.
#[derive(Error, Debug)]
pub enum EngineError {
    /// No plugin is registered under this name.
    #[error("unknown plugin `{0}`")]
    UnknownPlugin(String),

    /// An option was set that the plugin does not declare.
    #[error("plugin `{plugin}` has no option `{option}`")]
    UnknownOption { plugin: String, option: String },

    /// The plugin animates an element but no selector was given.
    #[error("plugin `{0}` needs a target selector")]
    MissingTarget(String),

    /// The DOM could not resolve the selector.
    #[error("failed to resolve target `{selector}`: {source}")]
    Resolve {
        selector: String,
        #[source]
        source: DomError,
    },

    /// The plugin rejected its arguments or options.
    #[error("plugin `{plugin}`: {source}")]
    Plugin {
        plugin: String,
        #[source]
        source: PluginError,
    },

    /// A leaf reported a length that would divide by zero during a pass.
    #[error("plugin `{plugin}` reported a non-positive length ({length})")]
    DegenerateLeaf { plugin: String, length: f64 },

    /// A parallel group needs at least one child that is not synchronized.
    #[error("parallel group has no non-synchronized child")]
    NoRigidChild,

    /// Synchronized children cannot be rescaled against a zero-length group.
    #[error("parallel group with synchronized children has zero length")]
    ZeroLengthParallel,

    /// The configured CSS timing function could not be parsed.
    #[error("invalid timing function `{0}`")]
    TimingFunction(String),
}

/// Errors a plugin reports from its `init`.
#[derive(Error, Debug, PartialEq)]
pub enum PluginError {
    #[error("missing argument #{0}")]
    MissingArgument(usize),

    #[error("argument #{index}: expected {expected}, got {found}")]
    InvalidArgument {
        index: usize,
        expected: &'static str,
        found: String,
    },

    #[error("option `{name}`: expected {expected}, got {found}")]
    InvalidOption {
        name: String,
        expected: &'static str,
        found: String,
    },

    #[error("start and end values have different units ({start} vs {end})")]
    MixedUnits { start: Unit, end: Unit },

    #[error("this plugin must be bound to an element")]
    MissingTarget,

    #[error("{0}")]
    Custom(String),
}
