//! Scroll-driven animation engine.
//!
//! A single scroll offset is mapped onto a tree of animation nodes. Leaves are
//! plugin actors bound to one element each; composites chain them
//! sequentially (`queue`) or run them over the same window (`parallel`).
//! Every pass collects transform fragments per element and writes each
//! element's `transform` exactly once.
//!
//! ```text
//! Engine
//!   ├── PluginRegistry (slide, rotate, move, move_x, move_y, fade, scale, delay, ...)
//!   ├── Node tree (Sequence / Concurrent / Leaf)
//!   └── per-pass LockTable + PendingTransforms ──► Dom::set_style("transform")
//! ```

pub mod animation;
pub mod dom;
pub mod engine;
pub mod error;
pub mod plugin;
pub mod plugins;
pub mod scene;

pub use animation::{
    Concurrent, Leaf, Morph, Node, NodeKind, Sequence, TimingFunction, Unit, UnitValue,
};
pub use dom::{Dom, DomError, MemoryDom, StyleWrite, TargetHandle};
pub use engine::{ActorBuilder, ConfigPatch, Engine, EngineConfig};
pub use error::{EngineError, PluginError, Result};
pub use plugin::{Actor, Frame, InitContext, Options, Plugin, PluginDescriptor, PluginRegistry};
pub use scene::{ElementSpec, SceneDocument, SceneError, SceneNode};
