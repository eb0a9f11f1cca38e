//! Declarative scene documents.
//!
//! A scene lists the elements of an in-memory page and the animation tree to
//! run over it. Documents can be written as JSON or TOML.
//!
//! # Example JSON
//!
//! ```json
//! {
//!   "elements": [{ "selector": "#hero", "height": 1400 }],
//!   "tree": {
//!     "queue": [
//!       { "actor": "slide", "target": "#hero", "args": ["first"] },
//!       { "actor": "delay", "args": [200] },
//!       {
//!         "parallel": [
//!           { "actor": "move_x", "target": "#logo", "args": ["0%", "50%", 300] },
//!           { "actor": "rotate", "target": "#logo", "args": [0, 360, 1], "sync": true }
//!         ]
//!       }
//!     ]
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::animation::Node;
use crate::dom::{Dom, MemoryDom, TargetHandle};
use crate::engine::Engine;
use crate::error::EngineError;
use crate::plugin::Options;

/// Errors raised while loading or installing a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("failed to read scene `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON scene: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML scene: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported scene format `{}` (expected .json or .toml)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// An element of the in-memory page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSpec {
    pub selector: String,
    /// Outer height in pixels.
    pub height: f64,
}

/// One node of the animation tree.
///
/// The variant is picked by its distinguishing key: `queue`, `parallel` or
/// `actor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SceneNode {
    Queue {
        queue: Vec<SceneNode>,
        #[serde(default, skip_serializing_if = "is_false")]
        sync: bool,
    },
    Parallel {
        parallel: Vec<SceneNode>,
        #[serde(default, skip_serializing_if = "is_false")]
        sync: bool,
    },
    Actor {
        /// Registered plugin name.
        actor: String,
        /// Selector of the animated element. Omitted for element-less plugins.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<Value>,
        #[serde(default, skip_serializing_if = "Options::is_empty")]
        options: Options,
        #[serde(default, skip_serializing_if = "is_false")]
        sync: bool,
    },
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl SceneNode {
    pub fn is_synchronized(&self) -> bool {
        match self {
            Self::Queue { sync, .. } | Self::Parallel { sync, .. } | Self::Actor { sync, .. } => {
                *sync
            }
        }
    }

    /// Build this node and its children against `engine`.
    pub fn build<D: Dom>(&self, engine: &mut Engine<D>) -> Result<Node, EngineError> {
        let node = match self {
            Self::Queue { queue, .. } => Node::sequence(build_all(queue, engine)?),
            Self::Parallel { parallel, .. } => Node::concurrent(build_all(parallel, engine)?)?,
            Self::Actor {
                actor,
                target,
                args,
                options,
                ..
            } => {
                let mut builder = match target {
                    Some(selector) => engine.actor(actor, selector),
                    None => engine.detached(actor),
                };
                builder = builder.args(args.iter().cloned());
                for (name, value) in options {
                    builder = builder.option(name.clone(), value.clone());
                }
                builder.build()?
            }
        };

        Ok(if self.is_synchronized() {
            node.synchronize()
        } else {
            node
        })
    }
}

fn build_all<D: Dom>(nodes: &[SceneNode], engine: &mut Engine<D>) -> Result<Vec<Node>, EngineError> {
    nodes.iter().map(|node| node.build(engine)).collect()
}

/// A page layout together with the tree animating it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    #[serde(default)]
    pub elements: Vec<ElementSpec>,
    pub tree: SceneNode,
}

impl SceneDocument {
    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_toml(text: &str) -> Result<Self, SceneError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a document, choosing the format by file extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let extension = path.extension().and_then(|ext| ext.to_str());
        if !matches!(extension, Some("json" | "toml")) {
            return Err(SceneError::UnsupportedFormat(path.to_path_buf()));
        }

        let text = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document = match extension {
            Some("toml") => Self::from_toml(&text)?,
            _ => Self::from_json(&text)?,
        };
        tracing::debug!(
            path = %path.display(),
            elements = document.elements.len(),
            "loaded scene"
        );
        Ok(document)
    }

    /// Register every element with `dom`, in document order.
    pub fn populate(&self, dom: &mut MemoryDom) -> Vec<TargetHandle> {
        self.elements
            .iter()
            .map(|element| dom.insert(&element.selector, element.height))
            .collect()
    }

    /// Build the tree and install it on `engine`, returning the tree length.
    pub fn install<D: Dom>(&self, engine: &mut Engine<D>) -> Result<f64, SceneError> {
        let tree = self.tree.build(engine)?;
        let length = tree.length();
        engine.set_tree(tree);
        Ok(length)
    }
}
