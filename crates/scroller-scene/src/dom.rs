//! Document collaborator.
//!
//! The engine touches the page in exactly four ways: it resolves a selector
//! once when an actor is built, reads geometry while actors initialize,
//! declares the smoothing `transition` on each bound element, and writes the
//! baked `transform` once per element per pass. Everything else is the
//! embedder's business.

use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Opaque identity of an animated element.
///
/// Assigned by the [`Dom`] when a selector is resolved and never re-derived
/// afterwards; the engine only uses it as a lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetHandle(pub u32);

/// Selector resolution failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomError {
    #[error("no element matches `{0}`")]
    NotFound(String),
    #[error("unsupported selector `{0}`")]
    Unsupported(String),
}

/// Interface to the page the engine animates.
pub trait Dom {
    /// Resolve a selector to a stable element handle.
    fn resolve(&mut self, selector: &str) -> Result<TargetHandle, DomError>;

    /// Height of the visible viewport.
    fn viewport_height(&self) -> f64;

    /// Outer height of an element, padding and border included.
    fn outer_height(&self, target: TargetHandle) -> f64;

    /// Write one inline style property.
    fn set_style(&mut self, target: TargetHandle, property: &str, value: &str);
}

/// A single recorded style write.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleWrite {
    pub target: TargetHandle,
    pub property: String,
    pub value: String,
}

#[derive(Debug, Clone)]
struct MemoryElement {
    selector: String,
    height: f64,
    styles: BTreeMap<String, String>,
}

/// Layout-free in-memory document.
///
/// Elements are registered up front with a fixed outer height; style writes
/// are stored per element and appended to a write log so callers can observe
/// exactly what a pass produced.
#[derive(Debug, Clone)]
pub struct MemoryDom {
    viewport_height: f64,
    elements: Vec<MemoryElement>,
    by_selector: HashMap<String, TargetHandle>,
    writes: Vec<StyleWrite>,
}

impl MemoryDom {
    pub fn new(viewport_height: f64) -> Self {
        Self {
            viewport_height,
            elements: Vec::new(),
            by_selector: HashMap::new(),
            writes: Vec::new(),
        }
    }

    /// Register an element. Re-inserting a selector returns the existing handle
    /// and updates its height.
    pub fn insert(&mut self, selector: &str, height: f64) -> TargetHandle {
        if let Some(&handle) = self.by_selector.get(selector) {
            self.elements[handle.0 as usize].height = height;
            return handle;
        }

        let handle = TargetHandle(self.elements.len() as u32);
        self.elements.push(MemoryElement {
            selector: selector.to_string(),
            height,
            styles: BTreeMap::new(),
        });
        self.by_selector.insert(selector.to_string(), handle);
        handle
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height;
    }

    /// Selector the element was registered under.
    pub fn selector(&self, target: TargetHandle) -> Option<&str> {
        self.elements
            .get(target.0 as usize)
            .map(|element| element.selector.as_str())
    }

    /// Current value of an inline style property.
    pub fn style(&self, target: TargetHandle, property: &str) -> Option<&str> {
        self.elements
            .get(target.0 as usize)
            .and_then(|element| element.styles.get(property))
            .map(String::as_str)
    }

    /// Every write since creation or the last [`MemoryDom::drain_writes`].
    pub fn writes(&self) -> &[StyleWrite] {
        &self.writes
    }

    pub fn drain_writes(&mut self) -> Vec<StyleWrite> {
        std::mem::take(&mut self.writes)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Dom for MemoryDom {
    fn resolve(&mut self, selector: &str) -> Result<TargetHandle, DomError> {
        let selector = selector.trim();
        if selector.is_empty() {
            return Err(DomError::Unsupported(selector.to_string()));
        }
        self.by_selector
            .get(selector)
            .copied()
            .ok_or_else(|| DomError::NotFound(selector.to_string()))
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn outer_height(&self, target: TargetHandle) -> f64 {
        self.elements
            .get(target.0 as usize)
            .map_or(0.0, |element| element.height)
    }

    fn set_style(&mut self, target: TargetHandle, property: &str, value: &str) {
        let Some(element) = self.elements.get_mut(target.0 as usize) else {
            tracing::warn!(?target, property, "style write to unknown element ignored");
            return;
        };
        element
            .styles
            .insert(property.to_string(), value.to_string());
        self.writes.push(StyleWrite {
            target,
            property: property.to_string(),
            value: value.to_string(),
        });
    }
}
