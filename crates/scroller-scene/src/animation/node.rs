//! Composite nodes: sequential and concurrent groups.
//!
//! A node maps a position inside its own window to child positions and
//! reports how much of that position it consumed. Lengths are computed when
//! a composite is built and cached; [`Node::recompute_length`] refreshes them
//! after leaves have been re-initialized.

use super::leaf::{Initialized, Leaf};
use super::pass::Pass;
use crate::dom::Dom;
use crate::error::{EngineError, Result};

/// The three node variants.
#[derive(Debug)]
pub enum NodeKind {
    Sequence(Sequence),
    Concurrent(Concurrent),
    Leaf(Leaf),
}

/// A node in the animation tree.
///
/// A synchronized node inside a [`Concurrent`] group does not receive the
/// group's position as is: the position is rescaled by
/// `node.length / group.length`, so the node always spans the group's whole
/// window regardless of its own nominal length.
#[derive(Debug)]
pub struct Node {
    kind: NodeKind,
    synchronized: bool,
}

impl Node {
    /// Chain `children` end to end.
    pub fn sequence(children: Vec<Node>) -> Self {
        Self::from(Sequence::new(children))
    }

    /// Run `children` over the same window.
    pub fn concurrent(children: Vec<Node>) -> Result<Self> {
        Concurrent::new(children).map(Self::from)
    }

    /// Mark this node as synchronized to its parent's window.
    pub fn synchronize(mut self) -> Self {
        self.synchronized = true;
        self
    }

    pub fn is_synchronized(&self) -> bool {
        self.synchronized
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match &self.kind {
            NodeKind::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    /// Cached length.
    pub fn length(&self) -> f64 {
        match &self.kind {
            NodeKind::Sequence(sequence) => sequence.length(),
            NodeKind::Concurrent(concurrent) => concurrent.length(),
            NodeKind::Leaf(leaf) => leaf.length(),
        }
    }

    /// Recompute composite lengths bottom-up and return the new length.
    pub fn recompute_length(&mut self) -> f64 {
        match &mut self.kind {
            NodeKind::Sequence(sequence) => sequence.recompute_length(),
            NodeKind::Concurrent(concurrent) => concurrent.recompute_length(),
            NodeKind::Leaf(leaf) => leaf.length(),
        }
    }

    /// Number of leaves in this subtree.
    pub fn leaf_count(&self) -> usize {
        match &self.kind {
            NodeKind::Sequence(sequence) => sequence.children.iter().map(Node::leaf_count).sum(),
            NodeKind::Concurrent(concurrent) => {
                concurrent.children.iter().map(Node::leaf_count).sum()
            }
            NodeKind::Leaf(_) => 1,
        }
    }

    /// Animate to `position` and return the consumed distance.
    pub fn animate(&mut self, position: f64, pass: &mut Pass<'_>) -> f64 {
        match &mut self.kind {
            NodeKind::Sequence(sequence) => sequence.animate(position, pass),
            NodeKind::Concurrent(concurrent) => concurrent.animate(position, pass),
            NodeKind::Leaf(leaf) => leaf.animate(position, pass),
        }
    }

    /// Re-run every leaf's `init`, then recompute lengths.
    ///
    /// All leaves are initialized before any of them is updated: if one
    /// fails, the tree keeps its previous actors and lengths. Style writes
    /// made by the plugins that already ran are not undone.
    pub fn reinit(&mut self, dom: &mut dyn Dom) -> Result<f64> {
        let mut fresh = Vec::with_capacity(self.leaf_count());
        self.prepare_leaves(dom, &mut fresh)?;
        self.apply_leaves(&mut fresh.into_iter());
        Ok(self.recompute_length())
    }

    fn prepare_leaves(&self, dom: &mut dyn Dom, fresh: &mut Vec<Initialized>) -> Result<()> {
        match &self.kind {
            NodeKind::Sequence(Sequence { children, .. })
            | NodeKind::Concurrent(Concurrent { children, .. }) => {
                for child in children {
                    child.prepare_leaves(dom, fresh)?;
                }
            }
            NodeKind::Leaf(leaf) => fresh.push(leaf.prepare(dom)?),
        }
        Ok(())
    }

    fn apply_leaves(&mut self, fresh: &mut std::vec::IntoIter<Initialized>) {
        match &mut self.kind {
            NodeKind::Sequence(Sequence { children, .. })
            | NodeKind::Concurrent(Concurrent { children, .. }) => {
                for child in children {
                    child.apply_leaves(fresh);
                }
            }
            NodeKind::Leaf(leaf) => {
                if let Some(init) = fresh.next() {
                    leaf.apply(init);
                }
            }
        }
    }
}

impl From<Sequence> for Node {
    fn from(sequence: Sequence) -> Self {
        Self {
            kind: NodeKind::Sequence(sequence),
            synchronized: false,
        }
    }
}

impl From<Concurrent> for Node {
    fn from(concurrent: Concurrent) -> Self {
        Self {
            kind: NodeKind::Concurrent(concurrent),
            synchronized: false,
        }
    }
}

impl From<Leaf> for Node {
    fn from(leaf: Leaf) -> Self {
        Self {
            kind: NodeKind::Leaf(leaf),
            synchronized: false,
        }
    }
}

/// Sequential group ("queue"). Children run one after another.
#[derive(Debug)]
pub struct Sequence {
    children: Vec<Node>,
    length: f64,
}

impl Sequence {
    pub fn new(children: Vec<Node>) -> Self {
        let mut sequence = Self {
            children,
            length: 0.0,
        };
        sequence.recompute_length();
        sequence
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Sum of the children's lengths.
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn recompute_length(&mut self) -> f64 {
        self.length = self
            .children
            .iter_mut()
            .map(Node::recompute_length)
            .sum();
        self.length
    }

    /// Feed each child what is left of `position` after its predecessors.
    ///
    /// Returns the total consumed, which never exceeds the sequence length.
    pub fn animate(&mut self, position: f64, pass: &mut Pass<'_>) -> f64 {
        let mut remaining = position;
        let mut consumed = 0.0;
        for child in &mut self.children {
            let used = child.animate(remaining, pass);
            consumed += used;
            remaining = (remaining - used).max(0.0);
        }
        consumed
    }
}

/// Concurrent group ("parallel"). Children share one window.
///
/// The group's length is the longest non-synchronized ("rigid") child;
/// synchronized children stretch or shrink to that window.
#[derive(Debug)]
pub struct Concurrent {
    children: Vec<Node>,
    length: f64,
}

impl Concurrent {
    /// Build the group, rejecting configurations that would divide by zero
    /// while rescaling synchronized children.
    pub fn new(children: Vec<Node>) -> Result<Self> {
        let mut concurrent = Self {
            children,
            length: 0.0,
        };
        concurrent.recompute_length();
        concurrent.validate()?;
        Ok(concurrent)
    }

    fn validate(&self) -> Result<()> {
        if self.children.iter().all(Node::is_synchronized) {
            return Err(EngineError::NoRigidChild);
        }
        if self.length <= 0.0 && self.children.iter().any(Node::is_synchronized) {
            return Err(EngineError::ZeroLengthParallel);
        }
        Ok(())
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Longest non-synchronized child.
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn recompute_length(&mut self) -> f64 {
        let mut length = 0.0_f64;
        for child in &mut self.children {
            let child_length = child.recompute_length();
            if !child.is_synchronized() {
                length = length.max(child_length);
            }
        }
        self.length = length;
        length
    }

    /// Rigid children get `position` unchanged, synchronized children get it
    /// rescaled by `child.length / self.length`.
    ///
    /// Returns the largest distance consumed by a rigid child.
    pub fn animate(&mut self, position: f64, pass: &mut Pass<'_>) -> f64 {
        // only empty rigid children; construction rejects synchronized ones here
        if self.length <= 0.0 {
            return 0.0;
        }
        let mut consumed = 0.0_f64;
        for child in &mut self.children {
            if child.is_synchronized() {
                let scaled = position * child.length() / self.length;
                child.animate(scaled, pass);
            } else {
                consumed = consumed.max(child.animate(position, pass));
            }
        }
        consumed
    }
}
