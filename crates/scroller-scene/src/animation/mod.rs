//! Position-driven animation tree.
//!
//! This module provides:
//! - **Nodes**: sequential and concurrent composites over leaf actors
//! - **Morphs**: per-invocation transform deltas baked into CSS fragments
//! - **Pass state**: boundary locks and pending transforms for one pass
//! - **Units and timing functions**: the CSS values actors and transitions use
//!
//! # Architecture
//!
//! ```text
//! Node (Sequence)
//!   ├── Node (Leaf: move_y #title)      consumes [0, 300)
//!   └── Node (Concurrent)               consumes [300, 700)
//!         ├── Node (Leaf: slide #page)          rigid, length 400
//!         └── Node (Leaf: rotate #logo, sync)   rescaled by 90 / 400
//! ```

pub mod leaf;
pub mod morph;
pub mod node;
pub mod pass;
pub mod timing;
pub mod units;

pub use leaf::Leaf;
pub use morph::Morph;
pub use node::{Concurrent, Node, NodeKind, Sequence};
pub use pass::{LockTable, Pass, PendingTransforms};
pub use timing::{StepPosition, TimingFunction};
pub use units::{Unit, UnitValue};
