//! State scoped to a single engine pass.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::dom::{Dom, TargetHandle};

/// Boundary locks, keyed by plugin name and target.
///
/// Two adjacent leaves of the same plugin on the same element share a segment
/// boundary. When the first one has run this pass, the second must not run
/// its zero-position evaluation, otherwise it would overwrite the first one's
/// end state with its own start state.
#[derive(Debug, Default)]
pub struct LockTable {
    held: HashMap<String, HashSet<Option<TargetHandle>>>,
}

impl LockTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to take the lock for `(plugin, target)`.
    ///
    /// Returns `false` only for a boundary evaluation (`position == 0`) when
    /// the lock is already held. In every other case the lock is taken (or
    /// kept) and `true` is returned.
    pub fn acquire(&mut self, plugin: &str, target: Option<TargetHandle>, position: f64) -> bool {
        let targets = self.held.entry(plugin.to_string()).or_default();
        if position == 0.0 && targets.contains(&target) {
            return false;
        }
        targets.insert(target);
        true
    }

    pub fn is_held(&self, plugin: &str, target: Option<TargetHandle>) -> bool {
        self.held
            .get(plugin)
            .is_some_and(|targets| targets.contains(&target))
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }
}

/// Transform fragments collected per element during a pass.
#[derive(Debug, Default)]
pub struct PendingTransforms {
    fragments: BTreeMap<TargetHandle, Vec<String>>,
}

impl PendingTransforms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, target: TargetHandle, fragment: String) {
        self.fragments.entry(target).or_default().push(fragment);
    }

    /// The transform that will be written for `target`, if any leaf touched it.
    pub fn joined(&self, target: TargetHandle) -> Option<String> {
        self.fragments.get(&target).map(|fragments| join(fragments))
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn clear(&mut self) {
        self.fragments.clear();
    }

    /// Write one `transform` (and its `-webkit-` twin) per touched element.
    /// Returns the number of elements written.
    pub fn commit(&self, dom: &mut dyn Dom) -> usize {
        for (&target, fragments) in &self.fragments {
            let transform = join(fragments);
            dom.set_style(target, "transform", &transform);
            dom.set_style(target, "-webkit-transform", &transform);
        }
        self.fragments.len()
    }
}

fn join(fragments: &[String]) -> String {
    fragments
        .iter()
        .filter(|fragment| !fragment.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Borrowed view of everything a tree walk may touch.
pub struct Pass<'a> {
    pub locks: &'a mut LockTable,
    pub transforms: &'a mut PendingTransforms,
    pub dom: &'a mut dyn Dom,
}
