pub mod gesture;
pub mod store;

use std::collections::BTreeSet;
use std::collections::btree_set;

use petgraph::stable_graph::NodeIndex;

/// A set of selected nodes, by identity.
///
/// Iterates in node-index order, so every listing built from it is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    nodes: BTreeSet<NodeIndex>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. Returns `false` if it was already selected.
    pub fn insert(&mut self, idx: NodeIndex) -> bool {
        self.nodes.insert(idx)
    }

    /// Remove a node. Returns `false` if it was not selected.
    pub fn remove(&mut self, idx: NodeIndex) -> bool {
        self.nodes.remove(&idx)
    }

    pub fn contains(&self, idx: NodeIndex) -> bool {
        self.nodes.contains(&idx)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.nodes.iter().copied()
    }

    /// `true` if every node of `other` is also in `self`.
    pub fn is_superset(&self, other: &SelectionSet) -> bool {
        self.nodes.is_superset(&other.nodes)
    }
}

impl FromIterator<NodeIndex> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = NodeIndex>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl Extend<NodeIndex> for SelectionSet {
    fn extend<I: IntoIterator<Item = NodeIndex>>(&mut self, iter: I) {
        self.nodes.extend(iter);
    }
}

impl IntoIterator for SelectionSet {
    type Item = NodeIndex;
    type IntoIter = btree_set::IntoIter<NodeIndex>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = NodeIndex;
    type IntoIter = std::iter::Copied<btree_set::Iter<'a, NodeIndex>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter().copied()
    }
}
