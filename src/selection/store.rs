use std::collections::BTreeSet;
use std::sync::Arc;

use petgraph::stable_graph::{EdgeIndex, NodeIndex};
use tracing::debug;

use crate::graph::MetadataGraph;
use crate::graph::node::NodeAttribute;
use crate::query::grouping::{GroupedSelection, project_groups};
use crate::query::neighbors::{contract_selection, expand_neighbors};

use super::SelectionSet;

/// Handle returned by [`SelectionStore::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Visual state the renderer applies after a selection change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderFlags {
    /// Nodes drawn as selected.
    pub nodes: SelectionSet,
    /// Edges drawn as selected: those whose source or target is selected.
    pub edges: BTreeSet<EdgeIndex>,
    /// Document-level flag that dims unselected nodes.
    pub has_selections: bool,
}

/// Payload delivered to subscribers after every selection change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionUpdate {
    /// Panel listing, grouped by the store's group key.
    pub groups: GroupedSelection,
    pub render: RenderFlags,
}

type Subscriber = Box<dyn FnMut(&SelectionUpdate)>;

/// Owner of the current selection.
///
/// Every mutating call notifies all subscribers exactly once, after the mutation and
/// before returning. `expand` and `contract` on an empty selection do nothing and do
/// not notify.
pub struct SelectionStore {
    graph: Arc<MetadataGraph>,
    group_key: NodeAttribute,
    selection: SelectionSet,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl SelectionStore {
    /// Create an empty store over `graph`. `group_key` is fixed for the store's lifetime.
    pub fn new(graph: Arc<MetadataGraph>, group_key: NodeAttribute) -> Self {
        Self {
            graph,
            group_key,
            selection: SelectionSet::new(),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn group_key(&self) -> NodeAttribute {
        self.group_key
    }

    pub fn graph(&self) -> &MetadataGraph {
        &self.graph
    }

    /// Register an observer. It is called after every subsequent selection change.
    pub fn subscribe(&mut self, callback: impl FnMut(&SelectionUpdate) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove an observer. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Set the selection to exactly `nodes`.
    pub fn replace(&mut self, nodes: SelectionSet) {
        debug_assert!(
            nodes.iter().all(|idx| self.graph.contains(idx)),
            "selection contains a node from another graph"
        );
        self.selection = nodes;
        self.notify("replace");
    }

    /// Deselect `node` if selected, select it otherwise.
    pub fn toggle(&mut self, node: NodeIndex) {
        debug_assert!(self.graph.contains(node), "toggled node is not in the graph");
        if !self.selection.remove(node) {
            self.selection.insert(node);
        }
        self.notify("toggle");
    }

    pub fn clear(&mut self) {
        self.selection = SelectionSet::new();
        self.notify("clear");
    }

    /// Add every graph neighbour of the selection.
    pub fn expand(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.selection = expand_neighbors(&self.graph, &self.selection);
        self.notify("expand");
    }

    /// Drop every selected node that has no selected neighbour.
    pub fn contract(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.selection = contract_selection(&self.graph, &self.selection);
        self.notify("contract");
    }

    /// Derived state for the current selection, as subscribers would receive it.
    pub fn snapshot(&self) -> SelectionUpdate {
        // Group membership first, then render classification.
        let groups = project_groups(&self.graph, &self.selection, self.group_key);
        let render = render_flags(&self.graph, &self.selection);
        SelectionUpdate { groups, render }
    }

    fn notify(&mut self, cause: &str) {
        debug!(
            cause,
            selected = self.selection.len(),
            subscribers = self.subscribers.len(),
            "selection changed"
        );
        if self.subscribers.is_empty() {
            return;
        }
        let update = self.snapshot();
        for (_, callback) in &mut self.subscribers {
            callback(&update);
        }
    }
}

/// Classify nodes and edges for rendering under `selection`.
pub fn render_flags(graph: &MetadataGraph, selection: &SelectionSet) -> RenderFlags {
    let edges = selection
        .iter()
        .flat_map(|idx| graph.incident_edges(idx).map(|(edge, _, _)| edge))
        .collect();
    RenderFlags {
        nodes: selection.clone(),
        edges,
        has_selections: !selection.is_empty(),
    }
}
