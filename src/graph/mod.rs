pub mod layout;
pub mod node;

use std::collections::HashMap;

use petgraph::Directed;
use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};

use node::MetadataNode;

/// The loaded metadata dependency graph.
///
/// Edges keep their `source -> target` orientation from the graph document, but every
/// selection operation treats adjacency as symmetric. Nodes and edges are only added
/// while loading; node indices therefore stay valid for the whole session and serve as
/// node identity.
pub struct MetadataGraph {
    /// The underlying graph. Edge weights carry no data.
    pub graph: StableGraph<MetadataNode, (), Directed>,
    /// Maps node ids to their node indices for O(1) lookup.
    pub id_index: HashMap<String, NodeIndex>,
}

impl MetadataGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            graph: StableGraph::new(),
            id_index: HashMap::new(),
        }
    }

    /// Add a node. If a node with the same id already exists, the existing index is
    /// returned and `node` is discarded.
    pub fn add_node(&mut self, node: MetadataNode) -> NodeIndex {
        if let Some(&existing) = self.id_index.get(&node.id) {
            return existing;
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.id_index.insert(id, idx);
        idx
    }

    /// Add a `source -> target` dependency edge.
    pub fn add_edge(&mut self, source: NodeIndex, target: NodeIndex) -> EdgeIndex {
        self.graph.add_edge(source, target, ())
    }

    /// Resolve a node id to its index.
    pub fn find(&self, id: &str) -> Option<NodeIndex> {
        self.id_index.get(id).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> &MetadataNode {
        &self.graph[idx]
    }

    pub fn contains(&self, idx: NodeIndex) -> bool {
        self.graph.contains_node(idx)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All nodes with their indices, in index order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &MetadataNode)> + '_ {
        self.graph
            .node_indices()
            .map(move |idx| (idx, &self.graph[idx]))
    }

    /// Every edge touching `idx` in either direction, as `(edge, source, target)`.
    ///
    /// A self-loop is reported once.
    pub fn incident_edges(
        &self,
        idx: NodeIndex,
    ) -> impl Iterator<Item = (EdgeIndex, NodeIndex, NodeIndex)> + '_ {
        let outgoing = self.graph.edges_directed(idx, Direction::Outgoing);
        let incoming = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .filter(move |e| e.source() != idx);
        outgoing
            .chain(incoming)
            .map(|e| (e.id(), e.source(), e.target()))
    }

    /// Nodes adjacent to `idx` ignoring edge direction. May yield a node more than once
    /// when parallel edges exist.
    pub fn neighbors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_undirected(idx)
    }

    /// Edge indices with their `(source, target)` endpoints.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeIndex, NodeIndex, NodeIndex)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (e.id(), e.source(), e.target()))
    }
}

impl Default for MetadataGraph {
    fn default() -> Self {
        Self::new()
    }
}
