use std::collections::HashMap;

use petgraph::stable_graph::NodeIndex;

use crate::geometry::{GraphSpace, Point};

/// Snapshot of node positions in graph space.
///
/// The layout engine owns and updates it; selection code only reads it at the moment a
/// query runs. Nodes the layout has not placed yet have no position.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    positions: HashMap<NodeIndex, Point<GraphSpace>>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_position(&mut self, idx: NodeIndex, position: Point<GraphSpace>) {
        self.positions.insert(idx, position);
    }

    pub fn position(&self, idx: NodeIndex) -> Option<Point<GraphSpace>> {
        self.positions.get(&idx).copied()
    }

    /// Number of positioned nodes.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
