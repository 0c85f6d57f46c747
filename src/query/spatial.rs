use crate::geometry::{GraphSpace, Rect};
use crate::graph::MetadataGraph;
use crate::graph::layout::Layout;
use crate::selection::SelectionSet;

/// Select every node whose layout position lies inside `rect` (edges included).
///
/// Linear scan over all nodes; queries run at gesture rate, not per frame.
/// Nodes without a position in `layout` are never selected.
pub fn select_in_rect(graph: &MetadataGraph, layout: &Layout, rect: &Rect<GraphSpace>) -> SelectionSet {
    graph
        .nodes()
        .filter_map(|(idx, _)| {
            let position = layout.position(idx)?;
            rect.contains(position).then_some(idx)
        })
        .collect()
}
