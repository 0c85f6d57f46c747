use crate::graph::MetadataGraph;
use crate::selection::SelectionSet;

/// Grow `selection` by one hop: the result holds every selected node plus both
/// endpoints of every edge touching a selected node, in either direction.
///
/// Uses the graph's per-node adjacency instead of scanning the full edge list; the
/// resulting set is the same. Repeated calls grow monotonically until the connected
/// components of the selection are covered.
pub fn expand_neighbors(graph: &MetadataGraph, selection: &SelectionSet) -> SelectionSet {
    let mut expanded = selection.clone();
    for idx in selection {
        expanded.extend(graph.neighbors(idx));
    }
    expanded
}

/// Shrink `selection` to the nodes that have at least one neighbour inside it.
///
/// Isolated members (no selected neighbour) are dropped. Adjacency is judged against
/// the selection as passed in, so one call removes exactly one layer of isolated nodes
/// and never cascades.
pub fn contract_selection(graph: &MetadataGraph, selection: &SelectionSet) -> SelectionSet {
    selection
        .iter()
        .filter(|&idx| {
            graph
                .neighbors(idx)
                .any(|neighbor| neighbor != idx && selection.contains(neighbor))
        })
        .collect()
}
