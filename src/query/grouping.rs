use std::collections::HashMap;

use petgraph::stable_graph::NodeIndex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::graph::MetadataGraph;
use crate::graph::node::NodeAttribute;
use crate::selection::SelectionSet;

/// Ten-colour categorical palette used for legend entries, assigned in legend order.
pub const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Selected nodes sharing one value of the group key. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionGroup {
    /// The group key's value; `None` collects nodes that do not carry the attribute.
    pub value: Option<String>,
    /// Members sorted by full name.
    pub nodes: Vec<NodeIndex>,
}

/// The selection partitioned by the group key, as the side panel lists it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedSelection {
    /// Groups in order of their first member in full-name order.
    pub groups: Vec<SelectionGroup>,
}

impl GroupedSelection {
    /// Members of the group with the given value, if any are selected.
    pub fn get(&self, value: Option<&str>) -> Option<&[NodeIndex]> {
        self.groups
            .iter()
            .find(|g| g.value.as_deref() == value)
            .map(|g| g.nodes.as_slice())
    }

    /// Total number of nodes across all groups.
    pub fn node_count(&self) -> usize {
        self.groups.iter().map(|g| g.nodes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Reorder groups to follow the legend, the way the panel nests them under legend
    /// items. Groups missing from the legend keep their relative order at the end.
    pub fn in_legend_order(mut self, legend: &[LegendEntry]) -> Self {
        self.groups.sort_by_key(|g| {
            legend
                .iter()
                .position(|entry| entry.value == g.value)
                .unwrap_or(usize::MAX)
        });
        self
    }
}

/// One legend row: a group value over the whole graph with its size and colour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub value: Option<String>,
    pub count: usize,
    pub color: &'static str,
}

/// Sort key for a full name, approximating the default Unicode collation order.
///
/// Fields compare in declaration order: base letters with accents stripped and case
/// folded, then accents (unaccented first), then case (lowercase first), then the
/// exact text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
    base: String,
    accents: String,
    case: Vec<bool>,
    text: String,
}

impl CollationKey {
    pub fn new(name: &str) -> Self {
        let decomposed: Vec<char> = name.nfd().collect();
        let letters = || decomposed.iter().copied().filter(|&c| !is_combining_mark(c));
        CollationKey {
            base: letters().flat_map(char::to_lowercase).collect(),
            accents: decomposed.iter().copied().flat_map(char::to_lowercase).collect(),
            case: letters().map(char::is_uppercase).collect(),
            text: name.to_owned(),
        }
    }
}

/// Panel sort key for a node: collated full name, then the node id so the order is
/// total. Missing full names sort as empty.
pub fn full_name_key(graph: &MetadataGraph, idx: NodeIndex) -> (CollationKey, &str) {
    let node = graph.node(idx);
    (
        CollationKey::new(node.full_name.as_deref().unwrap_or("")),
        node.id.as_str(),
    )
}

/// Partition `selection` by `group_key` for the side panel.
///
/// Nodes are sorted by full name first, then bucketed; groups appear in order of
/// their first member. Recomputed from scratch on every call.
pub fn project_groups(
    graph: &MetadataGraph,
    selection: &SelectionSet,
    group_key: NodeAttribute,
) -> GroupedSelection {
    let mut sorted: Vec<NodeIndex> = selection.iter().collect();
    sorted.sort_by_cached_key(|&idx| full_name_key(graph, idx));

    let mut groups: Vec<SelectionGroup> = Vec::new();
    let mut position: HashMap<Option<&str>, usize> = HashMap::new();

    for idx in sorted {
        let value = graph.node(idx).attribute(group_key);
        let slot = *position.entry(value).or_insert_with(|| {
            groups.push(SelectionGroup {
                value: value.map(str::to_owned),
                nodes: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].nodes.push(idx);
    }

    GroupedSelection { groups }
}

/// Build the legend for the whole graph: every value of `group_key` with its node
/// count, smallest group first, coloured from [`CATEGORY10`] in order.
///
/// Groups of equal size keep the order in which their first node appears in the graph.
pub fn legend(graph: &MetadataGraph, group_key: NodeAttribute) -> Vec<LegendEntry> {
    let mut values: Vec<(Option<&str>, usize)> = Vec::new();
    let mut position: HashMap<Option<&str>, usize> = HashMap::new();
    for (_, node) in graph.nodes() {
        let value = node.attribute(group_key);
        let slot = *position.entry(value).or_insert_with(|| {
            values.push((value, 0));
            values.len() - 1
        });
        values[slot].1 += 1;
    }

    // Stable, so ties stay in first-appearance order.
    values.sort_by_key(|&(_, count)| count);

    values
        .into_iter()
        .enumerate()
        .map(|(i, (value, count))| LegendEntry {
            value: value.map(str::to_owned),
            count,
            color: CATEGORY10[i % CATEGORY10.len()],
        })
        .collect()
}
