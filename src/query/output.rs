use std::fmt::Write;
use std::io::IsTerminal;

use crate::cli::OutputFormat;
use crate::graph::MetadataGraph;
use crate::graph::node::NodeAttribute;
use crate::query::grouping::{GroupedSelection, LegendEntry};

/// Label for nodes that lack the group attribute.
const NO_VALUE: &str = "(none)";

fn group_label(value: Option<&str>) -> &str {
    value.unwrap_or(NO_VALUE)
}

/// Render the grouped selection panel.
///
/// - Compact: `group <value> <count>` headers followed by `  node <fullName> <id>` lines,
///   then a `N nodes selected` footer.
/// - Table: one row per node with its group, full name and id.
/// - Json: `{ "groupBy", "count", "groups": [{ "group", "nodes": [{ "id", "fullName", "type" }] }] }`.
pub fn format_selection(
    graph: &MetadataGraph,
    grouped: &GroupedSelection,
    group_key: NodeAttribute,
    format: &OutputFormat,
) -> String {
    let mut out = String::new();
    match format {
        OutputFormat::Compact => {
            for group in &grouped.groups {
                let _ = writeln!(
                    out,
                    "group {} {}",
                    group_label(group.value.as_deref()),
                    group.nodes.len()
                );
                for &idx in &group.nodes {
                    let node = graph.node(idx);
                    let _ = writeln!(out, "  node {} {}", node.display_name(), node.id);
                }
            }
            let _ = writeln!(out, "{} nodes selected", grouped.node_count());
        }

        OutputFormat::Table => {
            let use_color = std::io::stdout().is_terminal();

            let rows: Vec<(&str, &str, &str)> = grouped
                .groups
                .iter()
                .flat_map(|g| {
                    g.nodes.iter().map(move |&idx| {
                        let node = graph.node(idx);
                        (
                            group_label(g.value.as_deref()),
                            node.display_name(),
                            node.id.as_str(),
                        )
                    })
                })
                .collect();

            let group_header = group_key.as_str().to_uppercase();
            // Column widths: auto-sized to data.
            let group_w = rows
                .iter()
                .map(|r| r.0.len())
                .max()
                .unwrap_or(0)
                .max(group_header.len());
            let name_w = rows.iter().map(|r| r.1.len()).max().unwrap_or(9).max(9);

            let header = format!(
                "{:<group_w$}  {:<name_w$}  {}",
                group_header,
                "FULL NAME",
                "ID",
                group_w = group_w,
                name_w = name_w,
            );
            if use_color {
                let _ = writeln!(out, "\x1b[1m{header}\x1b[0m");
            } else {
                let _ = writeln!(out, "{header}");
            }
            let _ = writeln!(out, "{}", "-".repeat(group_w + name_w + 8));

            for (group, name, id) in rows {
                let _ = writeln!(
                    out,
                    "{:<group_w$}  {:<name_w$}  {}",
                    group,
                    name,
                    id,
                    group_w = group_w,
                    name_w = name_w,
                );
            }
        }

        OutputFormat::Json => {
            let groups: Vec<serde_json::Value> = grouped
                .groups
                .iter()
                .map(|g| {
                    let nodes: Vec<serde_json::Value> = g
                        .nodes
                        .iter()
                        .map(|&idx| {
                            let node = graph.node(idx);
                            serde_json::json!({
                                "id": node.id,
                                "fullName": node.full_name,
                                "type": node.kind,
                            })
                        })
                        .collect();
                    serde_json::json!({
                        "group": g.value,
                        "nodes": nodes,
                    })
                })
                .collect();
            let doc = serde_json::json!({
                "groupBy": group_key.as_str(),
                "count": grouped.node_count(),
                "groups": groups,
            });
            let _ = writeln!(
                out,
                "{}",
                serde_json::to_string_pretty(&doc).unwrap_or_default()
            );
        }
    }
    out
}

/// Render legend entries.
///
/// - Compact: `legend <value> <count> <color>` per entry.
/// - Table: columns for value, count and colour.
/// - Json: array of `{ "group", "count", "color" }`.
pub fn format_legend(entries: &[LegendEntry], group_key: NodeAttribute, format: &OutputFormat) -> String {
    let mut out = String::new();
    match format {
        OutputFormat::Compact => {
            for e in entries {
                let _ = writeln!(
                    out,
                    "legend {} {} {}",
                    group_label(e.value.as_deref()),
                    e.count,
                    e.color
                );
            }
            let _ = writeln!(out, "{} groups by {}", entries.len(), group_key);
        }

        OutputFormat::Table => {
            let group_header = group_key.as_str().to_uppercase();
            let group_w = entries
                .iter()
                .map(|e| group_label(e.value.as_deref()).len())
                .max()
                .unwrap_or(0)
                .max(group_header.len());
            let _ = writeln!(
                out,
                "{:<group_w$}  {:>5}  {}",
                group_header,
                "NODES",
                "COLOR",
                group_w = group_w
            );
            let _ = writeln!(out, "{}", "-".repeat(group_w + 16));
            for e in entries {
                let _ = writeln!(
                    out,
                    "{:<group_w$}  {:>5}  {}",
                    group_label(e.value.as_deref()),
                    e.count,
                    e.color,
                    group_w = group_w
                );
            }
        }

        OutputFormat::Json => {
            let json: Vec<serde_json::Value> = entries
                .iter()
                .map(|e| {
                    serde_json::json!({
                        "group": e.value,
                        "count": e.count,
                        "color": e.color,
                    })
                })
                .collect();
            let _ = writeln!(
                out,
                "{}",
                serde_json::to_string_pretty(&json).unwrap_or_default()
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::MetadataNode;
    use crate::query::grouping::{legend, project_groups};
    use crate::selection::SelectionSet;

    fn make_graph() -> MetadataGraph {
        let mut graph = MetadataGraph::new();
        graph.add_node(MetadataNode {
            kind: Some("ApexClass".into()),
            full_name: Some("AccountService".into()),
            ..MetadataNode::new("1")
        });
        graph.add_node(MetadataNode {
            full_name: Some("Orphan".into()),
            ..MetadataNode::new("2")
        });
        graph
    }

    fn everything(graph: &MetadataGraph) -> GroupedSelection {
        let selection: SelectionSet = graph.nodes().map(|(i, _)| i).collect();
        project_groups(graph, &selection, NodeAttribute::Type)
    }

    #[test]
    fn test_compact_selection() {
        let graph = make_graph();
        let out = format_selection(&graph, &everything(&graph), NodeAttribute::Type, &OutputFormat::Compact);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "group ApexClass 1",
                "  node AccountService 1",
                "group (none) 1",
                "  node Orphan 2",
                "2 nodes selected",
            ]
        );
    }

    #[test]
    fn test_json_selection() {
        let graph = make_graph();
        let out = format_selection(&graph, &everything(&graph), NodeAttribute::Type, &OutputFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["groupBy"], "type");
        assert_eq!(parsed["count"], 2);
        assert_eq!(parsed["groups"][0]["group"], "ApexClass");
        assert_eq!(parsed["groups"][0]["nodes"][0]["fullName"], "AccountService");
        assert!(parsed["groups"][1]["group"].is_null());
    }

    #[test]
    fn test_table_selection_has_header_and_rows() {
        let graph = make_graph();
        let out = format_selection(&graph, &everything(&graph), NodeAttribute::Type, &OutputFormat::Table);
        assert!(out.contains("TYPE"));
        assert!(out.contains("FULL NAME"));
        assert!(out.lines().any(|l| l.starts_with("ApexClass") && l.ends_with("1")));
    }

    #[test]
    fn test_compact_legend() {
        let graph = make_graph();
        let out = format_legend(&legend(&graph, NodeAttribute::Type), NodeAttribute::Type, &OutputFormat::Compact);
        assert!(out.starts_with("legend ApexClass 1 #1f77b4\nlegend (none) 1 #ff7f0e\n"));
        assert!(out.ends_with("2 groups by type\n"));
    }
}
