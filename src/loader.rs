use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::geometry::Point;
use crate::graph::MetadataGraph;
use crate::graph::layout::Layout;
use crate::graph::node::MetadataNode;

/// Top-level shape of a graph document: `{ "nodes": [...], "edges": [...] }`.
#[derive(Debug, Deserialize)]
struct GraphDocument {
    nodes: Vec<RawNode>,
    #[serde(default)]
    edges: Vec<RawEdge>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    #[serde(deserialize_with = "id_string")]
    id: String,
    #[serde(rename = "type", default, deserialize_with = "text")]
    kind: Option<String>,
    #[serde(default, deserialize_with = "text")]
    full_name: Option<String>,
    #[serde(default, deserialize_with = "text")]
    file_name: Option<String>,
    #[serde(default, deserialize_with = "text")]
    namespace_prefix: Option<String>,
    #[serde(default, deserialize_with = "text")]
    manageable_state: Option<String>,
    #[serde(default, deserialize_with = "text")]
    last_modified_by_name: Option<String>,
    #[serde(default, deserialize_with = "text")]
    last_modified_date: Option<String>,
    #[serde(default, deserialize_with = "text")]
    created_by_name: Option<String>,
    #[serde(default, deserialize_with = "text")]
    created_date: Option<String>,
    x: Option<f64>,
    y: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawEdge {
    #[serde(deserialize_with = "id_string")]
    source: String,
    #[serde(deserialize_with = "id_string")]
    target: String,
}

/// Node ids and edge endpoints may be written as numbers or strings; both resolve to
/// the same textual id.
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number id, found {other}"
        ))),
    }
}

/// Only string values are searchable attributes; anything else counts as absent.
fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// A loaded graph plus the positions the document carried, if any.
pub struct LoadedGraph {
    pub graph: MetadataGraph,
    pub layout: Layout,
    /// Edges dropped because an endpoint id was not found.
    pub skipped_edges: usize,
}

/// Parse a graph document from a JSON string.
///
/// Duplicate node ids keep the first node. Edges whose endpoint is unknown are
/// skipped with a warning. Nodes with both `x` and `y` seed the layout.
pub fn parse_graph(json: &str) -> Result<LoadedGraph> {
    let doc: GraphDocument = serde_json::from_str(json).context("malformed graph document")?;

    let mut graph = MetadataGraph::new();
    let mut layout = Layout::new();

    for raw in doc.nodes {
        if graph.find(&raw.id).is_some() {
            warn!(id = %raw.id, "duplicate node id; keeping the first occurrence");
            continue;
        }
        let position = raw.x.zip(raw.y);
        let idx = graph.add_node(MetadataNode {
            id: raw.id,
            kind: raw.kind,
            full_name: raw.full_name,
            file_name: raw.file_name,
            namespace_prefix: raw.namespace_prefix,
            manageable_state: raw.manageable_state,
            last_modified_by_name: raw.last_modified_by_name,
            last_modified_date: raw.last_modified_date,
            created_by_name: raw.created_by_name,
            created_date: raw.created_date,
        });
        if let Some((x, y)) = position {
            layout.set_position(idx, Point::new(x, y));
        }
    }

    let mut skipped_edges = 0usize;
    for edge in doc.edges {
        match (graph.find(&edge.source), graph.find(&edge.target)) {
            (Some(source), Some(target)) => {
                graph.add_edge(source, target);
            }
            _ => {
                warn!(
                    source = %edge.source,
                    target = %edge.target,
                    "edge references an unknown node; skipping"
                );
                skipped_edges += 1;
            }
        }
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        positioned = layout.len(),
        skipped_edges,
        "graph loaded"
    );

    Ok(LoadedGraph {
        graph,
        layout,
        skipped_edges,
    })
}

/// Read and parse a graph document from disk.
pub fn load_graph(path: &Path) -> Result<LoadedGraph> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read graph document {}", path.display()))?;
    parse_graph(&json).with_context(|| format!("failed to load {}", path.display()))
}
