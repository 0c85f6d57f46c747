use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use metagraph_explorer::cli::{Cli, Commands, CommonArgs, OutputFormat};
use metagraph_explorer::config::{ExplorerSettings, MetagraphConfig};
use metagraph_explorer::geometry::{Point, Rect, Transform, to_graph_space};
use metagraph_explorer::graph::MetadataGraph;
use metagraph_explorer::graph::node::NodeAttribute;
use metagraph_explorer::loader::{LoadedGraph, load_graph};
use metagraph_explorer::query::grouping::{legend, project_groups};
use metagraph_explorer::query::output::{format_legend, format_selection};
use metagraph_explorer::query::search::{SearchScope, search_attributes};
use metagraph_explorer::query::spatial::select_in_rect;
use metagraph_explorer::selection::SelectionSet;
use metagraph_explorer::selection::store::SelectionStore;
use metagraph_explorer::session::{InputEvent, Session};

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            pattern,
            common,
            attr,
        } => {
            let (loaded, settings) = open(&common)?;
            let scope = if attr.is_empty() {
                settings.search_scope.clone()
            } else {
                attr.iter()
                    .map(|key| key.parse::<NodeAttribute>())
                    .collect::<Result<SearchScope, _>>()?
            };
            let hits = search_attributes(&loaded.graph, &pattern, &scope)?;
            print_selection(&loaded.graph, &settings, &hits, &common.format);
        }

        Commands::SelectBox {
            common,
            from,
            to,
            translate,
            scale,
        } => {
            if scale.is_nan() || scale <= 0.0 {
                bail!("--scale must be positive, got {scale}");
            }
            let (loaded, settings) = open(&common)?;
            if loaded.layout.is_empty() {
                warn!("the graph document carries no node positions; nothing can be box-selected");
            }
            let transform = Transform::new(translate.0, translate.1, scale);
            let pointer = Rect::from_corners(Point::new(from.0, from.1), Point::new(to.0, to.1));
            let rect = to_graph_space(pointer, &transform);
            info!(?rect, "selecting graph-space box");
            let hits = select_in_rect(&loaded.graph, &loaded.layout, &rect);
            print_selection(&loaded.graph, &settings, &hits, &common.format);
        }

        Commands::Expand {
            common,
            select,
            steps,
        } => {
            let (loaded, settings) = open(&common)?;
            let start = resolve_ids(&loaded.graph, &select)?;
            let graph = Arc::new(loaded.graph);
            let mut store = SelectionStore::new(Arc::clone(&graph), settings.group_key);
            store.replace(start);
            for step in 1..=steps {
                let before = store.selection().len();
                store.expand();
                if store.selection().len() == before {
                    info!(step, "selection stopped growing");
                    break;
                }
            }
            print_selection(&graph, &settings, store.selection(), &common.format);
        }

        Commands::Contract { common, select } => {
            let (loaded, settings) = open(&common)?;
            let start = resolve_ids(&loaded.graph, &select)?;
            let graph = Arc::new(loaded.graph);
            let mut store = SelectionStore::new(Arc::clone(&graph), settings.group_key);
            store.replace(start);
            store.contract();
            print_selection(&graph, &settings, store.selection(), &common.format);
        }

        Commands::Legend { common } => {
            let (loaded, settings) = open(&common)?;
            let entries = legend(&loaded.graph, settings.group_key);
            print!("{}", format_legend(&entries, settings.group_key, &common.format));
        }

        Commands::Replay { common, events } => {
            let (loaded, settings) = open(&common)?;
            let script = std::fs::read_to_string(&events)
                .with_context(|| format!("failed to read event file {}", events.display()))?;

            let graph = Arc::new(loaded.graph);
            let mut session = Session::new(Arc::clone(&graph), loaded.layout, settings.clone());
            session.store_mut().subscribe(|update| {
                info!(
                    selected = update.render.nodes.len(),
                    edges = update.render.edges.len(),
                    groups = update.groups.groups.len(),
                    "selection updated"
                );
            });

            let (mut applied, mut rejected) = (0usize, 0usize);
            for (n, line) in script.lines().enumerate() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let result = serde_json::from_str::<InputEvent>(line)
                    .map_err(anyhow::Error::from)
                    .and_then(|event| session.handle(event).map_err(anyhow::Error::from));
                match result {
                    Ok(()) => applied += 1,
                    Err(err) => {
                        warn!(line = n + 1, "event rejected: {err}");
                        rejected += 1;
                    }
                }
            }
            info!(applied, rejected, "replay finished");

            print_selection(&graph, &settings, session.store().selection(), &common.format);
        }
    }

    Ok(())
}

/// Diagnostics go to stderr so stdout stays clean for JSON consumers.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("METAGRAPH_LOG").unwrap_or_else(|_| {
            // Our own crates at info, everything else at warn
            "metagraph=info,metagraph_explorer=info,warn".into()
        }))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

/// Load the graph and resolve session settings from config and command-line overrides.
fn open(common: &CommonArgs) -> Result<(LoadedGraph, ExplorerSettings)> {
    let loaded = load_graph(&common.graph)?;

    let config = match &common.config {
        Some(path) => {
            if !path.exists() {
                bail!("config file {} not found", path.display());
            }
            MetagraphConfig::load_file(path)
        }
        None => MetagraphConfig::load(common.graph.parent().unwrap_or(Path::new("."))),
    };
    let mut settings = config.settings();
    if let Some(key) = &common.group_by {
        settings.group_key = key.parse()?;
    }

    info!(
        nodes = loaded.graph.node_count(),
        edges = loaded.graph.edge_count(),
        group_by = %settings.group_key,
        "loaded {}",
        common.graph.display()
    );
    Ok((loaded, settings))
}

/// Map node ids from the command line to node indices.
fn resolve_ids(graph: &MetadataGraph, ids: &[String]) -> Result<SelectionSet> {
    ids.iter()
        .map(|id| {
            graph
                .find(id)
                .with_context(|| format!("no node with id '{id}' in the graph"))
        })
        .collect()
}

/// Print the selection as the panel shows it: grouped, groups in legend order.
fn print_selection(
    graph: &MetadataGraph,
    settings: &ExplorerSettings,
    selection: &SelectionSet,
    format: &OutputFormat,
) {
    let grouped = project_groups(graph, selection, settings.group_key)
        .in_legend_order(&legend(graph, settings.group_key));
    print!(
        "{}",
        format_selection(graph, &grouped, settings.group_key, format)
    );
}
