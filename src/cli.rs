use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Explore a metadata dependency graph from the command line.
///
/// metagraph loads a graph document (nodes with descriptive attributes and optional
/// layout positions, plus source/target edges) and runs the same selection operations
/// the interactive viewer uses: box select, regex search, neighbour expansion and the
/// grouped selection panel.
#[derive(Parser, Debug)]
#[command(
    name = "metagraph",
    version,
    about,
    long_about = None,
    propagate_version = true,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for selection listings.
#[derive(Clone, Debug, ValueEnum, Default)]
pub enum OutputFormat {
    /// Compact one-line-per-node format (default).
    #[default]
    Compact,
    /// Human-readable columnar table with optional ANSI color when stdout is a terminal.
    Table,
    /// Structured JSON suitable for programmatic consumption.
    Json,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Graph document to load (JSON with `nodes` and `edges`).
    pub graph: PathBuf,

    /// Group the selection by this node attribute (overrides `group_by` in metagraph.toml).
    #[arg(long)]
    pub group_by: Option<String>,

    /// Configuration file (default: metagraph.toml next to the graph document).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Compact)]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Select nodes whose attributes match a regex (case-insensitive, substring match).
    Search {
        /// Regex pattern (e.g. "Account" or "^Opp.*Trigger$").
        pattern: String,

        #[command(flatten)]
        common: CommonArgs,

        /// Attributes to search (comma-separated: type,fullName,fileName,namespacePrefix,
        /// manageableState,lastModifiedByName,lastModifiedDate,createdByName,createdDate,id).
        /// Defaults to `search_attributes` from metagraph.toml.
        #[arg(long, value_delimiter = ',')]
        attr: Vec<String>,
    },

    /// Select the nodes inside a dragged box, given in screen coordinates.
    ///
    /// Node positions come from the `x`/`y` fields of the graph document.
    SelectBox {
        #[command(flatten)]
        common: CommonArgs,

        /// Corner where the drag started, as X,Y.
        #[arg(long, value_parser = parse_pair, allow_hyphen_values = true)]
        from: (f64, f64),

        /// Corner where the drag ended, as X,Y.
        #[arg(long, value_parser = parse_pair, allow_hyphen_values = true)]
        to: (f64, f64),

        /// View pan as TX,TY.
        #[arg(long, value_parser = parse_pair, allow_hyphen_values = true, default_value = "0,0")]
        translate: (f64, f64),

        /// View zoom factor (must be positive).
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
    },

    /// Grow a selection by its graph neighbours.
    Expand {
        #[command(flatten)]
        common: CommonArgs,

        /// Node ids to start from (comma-separated).
        #[arg(long, value_delimiter = ',', required = true)]
        select: Vec<String>,

        /// Number of expansion steps.
        #[arg(long, default_value_t = 1)]
        steps: usize,
    },

    /// Drop selected nodes that have no selected neighbour.
    Contract {
        #[command(flatten)]
        common: CommonArgs,

        /// Node ids forming the selection (comma-separated).
        #[arg(long, value_delimiter = ',', required = true)]
        select: Vec<String>,
    },

    /// List every group of the graph with its size and legend colour.
    Legend {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Replay recorded UI events (JSON Lines) through a session and print the final panel.
    Replay {
        #[command(flatten)]
        common: CommonArgs,

        /// Event file, one JSON event per line.
        events: PathBuf,
    },
}

/// Parse `X,Y` into a pair of numbers.
fn parse_pair(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{s}'"))?;
    let x = x
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid X in '{s}': {e}"))?;
    let y = y
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid Y in '{s}': {e}"))?;
    Ok((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        assert_eq!(parse_pair("10,-2.5"), Ok((10.0, -2.5)));
        assert_eq!(parse_pair(" 1 , 2 "), Ok((1.0, 2.0)));
        assert!(parse_pair("10").is_err());
        assert!(parse_pair("a,1").is_err());
    }

    #[test]
    fn test_cli_parses_select_box() {
        let cli = Cli::try_parse_from([
            "metagraph",
            "select-box",
            "graph.json",
            "--from",
            "-10,5",
            "--to",
            "40,60",
            "--scale",
            "2",
        ])
        .unwrap();
        match cli.command {
            Commands::SelectBox {
                from,
                to,
                translate,
                scale,
                common,
            } => {
                assert_eq!(from, (-10.0, 5.0));
                assert_eq!(to, (40.0, 60.0));
                assert_eq!(translate, (0.0, 0.0));
                assert_eq!(scale, 2.0);
                assert_eq!(common.graph, PathBuf::from("graph.json"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_parses_search_attributes() {
        let cli = Cli::try_parse_from([
            "metagraph", "search", "Account", "g.json", "--attr", "fullName,type",
        ])
        .unwrap();
        match cli.command {
            Commands::Search { pattern, attr, .. } => {
                assert_eq!(pattern, "Account");
                assert_eq!(attr, vec!["fullName", "type"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
