use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::graph::node::NodeAttribute;
use crate::query::search::SearchScope;

/// Name of the configuration file looked up next to the graph document.
pub const CONFIG_FILE: &str = "metagraph.toml";

/// Configuration loaded from `metagraph.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct MetagraphConfig {
    /// Node attribute used to group the panel and colour the legend (default: `type`).
    pub group_by: Option<String>,
    /// Attributes enabled for search when a session starts (default: `fullName`).
    pub search_attributes: Option<Vec<String>>,
}

/// Settings fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerSettings {
    pub group_key: NodeAttribute,
    pub search_scope: SearchScope,
}

impl Default for ExplorerSettings {
    fn default() -> Self {
        Self {
            group_key: NodeAttribute::Type,
            search_scope: [NodeAttribute::FullName].into_iter().collect(),
        }
    }
}

impl MetagraphConfig {
    /// Load configuration from `metagraph.toml` in the given directory.
    ///
    /// Returns a default (empty) configuration if the file does not exist or cannot be parsed.
    pub fn load(dir: &Path) -> Self {
        Self::load_file(&dir.join(CONFIG_FILE))
    }

    /// Load configuration from an explicit file path, with the same fallbacks as [`Self::load`].
    pub fn load_file(config_path: &Path) -> Self {
        if !config_path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(config_path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(config) => config,
                Err(err) => {
                    warn!("failed to parse {}: {err}. Using defaults.", config_path.display());
                    Self::default()
                }
            },
            Err(err) => {
                warn!("failed to read {}: {err}. Using defaults.", config_path.display());
                Self::default()
            }
        }
    }

    /// Resolve attribute names into session settings.
    ///
    /// Unknown attribute names are reported and ignored; an unknown `group_by` falls back
    /// to the default group key.
    pub fn settings(&self) -> ExplorerSettings {
        let defaults = ExplorerSettings::default();

        let group_key = match self.group_by.as_deref().map(str::parse::<NodeAttribute>) {
            None => defaults.group_key,
            Some(Ok(key)) => key,
            Some(Err(err)) => {
                warn!("group_by: {err}. Grouping by {}.", defaults.group_key);
                defaults.group_key
            }
        };

        let search_scope = match &self.search_attributes {
            None => defaults.search_scope,
            Some(names) => names
                .iter()
                .filter_map(|name| match name.parse::<NodeAttribute>() {
                    Ok(key) => Some(key),
                    Err(err) => {
                        warn!("search_attributes: {err}. Ignoring it.");
                        None
                    }
                })
                .collect(),
        };

        ExplorerSettings {
            group_key,
            search_scope,
        }
    }
}
