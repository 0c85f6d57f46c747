use std::collections::BTreeSet;

use regex::RegexBuilder;

use crate::error::InvalidPatternError;
use crate::graph::MetadataGraph;
use crate::graph::node::NodeAttribute;
use crate::selection::SelectionSet;

/// The attribute keys currently enabled for search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchScope {
    keys: BTreeSet<NodeAttribute>,
}

impl SearchScope {
    /// A scope with no keys enabled. Searching it always yields nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every attribute enabled.
    pub fn all() -> Self {
        NodeAttribute::ALL.into_iter().collect()
    }

    pub fn contains(&self, key: NodeAttribute) -> bool {
        self.keys.contains(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn is_all(&self) -> bool {
        self.keys.len() == NodeAttribute::ALL.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = NodeAttribute> + '_ {
        self.keys.iter().copied()
    }
}

impl FromIterator<NodeAttribute> for SearchScope {
    fn from_iter<I: IntoIterator<Item = NodeAttribute>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

/// Checkbox policy for the search attribute list.
///
/// A plain click flips `clicked`. A click with the modifier held switches the whole
/// list: everything off when everything was on, otherwise everything on.
pub fn toggle_scope(current: &SearchScope, clicked: NodeAttribute, modifier_held: bool) -> SearchScope {
    if modifier_held {
        return if current.is_all() {
            SearchScope::empty()
        } else {
            SearchScope::all()
        };
    }

    let mut next = current.clone();
    if !next.keys.remove(&clicked) {
        next.keys.insert(clicked);
    }
    next
}

/// Find nodes where any attribute in `scope` contains a match for `pattern`.
///
/// The pattern is a case-insensitive regex matched anywhere in the value (not anchored).
/// Attributes a node does not carry never match. An empty scope returns an empty
/// selection without looking at the pattern.
pub fn search_attributes(
    graph: &MetadataGraph,
    pattern: &str,
    scope: &SearchScope,
) -> Result<SelectionSet, InvalidPatternError> {
    if scope.is_empty() {
        return Ok(SelectionSet::new());
    }

    let re = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| InvalidPatternError {
            pattern: pattern.to_owned(),
            source,
        })?;

    let matches = graph
        .nodes()
        .filter(|(_, node)| {
            scope
                .keys()
                .filter_map(|key| node.attribute(key))
                .any(|value| re.is_match(value))
        })
        .map(|(idx, _)| idx)
        .collect();

    Ok(matches)
}
