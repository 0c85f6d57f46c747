use std::fmt;
use std::str::FromStr;

use crate::error::UnknownAttributeError;

/// A descriptive attribute carried by every metadata node.
///
/// These are the only keys that search, grouping and colour-coding can address.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum NodeAttribute {
    /// The node identity itself.
    Id,
    /// Metadata type, e.g. `ApexClass` or `CustomObject`.
    Type,
    /// Fully qualified API name; also the panel's display and sort key.
    FullName,
    /// Source file the component was retrieved from.
    FileName,
    NamespacePrefix,
    ManageableState,
    LastModifiedByName,
    LastModifiedDate,
    CreatedByName,
    CreatedDate,
}

impl NodeAttribute {
    /// Every attribute, in the order checkboxes and help text list them.
    pub const ALL: [NodeAttribute; 10] = [
        NodeAttribute::Type,
        NodeAttribute::FullName,
        NodeAttribute::FileName,
        NodeAttribute::NamespacePrefix,
        NodeAttribute::ManageableState,
        NodeAttribute::LastModifiedByName,
        NodeAttribute::LastModifiedDate,
        NodeAttribute::CreatedByName,
        NodeAttribute::CreatedDate,
        NodeAttribute::Id,
    ];

    /// The key as it appears in graph documents and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeAttribute::Id => "id",
            NodeAttribute::Type => "type",
            NodeAttribute::FullName => "fullName",
            NodeAttribute::FileName => "fileName",
            NodeAttribute::NamespacePrefix => "namespacePrefix",
            NodeAttribute::ManageableState => "manageableState",
            NodeAttribute::LastModifiedByName => "lastModifiedByName",
            NodeAttribute::LastModifiedDate => "lastModifiedDate",
            NodeAttribute::CreatedByName => "createdByName",
            NodeAttribute::CreatedDate => "createdDate",
        }
    }
}

impl fmt::Display for NodeAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeAttribute {
    type Err = UnknownAttributeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeAttribute::ALL
            .into_iter()
            .find(|attr| attr.as_str() == s)
            .ok_or_else(|| UnknownAttributeError(s.to_owned()))
    }
}

/// A metadata component in the dependency graph.
///
/// All descriptive attributes are free text and any of them may be missing.
/// Layout positions are not stored here; see [`crate::graph::layout::Layout`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataNode {
    pub id: String,
    pub kind: Option<String>,
    pub full_name: Option<String>,
    pub file_name: Option<String>,
    pub namespace_prefix: Option<String>,
    pub manageable_state: Option<String>,
    pub last_modified_by_name: Option<String>,
    pub last_modified_date: Option<String>,
    pub created_by_name: Option<String>,
    pub created_date: Option<String>,
}

impl MetadataNode {
    /// A node with only an identity; attributes can be filled in with struct update syntax.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Look up a string attribute by key. `None` when the node does not carry it.
    pub fn attribute(&self, attr: NodeAttribute) -> Option<&str> {
        let value = match attr {
            NodeAttribute::Id => return Some(self.id.as_str()),
            NodeAttribute::Type => &self.kind,
            NodeAttribute::FullName => &self.full_name,
            NodeAttribute::FileName => &self.file_name,
            NodeAttribute::NamespacePrefix => &self.namespace_prefix,
            NodeAttribute::ManageableState => &self.manageable_state,
            NodeAttribute::LastModifiedByName => &self.last_modified_by_name,
            NodeAttribute::LastModifiedDate => &self.last_modified_date,
            NodeAttribute::CreatedByName => &self.created_by_name,
            NodeAttribute::CreatedDate => &self.created_date,
        };
        value.as_deref()
    }

    /// Name shown in panels: the full name, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.id)
    }
}
