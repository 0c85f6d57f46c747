/// A search pattern that does not compile as a regular expression.
///
/// Search is all-or-nothing: when this is returned no selection state has changed.
#[derive(Debug, thiserror::Error)]
#[error("invalid search pattern '{pattern}': {source}")]
pub struct InvalidPatternError {
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

/// A key that does not name any node attribute.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown node attribute '{0}' (expected one of: type, fullName, fileName, namespacePrefix, manageableState, lastModifiedByName, lastModifiedDate, createdByName, createdDate, id)")]
pub struct UnknownAttributeError(pub String);

/// Failure while applying one input event to a session.
///
/// None of these end the session; the event is dropped and the view stays interactive.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    InvalidPattern(#[from] InvalidPatternError),
    #[error(transparent)]
    UnknownAttribute(#[from] UnknownAttributeError),
    #[error("no node with id '{0}' in the loaded graph")]
    UnknownNode(String),
    #[error("view scale must be positive, got {0}")]
    InvalidScale(f64),
}
