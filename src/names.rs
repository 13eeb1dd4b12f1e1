use std::sync::Arc;

/// A node identifier as it appears in the emitted graph description.
///
/// Built from a caller-supplied name by [`escape`]-ing it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[display("{_0}")]
pub struct NodeId(Arc<str>);

impl NodeId {
    pub fn new(name: &str) -> Self {
        Self(escape(name).into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Replaces the characters that would break an unquoted node identifier.
///
/// Only `.`, `/` and `-` are rewritten. Quotes, spaces and brackets pass through.
pub fn escape(name: &str) -> String {
    name.replace('.', "DOT")
        .replace('/', "SLASH")
        .replace('-', "HYPHEN")
}
