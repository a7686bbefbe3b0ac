use std::borrow::Cow;
use std::fmt;

/// Error returned by node construction, name resolution and comparison.
///
/// Every variant is raised at the point of violation; nothing in this crate
/// retries or recovers partially. A failed constructor never yields a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// A field value failed its declared rule ("invalid field value").
    InvalidField {
        /// Kind of the node being constructed.
        node: &'static str,
        /// Field name, or `<args>` when the argument count is wrong.
        field: Cow<'static, str>,
        /// What the rule accepts.
        expected: Cow<'static, str>,
        /// What was passed instead.
        found: String,
    },
    /// `resolve_name()` on a node kind that carries no name.
    NotNamed { node: &'static str },
    /// `try_equals()` against an argument that is not a node.
    InvalidComparison { found: &'static str },
    /// `NodeList::at()` outside `0..len`.
    IndexOutOfRange { index: usize, len: usize },
}

impl NodeError {
    pub(crate) fn invalid_field(
        node: &'static str,
        field: impl Into<Cow<'static, str>>,
        expected: impl Into<Cow<'static, str>>,
        found: impl Into<String>,
    ) -> Self {
        NodeError::InvalidField {
            node,
            field: field.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// True for errors produced by field validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, NodeError::InvalidField { .. })
    }
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeError::InvalidField {
                node,
                field,
                expected,
                found,
            } => write!(
                f,
                "invalid field value for {node}.{field}: expected {expected}, found {found}"
            ),
            NodeError::NotNamed { node } => write!(f, "expression is not named: {node}"),
            NodeError::InvalidComparison { found } => {
                write!(f, "invalid equality comparison between Node and {found}")
            }
            NodeError::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for NodeList of length {len}")
            }
        }
    }
}

impl std::error::Error for NodeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_field() {
        let error = NodeError::invalid_field("Alias", "name", "a string or None", "int");
        assert_eq!(
            error.to_string(),
            "invalid field value for Alias.name: expected a string or None, found int"
        );
        assert!(error.is_validation());
    }

    #[test]
    fn not_named_is_not_a_validation_error() {
        let error = NodeError::NotNamed { node: "Unary" };
        assert!(!error.is_validation());
        assert_eq!(error.to_string(), "expression is not named: Unary");
    }
}
