//! Field rules for building nodes from raw argument tuples.
//!
//! Typed constructors (`Alias::new`, `Unary::new`, ...) check what the type
//! system cannot. Rewriting passes work on untyped `Vec<Arg>` tuples instead
//! and go through these rules, which coerce each positional argument to its
//! declared field type or fail with `NodeError::InvalidField`.

use crate::arg::Arg;
use crate::error::NodeError;
use crate::node::Node;
use crate::value::ValueNode;
use std::sync::Arc;

/// Positional reader over an argument tuple for one node kind.
pub struct Fields {
    kind: &'static str,
    args: std::vec::IntoIter<Arg>,
}

impl Fields {
    /// Start reading `args` for a `kind` node declaring `names`, in order.
    pub fn new(
        kind: &'static str,
        names: &[&'static str],
        args: Vec<Arg>,
    ) -> Result<Self, NodeError> {
        if args.len() != names.len() {
            return Err(NodeError::invalid_field(
                kind,
                "<args>",
                format!("{} arguments ({})", names.len(), names.join(", ")),
                format!("{} arguments", args.len()),
            ));
        }
        Ok(Self {
            kind,
            args: args.into_iter(),
        })
    }

    /// The next argument, unchecked.
    pub fn arg(&mut self, field: &'static str) -> Result<Arg, NodeError> {
        self.args
            .next()
            .ok_or_else(|| NodeError::invalid_field(self.kind, field, "an argument", "nothing"))
    }

    pub(crate) fn mismatch(
        &self,
        field: &'static str,
        expected: &'static str,
        found: &Arg,
    ) -> NodeError {
        NodeError::invalid_field(self.kind, field, expected, found.type_name())
    }

    /// Any existing node.
    pub fn node(&mut self, field: &'static str) -> Result<Node, NodeError> {
        match self.arg(field)? {
            Arg::Node(node) => Ok(node),
            other => Err(self.mismatch(field, "a node", &other)),
        }
    }

    /// A value-producing node.
    pub fn value(&mut self, field: &'static str) -> Result<ValueNode, NodeError> {
        let node = self.node(field)?;
        ValueNode::new(self.kind, field, node)
    }

    /// A string, or `None` for the unnamed marker.
    pub fn name(&mut self, field: &'static str) -> Result<Option<Arc<str>>, NodeError> {
        match self.arg(field)? {
            Arg::Str(name) => Ok(Some(name)),
            Arg::None => Ok(None),
            other => Err(self.mismatch(field, "a string or None", &other)),
        }
    }
}

/// Every entry must be a node. Used for variadic node groups.
pub fn nodes(
    kind: &'static str,
    field: &'static str,
    args: impl IntoIterator<Item = Arg>,
) -> Result<Vec<Node>, NodeError> {
    args.into_iter()
        .enumerate()
        .map(|(index, arg)| match arg {
            Arg::Node(node) => Ok(node),
            other => Err(NodeError::invalid_field(
                kind,
                format!("{field}[{index}]"),
                "a node",
                other.type_name(),
            )),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DataType;
    use crate::test_harness::Field;

    #[test]
    fn arity_mismatch_lists_declared_fields() {
        let error = Fields::new("Alias", &["arg", "name"], vec![Arg::None]).err().unwrap();
        assert_eq!(
            error,
            NodeError::invalid_field("Alias", "<args>", "2 arguments (arg, name)", "1 arguments")
        );
    }

    #[test]
    fn name_accepts_strings_and_none_only() {
        let mut fields = Fields::new(
            "Alias",
            &["a", "b", "c"],
            vec![Arg::from("x"), Arg::None, Arg::Int(3)],
        )
        .unwrap();
        assert_eq!(fields.name("a").unwrap().as_deref(), Some("x"));
        assert_eq!(fields.name("b").unwrap(), None);
        assert_eq!(
            fields.name("c").unwrap_err(),
            NodeError::invalid_field("Alias", "c", "a string or None", "int")
        );
    }

    #[test]
    fn nodes_points_at_the_bad_entry() {
        let args = vec![Arg::from(Field::scalar("a", DataType::Int64)), Arg::from("oops")];
        assert_eq!(
            nodes("NodeList", "values", args).unwrap_err(),
            NodeError::invalid_field("NodeList", "values[1]", "a node", "str")
        );
    }
}
