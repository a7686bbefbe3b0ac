use crate::arg::Arg;
use crate::datatype::DataType;
use crate::error::NodeError;
use crate::expr::Expr;
use crate::node::{Node, Operation};
use crate::rules::Fields;
use crate::shape::Shape;
use crate::value::{Value, ValueNode};
use std::borrow::Cow;
use std::sync::Arc;

const FIELDS: &[&str] = &["arg", "name"];

/// Renames a value without touching its shape or type.
///
/// `name` is `None` for an alias that is deliberately unnamed.
#[derive(Clone, Debug)]
pub struct Alias {
    arg: ValueNode,
    name: Option<Arc<str>>,
}

impl Alias {
    pub fn new(arg: Node, name: impl Into<Arc<str>>) -> Result<Node, NodeError> {
        Self::build(arg, Some(name.into()))
    }

    pub fn unnamed(arg: Node) -> Result<Node, NodeError> {
        Self::build(arg, None)
    }

    pub fn from_args(args: Vec<Arg>) -> Result<Node, NodeError> {
        let mut fields = Fields::new("Alias", FIELDS, args)?;
        let arg = fields.value("arg")?;
        let name = fields.name("name")?;
        Ok(Node::new(Alias { arg, name }))
    }

    fn build(arg: Node, name: Option<Arc<str>>) -> Result<Node, NodeError> {
        let arg = ValueNode::new("Alias", "arg", arg)?;
        Ok(Node::new(Alias { arg, name }))
    }

    pub fn arg(&self) -> &Node {
        self.arg.node()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Operation for Alias {
    fn kind_name(&self) -> &'static str {
        "Alias"
    }

    fn args(&self) -> Vec<Arg> {
        vec![Arg::Node(self.arg.node().clone()), self.name.clone().into()]
    }

    fn arg_names(&self) -> Vec<Cow<'static, str>> {
        FIELDS.iter().map(|name| Cow::Borrowed(*name)).collect()
    }

    fn to_expr(&self, node: &Node) -> Expr {
        self.materialize(node)
    }

    fn rebuild(&self, args: Vec<Arg>) -> Result<Node, NodeError> {
        Alias::from_args(args)
    }

    fn as_value(&self) -> Option<&dyn Value> {
        Some(self)
    }

    fn resolve_name(&self) -> Result<Option<Arc<str>>, NodeError> {
        Ok(self.name.clone())
    }

    fn has_resolved_name(&self) -> bool {
        true
    }
}

impl Value for Alias {
    fn output_shape(&self) -> Shape {
        self.arg.shape()
    }

    fn output_dtype(&self) -> DataType {
        self.arg.dtype()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::NodeList;
    use crate::test_harness::Field;

    #[test]
    fn passes_shape_and_type_through() {
        let y = Field::column("y", DataType::Int64);
        let alias = Alias::new(y.clone(), "y2").unwrap();
        let value = alias.as_value().unwrap();
        assert_eq!(value.output_shape(), Shape::Columnar);
        assert_eq!(value.output_dtype(), DataType::Int64);
        assert_eq!(alias.resolve_name().unwrap().as_deref(), Some("y2"));
        assert!(alias.has_resolved_name());
    }

    #[test]
    fn unnamed_alias_still_resolves() {
        let alias = Alias::unnamed(Field::scalar("x", DataType::Boolean)).unwrap();
        assert!(alias.has_resolved_name());
        assert_eq!(alias.resolve_name(), Ok(None));
    }

    #[test]
    fn rejects_a_non_string_name() {
        let x = Field::scalar("x", DataType::Int64);
        let error = Alias::from_args(vec![Arg::from(x), Arg::Int(7)]).unwrap_err();
        assert!(error.is_validation());
        assert_eq!(
            error,
            NodeError::invalid_field("Alias", "name", "a string or None", "int")
        );
    }

    #[test]
    fn rejects_a_non_value_argument() {
        let list = NodeList::new([]).into_node();
        assert!(Alias::new(list, "l").unwrap_err().is_validation());
    }

    #[test]
    fn copy_with_builds_a_new_alias() {
        let x = Field::scalar("x", DataType::Int64);
        let alias = Alias::new(x.clone(), "a").unwrap();
        let renamed = alias.copy_with(vec![Arg::from(&x), Arg::from("b")]).unwrap();
        assert!(!renamed.ptr_eq(&alias));
        assert_eq!(renamed.resolve_name().unwrap().as_deref(), Some("b"));
        assert_eq!(alias.resolve_name().unwrap().as_deref(), Some("a"));
        assert!(!renamed.equals(&alias));
        assert!(renamed.copy_with(vec![Arg::from(&x), Arg::from("a")]).unwrap().equals(&alias));
    }

    #[test]
    fn to_expr_keeps_the_alias_node() {
        let alias = Alias::new(Field::column("c", DataType::String), "d").unwrap();
        let expr = alias.to_expr();
        assert!(expr.is_column());
        assert!(expr.node().ptr_eq(&alias));
        assert_eq!(expr.get_name().unwrap().as_deref(), Some("d"));
    }
}
