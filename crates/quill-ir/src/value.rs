//! Value-producing nodes.

use crate::datatype::DataType;
use crate::error::NodeError;
use crate::expr::Expr;
use crate::node::{Node, Operation};
use crate::shape::Shape;
use std::hash::{Hash, Hasher};

/// A node that produces a typed, shaped value.
///
/// Shape and type are derived from the node's own arguments on every call.
/// Implementors return `Some(self)` from [`Operation::as_value`] and
/// delegate [`Operation::to_expr`] to [`Value::materialize`].
pub trait Value: Operation {
    fn output_shape(&self) -> Shape;

    fn output_dtype(&self) -> DataType;

    /// Columnar values become column handles, everything else scalar handles.
    fn materialize(&self, node: &Node) -> Expr {
        let dtype = self.output_dtype();
        match self.output_shape() {
            Shape::Columnar => dtype.column(node),
            Shape::Scalar => dtype.scalar(node),
        }
    }
}

/// A node checked at construction to be a [`Value`].
///
/// Shape and type are read once when the wrapper is built; the node is
/// immutable, so they never go stale.
#[derive(Clone, Debug)]
pub struct ValueNode {
    node: Node,
    shape: Shape,
    dtype: DataType,
}

impl ValueNode {
    /// Check `node` for the field `field` of a `kind` node under construction.
    pub fn new(kind: &'static str, field: &'static str, node: Node) -> Result<Self, NodeError> {
        let Some(value) = node.as_value() else {
            return Err(NodeError::invalid_field(
                kind,
                field,
                "a value node",
                format!("{} node", node.kind_name()),
            ));
        };
        let (shape, dtype) = (value.output_shape(), value.output_dtype());
        Ok(ValueNode { node, shape, dtype })
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn into_node(self) -> Node {
        self.node
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn dtype(&self) -> DataType {
        self.dtype.clone()
    }
}

// Shape and type follow from the node's structure.
impl PartialEq for ValueNode {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl Eq for ValueNode {}

impl Hash for ValueNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node.hash(state);
    }
}

impl From<ValueNode> for Node {
    fn from(value: ValueNode) -> Self {
        value.node
    }
}
