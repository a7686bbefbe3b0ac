//! User-facing expression handles.
//!
//! A handle pairs a node with what the surface layer needs to know about it:
//! its shape (by handle kind) and, for values, its type. Handles are built by
//! `DataType::scalar` / `DataType::column` and by `NodeList`; nodes decide
//! which one they become through `Node::to_expr`.

use crate::alias::Alias;
use crate::datatype::DataType;
use crate::error::NodeError;
use crate::list::NodeList;
use crate::node::Node;
use crate::shape::Shape;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub enum Expr {
    Scalar(ScalarExpr),
    Column(ColumnExpr),
    List(ListExpr),
}

#[derive(Clone, Debug)]
pub struct ScalarExpr {
    node: Node,
    dtype: DataType,
}

impl ScalarExpr {
    pub fn new(node: Node, dtype: DataType) -> Self {
        Self { node, dtype }
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn dtype(&self) -> &DataType {
        &self.dtype
    }
}

#[derive(Clone, Debug)]
pub struct ColumnExpr {
    node: Node,
    dtype: DataType,
}

impl ColumnExpr {
    pub fn new(node: Node, dtype: DataType) -> Self {
        Self { node, dtype }
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn dtype(&self) -> &DataType {
        &self.dtype
    }
}

#[derive(Clone, Debug)]
pub struct ListExpr {
    node: Node,
    list: NodeList,
}

impl ListExpr {
    pub(crate) fn new(node: Node, list: NodeList) -> Self {
        Self { node, list }
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn values(&self) -> &NodeList {
        &self.list
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Member `index` materialized as its own handle.
    pub fn expr_at(&self, index: usize) -> Result<Expr, NodeError> {
        Ok(self.list.at(index)?.to_expr())
    }
}

impl Expr {
    pub fn node(&self) -> &Node {
        match self {
            Expr::Scalar(expr) => expr.node(),
            Expr::Column(expr) => expr.node(),
            Expr::List(expr) => expr.node(),
        }
    }

    /// Type of a scalar or column handle. Lists have none.
    pub fn dtype(&self) -> Option<&DataType> {
        match self {
            Expr::Scalar(expr) => Some(expr.dtype()),
            Expr::Column(expr) => Some(expr.dtype()),
            Expr::List(_) => None,
        }
    }

    pub fn shape(&self) -> Option<Shape> {
        match self {
            Expr::Scalar(_) => Some(Shape::Scalar),
            Expr::Column(_) => Some(Shape::Columnar),
            Expr::List(_) => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Expr::Scalar(_))
    }

    pub fn is_column(&self) -> bool {
        matches!(self, Expr::Column(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Expr::List(_))
    }

    pub fn as_list(&self) -> Option<&ListExpr> {
        match self {
            Expr::List(expr) => Some(expr),
            _ => None,
        }
    }

    pub fn get_name(&self) -> Result<Option<Arc<str>>, NodeError> {
        self.node().resolve_name()
    }

    pub fn has_name(&self) -> bool {
        self.node().has_resolved_name()
    }

    /// The same value known under `name`.
    pub fn name(&self, name: impl Into<Arc<str>>) -> Result<Expr, NodeError> {
        Ok(Alias::new(self.node().clone(), name)?.to_expr())
    }

    /// Structural equality of the underlying nodes.
    pub fn equals(&self, other: &Expr) -> bool {
        self.node().equals(other.node())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Scalar(expr) => write!(f, "{}: scalar<{}>", expr.node, expr.dtype),
            Expr::Column(expr) => write!(f, "{}: column<{}>", expr.node, expr.dtype),
            Expr::List(expr) => write!(f, "{}: list[{}]", expr.node, expr.len()),
        }
    }
}
