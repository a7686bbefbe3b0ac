//! Generic unary and binary value shapes.
//!
//! Concrete operators plug in through [`UnaryOperator`] / [`BinaryOperator`]
//! and supply only their name and type rule. Shape propagation is fixed here:
//! a unary result has its operand's shape, a binary result is columnar if
//! either operand is.
//!
//! ```ignore
//! struct Negate;
//!
//! impl UnaryOperator for Negate {
//!     const NAME: &'static str = "Negate";
//!
//!     fn output_dtype(arg: &DataType) -> DataType {
//!         arg.clone()
//!     }
//! }
//!
//! let node = Unary::<Negate>::new(column)?;
//! ```

use crate::arg::Arg;
use crate::datatype::DataType;
use crate::error::NodeError;
use crate::expr::Expr;
use crate::node::{Node, Operation};
use crate::rules::Fields;
use crate::shape::Shape;
use crate::value::{Value, ValueNode};
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

const UNARY_FIELDS: &[&str] = &["arg"];
const BINARY_FIELDS: &[&str] = &["left", "right"];

pub trait UnaryOperator: 'static {
    const NAME: &'static str;

    fn output_dtype(arg: &DataType) -> DataType;
}

pub trait BinaryOperator: 'static {
    const NAME: &'static str;

    fn output_dtype(left: &DataType, right: &DataType) -> DataType;
}

/// Single-operand value. Its kind is the operator `O`.
pub struct Unary<O> {
    arg: ValueNode,
    operator: PhantomData<fn() -> O>,
}

impl<O: UnaryOperator> Unary<O> {
    pub fn new(arg: Node) -> Result<Node, NodeError> {
        let arg = ValueNode::new(O::NAME, "arg", arg)?;
        Ok(Node::new(Self::from_value(arg)))
    }

    pub fn from_args(args: Vec<Arg>) -> Result<Node, NodeError> {
        let mut fields = Fields::new(O::NAME, UNARY_FIELDS, args)?;
        let arg = fields.value("arg")?;
        Ok(Node::new(Self::from_value(arg)))
    }

    fn from_value(arg: ValueNode) -> Self {
        Unary {
            arg,
            operator: PhantomData,
        }
    }

    pub fn arg(&self) -> &Node {
        self.arg.node()
    }
}

impl<O> Clone for Unary<O> {
    fn clone(&self) -> Self {
        Unary {
            arg: self.arg.clone(),
            operator: PhantomData,
        }
    }
}

impl<O: UnaryOperator> fmt::Debug for Unary<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(O::NAME).field("arg", self.arg.node()).finish()
    }
}

impl<O: UnaryOperator> Operation for Unary<O> {
    fn kind_name(&self) -> &'static str {
        O::NAME
    }

    fn args(&self) -> Vec<Arg> {
        vec![Arg::Node(self.arg.node().clone())]
    }

    fn arg_names(&self) -> Vec<Cow<'static, str>> {
        UNARY_FIELDS.iter().map(|name| Cow::Borrowed(*name)).collect()
    }

    fn to_expr(&self, node: &Node) -> Expr {
        self.materialize(node)
    }

    fn rebuild(&self, args: Vec<Arg>) -> Result<Node, NodeError> {
        Self::from_args(args)
    }

    fn as_value(&self) -> Option<&dyn Value> {
        Some(self)
    }
}

impl<O: UnaryOperator> Value for Unary<O> {
    fn output_shape(&self) -> Shape {
        self.arg.shape()
    }

    fn output_dtype(&self) -> DataType {
        O::output_dtype(&self.arg.dtype())
    }
}

/// Two-operand value. Its kind is the operator `O`.
pub struct Binary<O> {
    left: ValueNode,
    right: ValueNode,
    operator: PhantomData<fn() -> O>,
}

impl<O: BinaryOperator> Binary<O> {
    pub fn new(left: Node, right: Node) -> Result<Node, NodeError> {
        let left = ValueNode::new(O::NAME, "left", left)?;
        let right = ValueNode::new(O::NAME, "right", right)?;
        Ok(Node::new(Self::from_values(left, right)))
    }

    pub fn from_args(args: Vec<Arg>) -> Result<Node, NodeError> {
        let mut fields = Fields::new(O::NAME, BINARY_FIELDS, args)?;
        let left = fields.value("left")?;
        let right = fields.value("right")?;
        Ok(Node::new(Self::from_values(left, right)))
    }

    fn from_values(left: ValueNode, right: ValueNode) -> Self {
        Binary {
            left,
            right,
            operator: PhantomData,
        }
    }

    pub fn left(&self) -> &Node {
        self.left.node()
    }

    pub fn right(&self) -> &Node {
        self.right.node()
    }
}

impl<O> Clone for Binary<O> {
    fn clone(&self) -> Self {
        Binary {
            left: self.left.clone(),
            right: self.right.clone(),
            operator: PhantomData,
        }
    }
}

impl<O: BinaryOperator> fmt::Debug for Binary<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(O::NAME)
            .field("left", self.left.node())
            .field("right", self.right.node())
            .finish()
    }
}

impl<O: BinaryOperator> Operation for Binary<O> {
    fn kind_name(&self) -> &'static str {
        O::NAME
    }

    fn args(&self) -> Vec<Arg> {
        vec![
            Arg::Node(self.left.node().clone()),
            Arg::Node(self.right.node().clone()),
        ]
    }

    fn arg_names(&self) -> Vec<Cow<'static, str>> {
        BINARY_FIELDS.iter().map(|name| Cow::Borrowed(*name)).collect()
    }

    fn to_expr(&self, node: &Node) -> Expr {
        self.materialize(node)
    }

    fn rebuild(&self, args: Vec<Arg>) -> Result<Node, NodeError> {
        Self::from_args(args)
    }

    fn as_value(&self) -> Option<&dyn Value> {
        Some(self)
    }
}

impl<O: BinaryOperator> Value for Binary<O> {
    fn output_shape(&self) -> Shape {
        self.left.shape().combine(self.right.shape())
    }

    fn output_dtype(&self) -> DataType {
        O::output_dtype(&self.left.dtype(), &self.right.dtype())
    }
}
