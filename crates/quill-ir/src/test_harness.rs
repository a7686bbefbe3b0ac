//! Fixture nodes for tests and benchmarks.
//!
//! Real leaves (table columns, literals) and real operators live in the
//! surface layer. These stand-ins are just enough to build trees.

use crate::arg::Arg;
use crate::datatype::DataType;
use crate::error::NodeError;
use crate::expr::Expr;
use crate::node::{Node, Operation};
use crate::ops::{BinaryOperator, UnaryOperator};
use crate::rules::Fields;
use crate::shape::Shape;
use crate::value::Value;
use std::borrow::Cow;
use std::sync::Arc;

const FIELD_FIELDS: &[&str] = &["name", "dtype", "shape"];

/// Leaf value with a fixed name, type and shape.
///
/// The name is part of the argument tuple, not a resolvable name:
/// only `Alias` names a value.
#[derive(Clone, Debug)]
pub struct Field {
    name: Arc<str>,
    dtype: DataType,
    shape: Shape,
}

impl Field {
    pub fn new(name: impl Into<Arc<str>>, dtype: DataType, shape: Shape) -> Node {
        Node::new(Field {
            name: name.into(),
            dtype,
            shape,
        })
    }

    pub fn scalar(name: impl Into<Arc<str>>, dtype: DataType) -> Node {
        Self::new(name, dtype, Shape::Scalar)
    }

    pub fn column(name: impl Into<Arc<str>>, dtype: DataType) -> Node {
        Self::new(name, dtype, Shape::Columnar)
    }

    pub fn from_args(args: Vec<Arg>) -> Result<Node, NodeError> {
        let mut fields = Fields::new("Field", FIELD_FIELDS, args)?;
        let name = match fields.arg("name")? {
            Arg::Str(name) => name,
            other => return Err(fields.mismatch("name", "a string", &other)),
        };
        let dtype = match fields.arg("dtype")? {
            Arg::DataType(dtype) => dtype,
            other => return Err(fields.mismatch("dtype", "a datatype", &other)),
        };
        let shape = match fields.arg("shape")? {
            Arg::Shape(shape) => shape,
            other => return Err(fields.mismatch("shape", "a shape", &other)),
        };
        Ok(Self::new(name, dtype, shape))
    }
}

impl Operation for Field {
    fn kind_name(&self) -> &'static str {
        "Field"
    }

    fn args(&self) -> Vec<Arg> {
        vec![
            Arg::Str(self.name.clone()),
            Arg::DataType(self.dtype.clone()),
            Arg::Shape(self.shape),
        ]
    }

    fn arg_names(&self) -> Vec<Cow<'static, str>> {
        FIELD_FIELDS.iter().map(|name| Cow::Borrowed(*name)).collect()
    }

    fn to_expr(&self, node: &Node) -> Expr {
        self.materialize(node)
    }

    fn rebuild(&self, args: Vec<Arg>) -> Result<Node, NodeError> {
        Field::from_args(args)
    }

    fn as_value(&self) -> Option<&dyn Value> {
        Some(self)
    }
}

impl Value for Field {
    fn output_shape(&self) -> Shape {
        self.shape
    }

    fn output_dtype(&self) -> DataType {
        self.dtype.clone()
    }
}

/// Arithmetic negation; keeps the operand type.
pub struct Negate;

impl UnaryOperator for Negate {
    const NAME: &'static str = "Negate";

    fn output_dtype(arg: &DataType) -> DataType {
        arg.clone()
    }
}

pub struct IsNull;

impl UnaryOperator for IsNull {
    const NAME: &'static str = "IsNull";

    fn output_dtype(_arg: &DataType) -> DataType {
        DataType::Boolean
    }
}

/// Addition with a simple promotion rule: equal types stay, anything
/// involving a float becomes `float64`, other mixes become `int64`.
pub struct Add;

impl BinaryOperator for Add {
    const NAME: &'static str = "Add";

    fn output_dtype(left: &DataType, right: &DataType) -> DataType {
        if left == right {
            left.clone()
        } else if left.is_floating() || right.is_floating() {
            DataType::Float64
        } else {
            DataType::Int64
        }
    }
}

pub struct Equals;

impl BinaryOperator for Equals {
    const NAME: &'static str = "Equals";

    fn output_dtype(_left: &DataType, _right: &DataType) -> DataType {
        DataType::Boolean
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_round_trips_through_its_arguments() {
        let field = Field::column("amount", DataType::Float64);
        let copy = field.copy_with(field.args()).unwrap();
        assert!(!copy.ptr_eq(&field));
        assert!(copy.equals(&field));
    }

    #[test]
    fn field_rejects_a_misplaced_shape() {
        let error = Field::from_args(vec![
            Arg::from("amount"),
            Arg::Shape(Shape::Scalar),
            Arg::DataType(DataType::Int64),
        ])
        .unwrap_err();
        assert_eq!(
            error,
            NodeError::invalid_field("Field", "dtype", "a datatype", "shape")
        );
    }

    #[test]
    fn add_promotes_mixed_operands() {
        assert_eq!(Add::output_dtype(&DataType::Int8, &DataType::Int8), DataType::Int8);
        assert_eq!(Add::output_dtype(&DataType::Int8, &DataType::Int32), DataType::Int64);
        assert_eq!(
            Add::output_dtype(&DataType::Int8, &DataType::Float32),
            DataType::Float64
        );
    }
}
