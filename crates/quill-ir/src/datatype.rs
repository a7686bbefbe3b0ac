//! Semantic types carried by value expressions.
//!
//! The type domain itself belongs to the surface layer. Nodes only need to
//! report a type and hand themselves to the type's handle factories
//! (`scalar` / `column`) when they are materialized.

use crate::expr::{ColumnExpr, Expr, ScalarExpr};
use crate::node::Node;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Null,
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    Date,
    Timestamp,
    Array(Box<DataType>),
}

impl DataType {
    pub fn array(element: DataType) -> Self {
        DataType::Array(Box::new(element))
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64
        )
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, DataType::Float32 | DataType::Float64)
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_floating()
    }

    /// Wrap `node` in a scalar expression handle of this type.
    pub fn scalar(&self, node: &Node) -> Expr {
        Expr::Scalar(ScalarExpr::new(node.clone(), self.clone()))
    }

    /// Wrap `node` in a column expression handle of this type.
    pub fn column(&self, node: &Node) -> Expr {
        Expr::Column(ColumnExpr::new(node.clone(), self.clone()))
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Null => "null",
            DataType::Boolean => "boolean",
            DataType::Int8 => "int8",
            DataType::Int16 => "int16",
            DataType::Int32 => "int32",
            DataType::Int64 => "int64",
            DataType::Float32 => "float32",
            DataType::Float64 => "float64",
            DataType::String => "string",
            DataType::Date => "date",
            DataType::Timestamp => "timestamp",
            DataType::Array(element) => return write!(f, "array<{element}>"),
        };
        f.write_str(name)
    }
}
