//! Immutable expression-node algebra for the Quill query compiler.
//!
//! Every compiler pass works on trees of [`Node`]s. A node is an immutable
//! value: its ordered argument tuple is fixed at construction and is the only
//! thing structural equality looks at. Value-producing nodes ([`Value`])
//! additionally derive an output [`Shape`] and [`DataType`] from their
//! arguments, and materialize into scalar or column [`Expr`] handles.
//!
//! Kinds provided here:
//! - [`Alias`] renames a value
//! - [`Unary`] / [`Binary`] fix shape propagation for operators
//! - [`NodeList`] groups nodes into a single argument slot
//!
//! Structural comparisons are memoized per node pair in an
//! [`EqualityCache`], safe to share between threads.

pub mod alias;
pub mod arg;
pub mod datatype;
pub mod equality;
pub mod error;
pub mod expr;
pub mod list;
pub mod node;
pub mod ops;
pub mod rules;
pub mod shape;
pub mod test_harness;
pub mod value;

pub use alias::Alias;
pub use arg::Arg;
pub use datatype::DataType;
pub use equality::{CacheStats, EqualityCache};
pub use error::NodeError;
pub use expr::{ColumnExpr, Expr, ListExpr, ScalarExpr};
pub use list::NodeList;
pub use node::{Node, NodeId, Operation};
pub use ops::{Binary, BinaryOperator, Unary, UnaryOperator};
pub use shape::Shape;
pub use value::{Value, ValueNode};
