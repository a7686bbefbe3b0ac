//! Output shape of a value-producing node.
//!
//! A value is either a single scalar or a column of values. The two shapes
//! are totally ordered, `Scalar < Columnar`, and combining operands follows
//! the broadcasting rule: a scalar mixed with a column yields a column.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Scalar,
    Columnar,
}

impl Shape {
    /// Shape of a result computed from operands of shapes `self` and `other`.
    pub fn combine(self, other: Shape) -> Shape {
        match (self, other) {
            (Shape::Scalar, Shape::Scalar) => Shape::Scalar,
            _ => Shape::Columnar,
        }
    }

    /// Combine any number of operand shapes. No operands means scalar.
    pub fn combine_all(shapes: impl IntoIterator<Item = Shape>) -> Shape {
        shapes.into_iter().fold(Shape::Scalar, Shape::combine)
    }

    pub fn is_scalar(self) -> bool {
        self == Shape::Scalar
    }

    pub fn is_columnar(self) -> bool {
        self == Shape::Columnar
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Scalar => write!(f, "scalar"),
            Shape::Columnar => write!(f, "columnar"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_orders_before_columnar() {
        assert!(Shape::Scalar < Shape::Columnar);
        assert_eq!(Shape::Scalar.max(Shape::Columnar), Shape::Columnar);
    }

    #[test]
    fn columnar_dominates_combination() {
        assert_eq!(Shape::Scalar.combine(Shape::Scalar), Shape::Scalar);
        assert_eq!(Shape::Scalar.combine(Shape::Columnar), Shape::Columnar);
        assert_eq!(Shape::Columnar.combine(Shape::Scalar), Shape::Columnar);
        assert_eq!(Shape::Columnar.combine(Shape::Columnar), Shape::Columnar);
    }

    #[test]
    fn combine_all_of_nothing_is_scalar() {
        assert_eq!(Shape::combine_all([]), Shape::Scalar);
        assert_eq!(
            Shape::combine_all([Shape::Scalar, Shape::Columnar, Shape::Scalar]),
            Shape::Columnar
        );
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Shape::Columnar).unwrap(), "\"columnar\"");
        let shape: Shape = serde_json::from_str("\"scalar\"").unwrap();
        assert_eq!(shape, Shape::Scalar);
    }
}
