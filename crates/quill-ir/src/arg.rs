//! Node arguments.
//!
//! An argument is a nested node, a primitive literal, or a container of
//! arguments. Tuples are ordered; maps compare and hash without regard to
//! insertion order. The argument tuple is the only thing structural equality
//! looks at, so every variant knows how to compare and hash itself
//! consistently with that equality.

use crate::datatype::DataType;
use crate::equality::EqualityCache;
use crate::list::NodeList;
use crate::node::Node;
use crate::shape::Shape;
use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use rustc_hash::FxHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub enum Arg {
    Node(Node),
    /// Absent value, e.g. the name of an unnamed alias.
    None,
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    Str(Arc<str>),
    Shape(Shape),
    DataType(DataType),
    Tuple(Arc<[Arg]>),
    Map(Arc<IndexMap<Arc<str>, Arg>>),
}

impl Arg {
    pub fn tuple(items: impl IntoIterator<Item = Arg>) -> Self {
        Arg::Tuple(items.into_iter().collect())
    }

    pub fn map(entries: impl IntoIterator<Item = (impl Into<Arc<str>>, Arg)>) -> Self {
        Arg::Map(Arc::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    pub fn str(value: impl Into<Arc<str>>) -> Self {
        Arg::Str(value.into())
    }

    pub fn float(value: f64) -> Self {
        Arg::Float(OrderedFloat(value))
    }

    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Arg::Node(_) => "node",
            Arg::None => "none",
            Arg::Bool(_) => "bool",
            Arg::Int(_) => "int",
            Arg::Float(_) => "float",
            Arg::Str(_) => "str",
            Arg::Shape(_) => "shape",
            Arg::DataType(_) => "datatype",
            Arg::Tuple(_) => "tuple",
            Arg::Map(_) => "map",
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Arg::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Arg::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Arg::None)
    }

    /// Structural equality: nested nodes go through `cache`, everything else
    /// compares by value. Variants never equal each other.
    pub fn structurally_equals(&self, other: &Arg, cache: &EqualityCache) -> bool {
        match (self, other) {
            (Arg::Node(a), Arg::Node(b)) => cache.equals(a, b),
            (Arg::None, Arg::None) => true,
            (Arg::Bool(a), Arg::Bool(b)) => a == b,
            (Arg::Int(a), Arg::Int(b)) => a == b,
            (Arg::Float(a), Arg::Float(b)) => a == b,
            (Arg::Str(a), Arg::Str(b)) => a == b,
            (Arg::Shape(a), Arg::Shape(b)) => a == b,
            (Arg::DataType(a), Arg::DataType(b)) => a == b,
            (Arg::Tuple(a), Arg::Tuple(b)) => args_equal(a, b, cache),
            (Arg::Map(a), Arg::Map(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(key, value)| {
                        b.get(key)
                            .is_some_and(|other| value.structurally_equals(other, cache))
                    })
            }
            _ => false,
        }
    }

    /// Feed the structural hash of this argument into `state`.
    ///
    /// Nested nodes contribute their precomputed hash, so hashing a tree
    /// never walks below its direct children.
    pub(crate) fn hash_into<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Arg::Node(node) => state.write_u64(node.structural_hash()),
            Arg::None => {}
            Arg::Bool(value) => value.hash(state),
            Arg::Int(value) => value.hash(state),
            Arg::Float(value) => value.hash(state),
            Arg::Str(value) => value.hash(state),
            Arg::Shape(value) => value.hash(state),
            Arg::DataType(value) => value.hash(state),
            Arg::Tuple(items) => {
                state.write_usize(items.len());
                for item in items.iter() {
                    item.hash_into(state);
                }
            }
            Arg::Map(entries) => {
                // Order-independent: sum of per-entry hashes.
                let mut combined: u64 = 0;
                for (key, value) in entries.iter() {
                    let mut entry = FxHasher::default();
                    key.hash(&mut entry);
                    value.hash_into(&mut entry);
                    combined = combined.wrapping_add(entry.finish());
                }
                state.write_usize(entries.len());
                state.write_u64(combined);
            }
        }
    }
}

/// Pairwise structural equality of two argument sequences.
pub fn args_equal(left: &[Arg], right: &[Arg], cache: &EqualityCache) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right)
            .all(|(a, b)| a.structurally_equals(b, cache))
}

impl PartialEq for Arg {
    fn eq(&self, other: &Self) -> bool {
        self.structurally_equals(other, EqualityCache::global())
    }
}

impl Eq for Arg {}

impl Hash for Arg {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash_into(state)
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Node(node) => write!(f, "{node}"),
            Arg::None => write!(f, "None"),
            Arg::Bool(value) => write!(f, "{value}"),
            Arg::Int(value) => write!(f, "{value}"),
            Arg::Float(value) => write!(f, "{value}"),
            Arg::Str(value) => write!(f, "{value:?}"),
            Arg::Shape(value) => write!(f, "{value}"),
            Arg::DataType(value) => write!(f, "{value}"),
            Arg::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            Arg::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<Node> for Arg {
    fn from(node: Node) -> Self {
        Arg::Node(node)
    }
}

impl From<&Node> for Arg {
    fn from(node: &Node) -> Self {
        Arg::Node(node.clone())
    }
}

impl From<NodeList> for Arg {
    fn from(list: NodeList) -> Self {
        Arg::Node(list.into_node())
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

impl From<i64> for Arg {
    fn from(value: i64) -> Self {
        Arg::Int(value)
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::float(value)
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Str(value.into())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Str(value.into())
    }
}

impl From<Arc<str>> for Arg {
    fn from(value: Arc<str>) -> Self {
        Arg::Str(value)
    }
}

impl From<Shape> for Arg {
    fn from(value: Shape) -> Self {
        Arg::Shape(value)
    }
}

impl From<DataType> for Arg {
    fn from(value: DataType) -> Self {
        Arg::DataType(value)
    }
}

impl From<Vec<Arg>> for Arg {
    fn from(items: Vec<Arg>) -> Self {
        Arg::Tuple(items.into())
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        value.map_or(Arg::None, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash_of(arg: &Arg) -> u64 {
        let mut hasher = FxHasher::default();
        arg.hash_into(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn maps_ignore_insertion_order() {
        let cache = EqualityCache::new();
        let a = Arg::map([("how", Arg::from("left")), ("limit", Arg::Int(10))]);
        let b = Arg::map([("limit", Arg::Int(10)), ("how", Arg::from("left"))]);
        assert!(a.structurally_equals(&b, &cache));
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn tuples_respect_order() {
        let cache = EqualityCache::new();
        let a = Arg::tuple([Arg::Int(1), Arg::Int(2)]);
        let b = Arg::tuple([Arg::Int(2), Arg::Int(1)]);
        assert!(!a.structurally_equals(&b, &cache));
        assert!(a.structurally_equals(&a.clone(), &cache));
    }

    #[test]
    fn variants_never_cross_compare() {
        let cache = EqualityCache::new();
        assert!(!Arg::Int(1).structurally_equals(&Arg::float(1.0), &cache));
        assert!(!Arg::None.structurally_equals(&Arg::from("None"), &cache));
        assert!(!Arg::tuple([]).structurally_equals(&Arg::map(Vec::<(&str, Arg)>::new()), &cache));
    }

    #[test]
    fn nested_containers_compare_recursively() {
        let cache = EqualityCache::new();
        let a = Arg::tuple([Arg::map([("k", Arg::tuple([Arg::Bool(true)]))])]);
        let b = Arg::tuple([Arg::map([("k", Arg::tuple([Arg::Bool(true)]))])]);
        let c = Arg::tuple([Arg::map([("k", Arg::tuple([Arg::Bool(false)]))])]);
        assert!(a.structurally_equals(&b, &cache));
        assert!(!a.structurally_equals(&c, &cache));
    }

    #[test]
    fn option_converts_to_none() {
        assert!(Arg::from(None::<&str>).is_none());
        assert_eq!(Arg::from(Some("x")).as_str(), Some("x"));
    }

    #[test]
    fn display_renders_containers() {
        let arg = Arg::tuple([Arg::Int(1), Arg::from("a"), Arg::None]);
        assert_eq!(arg.to_string(), r#"(1, "a", None)"#);
        let arg = Arg::map([("k", Arg::float(1.5))]);
        assert_eq!(arg.to_string(), "{k: 1.5}");
    }
}
