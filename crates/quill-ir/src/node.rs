//! The node contract shared by every IR element.
//!
//! A concrete node kind is a plain struct implementing [`Operation`]. It is
//! validated by its own constructor and then frozen inside a [`Node`], a
//! cheaply clonable shared handle. The handle adds what generic passes need:
//! a process-unique identity, the node's kind, and a structural hash computed
//! once from the argument tuple.
//!
//! Nodes are never mutated. Deriving a node means building a new one, for
//! example with [`Node::copy_with`].

use crate::arg::{Arg, args_equal};
use crate::equality::EqualityCache;
use crate::error::NodeError;
use crate::expr::Expr;
use crate::list::NodeList;
use crate::value::Value;
use rustc_hash::FxHasher;
use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique node identity. Never reused, even after the node is dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Behaviour of a concrete node kind.
pub trait Operation: Any + fmt::Debug + Send + Sync {
    /// Kind name, used when rendering nodes and in error messages.
    fn kind_name(&self) -> &'static str;

    /// Constructor-bound values in declaration order.
    fn args(&self) -> Vec<Arg>;

    /// Names parallel to [`Operation::args`].
    fn arg_names(&self) -> Vec<Cow<'static, str>>;

    /// Materialize `node` (which wraps `self`) into an expression handle.
    fn to_expr(&self, node: &Node) -> Expr;

    /// Build a new node of the same kind from a replacement argument tuple,
    /// running the kind's field validation.
    fn rebuild(&self, args: Vec<Arg>) -> Result<Node, NodeError>;

    fn as_value(&self) -> Option<&dyn Value> {
        None
    }

    fn resolve_name(&self) -> Result<Option<Arc<str>>, NodeError> {
        Err(NodeError::NotNamed { node: self.kind_name() })
    }

    fn has_resolved_name(&self) -> bool {
        false
    }

    /// Compare against `other`, already known to be the same kind.
    ///
    /// Only the left operand's implementation is consulted.
    fn structurally_equals(&self, other: &Node, cache: &EqualityCache) -> bool {
        args_equal(&self.args(), &other.args(), cache)
    }
}

struct NodeInner {
    id: NodeId,
    kind: TypeId,
    hash: u64,
    /// Set once the node has a pair entry in the global equality cache.
    cached: AtomicBool,
    op: Box<dyn Operation>,
}

impl Drop for NodeInner {
    fn drop(&mut self) {
        if *self.cached.get_mut() {
            EqualityCache::global().evict(self.id);
        }
    }
}

/// Shared handle to an immutable node.
///
/// `PartialEq`, `Eq` and `Hash` are structural and agree with each other, so
/// nodes can key hash maps. Use [`Node::ptr_eq`] for identity.
#[derive(Clone)]
pub struct Node(Arc<NodeInner>);

impl Node {
    pub fn new<T: Operation>(op: T) -> Self {
        let kind = TypeId::of::<T>();
        let args = op.args();
        let mut hasher = FxHasher::default();
        kind.hash(&mut hasher);
        hasher.write_usize(args.len());
        for arg in &args {
            arg.hash_into(&mut hasher);
        }
        Node(Arc::new(NodeInner {
            id: NodeId::next(),
            kind,
            hash: hasher.finish(),
            cached: AtomicBool::new(false),
            op: Box::new(op),
        }))
    }

    pub fn id(&self) -> NodeId {
        self.0.id
    }

    pub fn kind_name(&self) -> &'static str {
        self.0.op.kind_name()
    }

    pub fn args(&self) -> Vec<Arg> {
        self.0.op.args()
    }

    pub fn arg_names(&self) -> Vec<Cow<'static, str>> {
        self.0.op.arg_names()
    }

    pub fn op(&self) -> &dyn Operation {
        &*self.0.op
    }

    /// Concrete Rust type of the wrapped operation.
    pub fn kind(&self) -> TypeId {
        self.0.kind
    }

    pub fn is<T: Operation>(&self) -> bool {
        self.0.kind == TypeId::of::<T>()
    }

    pub fn downcast_ref<T: Operation>(&self) -> Option<&T> {
        let op: &dyn Any = &*self.0.op;
        op.downcast_ref::<T>()
    }

    pub fn as_value(&self) -> Option<&dyn Value> {
        self.0.op.as_value()
    }

    pub fn as_list(&self) -> Option<&NodeList> {
        self.downcast_ref::<NodeList>()
    }

    pub fn structural_hash(&self) -> u64 {
        self.0.hash
    }

    pub fn ptr_eq(&self, other: &Node) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Structural equality through the process-wide cache.
    pub fn equals(&self, other: &Node) -> bool {
        EqualityCache::global().equals(self, other)
    }

    /// Structural equality through a caller-owned cache.
    pub fn equals_in(&self, other: &Node, cache: &EqualityCache) -> bool {
        cache.equals(self, other)
    }

    /// Compare against an arbitrary argument. Comparing a node with anything
    /// that is not a node is a programming error and is reported as such.
    pub fn try_equals(&self, other: &Arg) -> Result<bool, NodeError> {
        match other {
            Arg::Node(node) => Ok(self.equals(node)),
            other => Err(NodeError::InvalidComparison {
                found: other.type_name(),
            }),
        }
    }

    pub fn resolve_name(&self) -> Result<Option<Arc<str>>, NodeError> {
        self.0.op.resolve_name()
    }

    pub fn has_resolved_name(&self) -> bool {
        self.0.op.has_resolved_name()
    }

    pub fn to_expr(&self) -> Expr {
        self.0.op.to_expr(self)
    }

    /// New node of the same kind over `args`.
    pub fn copy_with(&self, args: Vec<Arg>) -> Result<Node, NodeError> {
        self.0.op.rebuild(args)
    }

    pub(crate) fn mark_cached(&self) {
        self.0.cached.store(true, Ordering::Release);
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.hash)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.0.id)
            .field("op", &self.0.op)
            .finish()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let positional = self.is::<NodeList>();
        write!(f, "{}(", self.kind_name())?;
        for (i, (name, arg)) in self.arg_names().iter().zip(self.args()).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if positional {
                write!(f, "{arg}")?;
            } else {
                write!(f, "{name}={arg}")?;
            }
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias::Alias;
    use crate::datatype::DataType;
    use crate::test_harness::{Field, Negate};
    use crate::ops::Unary;

    #[test]
    fn ids_are_unique_and_clones_share_them() {
        let a = Field::column("a", DataType::Int64);
        let b = Field::column("a", DataType::Int64);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone().id(), a.id());
        assert!(a.ptr_eq(&a.clone()));
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn equal_structure_means_equal_hash() {
        let a = Unary::<Negate>::new(Field::column("a", DataType::Int64)).unwrap();
        let b = Unary::<Negate>::new(Field::column("a", DataType::Int64)).unwrap();
        assert_eq!(a.structural_hash(), b.structural_hash());
        assert_eq!(a, b);
    }

    #[test]
    fn downcast_finds_the_concrete_kind() {
        let field = Field::scalar("x", DataType::Int64);
        let alias = Alias::new(field.clone(), "y").unwrap();
        assert!(alias.is::<Alias>());
        assert_eq!(alias.downcast_ref::<Alias>().unwrap().name(), Some("y"));
        assert!(alias.downcast_ref::<NodeList>().is_none());
        assert!(alias.as_list().is_none());
        assert!(field.as_value().is_some());
    }

    #[test]
    fn try_equals_rejects_non_nodes() {
        let field = Field::scalar("x", DataType::Int64);
        assert_eq!(field.try_equals(&Arg::from(field.clone())), Ok(true));
        assert_eq!(
            field.try_equals(&Arg::Int(1)),
            Err(NodeError::InvalidComparison { found: "int" })
        );
    }

    #[test]
    fn unnamed_kinds_fail_to_resolve_a_name() {
        let negated = Unary::<Negate>::new(Field::scalar("x", DataType::Int64)).unwrap();
        assert!(!negated.has_resolved_name());
        assert_eq!(
            negated.resolve_name(),
            Err(NodeError::NotNamed { node: "Negate" })
        );
    }

    #[test]
    fn display_uses_argument_names() {
        let alias = Alias::new(Field::scalar("x", DataType::Int64), "y").unwrap();
        assert_eq!(
            alias.to_string(),
            r#"Alias(arg=Field(name="x", dtype=int64, shape=scalar), name="y")"#
        );
    }
}
