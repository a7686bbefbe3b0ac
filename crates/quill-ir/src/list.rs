//! Ordered, immutable groups of nodes.
//!
//! A `NodeList` lets variadic node groups (argument lists, projections, sort
//! keys) sit in a single argument slot. Its argument tuple is exactly its
//! members, so it takes part in structural equality like any other node.
//! Concatenation always builds a new list; operands are never touched.

use crate::arg::Arg;
use crate::error::NodeError;
use crate::expr::{Expr, ListExpr};
use crate::node::{Node, Operation};
use crate::rules;
use std::borrow::Cow;
use std::ops::{Add, Index};
use std::sync::Arc;

#[derive(Clone, Debug, Default)]
pub struct NodeList {
    values: Arc<[Node]>,
}

impl NodeList {
    pub fn new(values: impl IntoIterator<Item = Node>) -> Self {
        NodeList {
            values: values.into_iter().collect(),
        }
    }

    /// Build from raw arguments; every entry must be a node.
    pub fn from_args(args: impl IntoIterator<Item = Arg>) -> Result<Self, NodeError> {
        Ok(Self::new(rules::nodes("NodeList", "values", args)?))
    }

    pub fn into_node(self) -> Node {
        Node::new(self)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.values.get(index)
    }

    pub fn at(&self, index: usize) -> Result<&Node, NodeError> {
        self.values.get(index).ok_or(NodeError::IndexOutOfRange {
            index,
            len: self.values.len(),
        })
    }

    pub fn first(&self) -> Option<&Node> {
        self.values.first()
    }

    pub fn last(&self) -> Option<&Node> {
        self.values.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.values.iter()
    }

    pub fn as_slice(&self) -> &[Node] {
        &self.values
    }

    /// `self` followed by `other`.
    pub fn concat(&self, other: impl IntoIterator<Item = Node>) -> NodeList {
        self.iter().cloned().chain(other).collect()
    }

    /// `other` followed by `self`.
    pub fn rconcat(&self, other: impl IntoIterator<Item = Node>) -> NodeList {
        other.into_iter().chain(self.iter().cloned()).collect()
    }

    /// Concatenate with an untyped operand: a tuple of nodes or a list node.
    pub fn try_concat(&self, other: &Arg) -> Result<NodeList, NodeError> {
        Ok(self.concat(operand_nodes(other)?))
    }

    pub fn try_rconcat(&self, other: &Arg) -> Result<NodeList, NodeError> {
        Ok(self.rconcat(operand_nodes(other)?))
    }
}

fn operand_nodes(other: &Arg) -> Result<Vec<Node>, NodeError> {
    match other {
        Arg::Tuple(items) => rules::nodes("NodeList", "other", items.iter().cloned()),
        Arg::Node(node) => match node.as_list() {
            Some(list) => Ok(list.as_slice().to_vec()),
            None => Err(NodeError::invalid_field(
                "NodeList",
                "other",
                "a sequence of nodes",
                format!("{} node", node.kind_name()),
            )),
        },
        other => Err(NodeError::invalid_field(
            "NodeList",
            "other",
            "a sequence of nodes",
            other.type_name(),
        )),
    }
}

impl Operation for NodeList {
    fn kind_name(&self) -> &'static str {
        "NodeList"
    }

    fn args(&self) -> Vec<Arg> {
        self.values.iter().cloned().map(Arg::Node).collect()
    }

    fn arg_names(&self) -> Vec<Cow<'static, str>> {
        (0..self.values.len())
            .map(|index| Cow::Owned(index.to_string()))
            .collect()
    }

    fn to_expr(&self, node: &Node) -> Expr {
        Expr::List(ListExpr::new(node.clone(), self.clone()))
    }

    fn rebuild(&self, args: Vec<Arg>) -> Result<Node, NodeError> {
        Ok(NodeList::from_args(args)?.into_node())
    }
}

impl PartialEq for NodeList {
    fn eq(&self, other: &Self) -> bool {
        self.values.len() == other.values.len()
            && self.iter().zip(other.iter()).all(|(a, b)| a.equals(b))
    }
}

impl Eq for NodeList {}

impl Index<usize> for NodeList {
    type Output = Node;

    fn index(&self, index: usize) -> &Node {
        &self.values[index]
    }
}

impl FromIterator<Node> for NodeList {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        NodeList::new(iter)
    }
}

impl<'a> IntoIterator for &'a NodeList {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl From<Vec<Node>> for NodeList {
    fn from(values: Vec<Node>) -> Self {
        NodeList {
            values: values.into(),
        }
    }
}

impl From<NodeList> for Node {
    fn from(list: NodeList) -> Self {
        list.into_node()
    }
}

impl Add<&NodeList> for &NodeList {
    type Output = NodeList;

    fn add(self, other: &NodeList) -> NodeList {
        self.concat(other.iter().cloned())
    }
}

impl Add<Vec<Node>> for NodeList {
    type Output = NodeList;

    fn add(self, other: Vec<Node>) -> NodeList {
        self.concat(other)
    }
}

impl Add<NodeList> for Vec<Node> {
    type Output = NodeList;

    fn add(self, other: NodeList) -> NodeList {
        other.rconcat(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::DataType;
    use crate::test_harness::Field;

    fn n(name: &str) -> Node {
        Field::scalar(name, DataType::Int64)
    }

    #[test]
    fn keeps_construction_order() {
        let (n1, n2, n3) = (n("n1"), n("n2"), n("n3"));
        let list = NodeList::new([n1.clone(), n2.clone(), n3.clone()]);
        assert_eq!(list.len(), 3);
        assert!(list[0].ptr_eq(&n1));
        assert!(list.at(1).unwrap().ptr_eq(&n2));
        assert!(list[2].ptr_eq(&n3));
        assert!(list.last().unwrap().ptr_eq(&n3));
        let names: Vec<_> = list.iter().map(|node| node.args()[0].to_string()).collect();
        assert_eq!(names, [r#""n1""#, r#""n2""#, r#""n3""#]);
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let list = NodeList::new([n("a")]);
        assert_eq!(
            list.at(1).unwrap_err(),
            NodeError::IndexOutOfRange { index: 1, len: 1 }
        );
        assert!(list.get(5).is_none());
    }

    #[test]
    fn concatenation_builds_new_lists() {
        let (n0, n1, n2, n3, n4) = (n("n0"), n("n1"), n("n2"), n("n3"), n("n4"));
        let list = NodeList::new([n1.clone(), n2.clone(), n3.clone()]);

        let appended = list.clone() + vec![n4.clone()];
        assert_eq!(appended.len(), 4);
        assert!(appended[3].ptr_eq(&n4));

        let prepended = vec![n0.clone()] + list.clone();
        assert!(prepended[0].ptr_eq(&n0));
        assert!(prepended[1].ptr_eq(&n1));
        assert!(prepended[3].ptr_eq(&n3));

        let joined = &list + &list;
        assert_eq!(joined.len(), 6);

        assert_eq!(list.len(), 3);
        assert!(list[0].ptr_eq(&n1));
    }

    #[test]
    fn arguments_are_exactly_the_members() {
        let (a, b) = (n("a"), n("b"));
        let node = NodeList::new([a.clone(), b.clone()]).into_node();
        let args = node.args();
        assert_eq!(args.len(), 2);
        assert!(args[0].as_node().unwrap().ptr_eq(&a));
        assert_eq!(node.arg_names(), ["0", "1"]);
        assert_eq!(
            node.to_string(),
            r#"NodeList(Field(name="a", dtype=int64, shape=scalar), Field(name="b", dtype=int64, shape=scalar))"#
        );
    }

    #[test]
    fn rejects_non_node_entries() {
        let error = NodeList::from_args([Arg::from(n("a")), Arg::Int(1)]).unwrap_err();
        assert!(error.is_validation());
    }

    #[test]
    fn try_concat_accepts_tuples_and_lists_only() {
        let list = NodeList::new([n("a")]);
        let tail = NodeList::new([n("b")]).into_node();
        assert_eq!(list.try_concat(&Arg::from(tail.clone())).unwrap().len(), 2);
        assert_eq!(list.try_rconcat(&Arg::tuple([Arg::from(n("z"))])).unwrap().len(), 2);
        assert!(list.try_concat(&Arg::Int(3)).unwrap_err().is_validation());
        assert!(list.try_concat(&Arg::from(n("c"))).unwrap_err().is_validation());
        assert!(
            list.try_concat(&Arg::tuple([Arg::from("c")]))
                .unwrap_err()
                .is_validation()
        );
    }

    #[test]
    fn lists_are_nodes_and_values_are_not() {
        let node = NodeList::new([n("a")]).into_node();
        assert!(node.as_value().is_none());
        assert!(node.as_list().is_some());
        assert!(!node.has_resolved_name());
        let expr = node.to_expr();
        assert!(expr.is_list());
        assert_eq!(expr.as_list().unwrap().len(), 1);
    }
}
