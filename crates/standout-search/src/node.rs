//! The predicate tree.
//!
//! [`PredicateNode`] is the single representation consumed by both the
//! in-memory evaluator and the backend translators. Nodes are immutable;
//! combining two nodes builds a new parent and shares the children.

use std::fmt;
use std::sync::Arc;

use crate::criterion::Criterion;
use crate::eval::FieldFault;

/// Immutable boolean combination of criteria.
///
/// # Semantics
///
/// ```text
/// Leaf(c)      = c holds
/// And(a, b, …) = a ∧ b ∧ …   (evaluated left to right, stops at first false)
/// Or(a, b, …)  = a ∨ b ∨ …   (evaluated left to right, stops at first true)
/// ```
pub enum PredicateNode<T> {
    /// A single criterion.
    Leaf(Arc<Criterion<T>>),
    /// Every child must hold.
    And(Arc<[PredicateNode<T>]>),
    /// At least one child must hold.
    Or(Arc<[PredicateNode<T>]>),
}

impl<T> PredicateNode<T> {
    /// Wraps a criterion in a leaf.
    pub fn leaf(criterion: Criterion<T>) -> Self {
        PredicateNode::Leaf(Arc::new(criterion))
    }

    /// Combines nodes with AND. A single node is returned unchanged.
    ///
    /// Nested AND children are flattened into the new node.
    pub fn all(nodes: impl IntoIterator<Item = PredicateNode<T>>) -> Option<Self> {
        Self::combine(nodes, true)
    }

    /// Combines nodes with OR. A single node is returned unchanged.
    ///
    /// Nested OR children are flattened into the new node.
    pub fn any(nodes: impl IntoIterator<Item = PredicateNode<T>>) -> Option<Self> {
        Self::combine(nodes, false)
    }

    /// Returns a new node requiring both `self` and `other`.
    pub fn and(&self, other: &PredicateNode<T>) -> Self {
        PredicateNode::And(Self::flatten([self, other], true).into())
    }

    /// Returns a new node requiring `self` or `other`.
    pub fn or(&self, other: &PredicateNode<T>) -> Self {
        PredicateNode::Or(Self::flatten([self, other], false).into())
    }

    fn combine(nodes: impl IntoIterator<Item = PredicateNode<T>>, conjunction: bool) -> Option<Self> {
        let nodes: Vec<PredicateNode<T>> = nodes.into_iter().collect();
        match nodes.len() {
            0 => None,
            1 => nodes.into_iter().next(),
            _ => {
                let children = Self::flatten(nodes.iter(), conjunction);
                Some(if conjunction {
                    PredicateNode::And(children.into())
                } else {
                    PredicateNode::Or(children.into())
                })
            }
        }
    }

    fn flatten<'a>(
        nodes: impl IntoIterator<Item = &'a PredicateNode<T>>,
        conjunction: bool,
    ) -> Vec<PredicateNode<T>>
    where
        T: 'a,
    {
        let mut children = Vec::new();
        for node in nodes {
            match (node, conjunction) {
                (PredicateNode::And(inner), true) | (PredicateNode::Or(inner), false) => {
                    children.extend(inner.iter().cloned());
                }
                _ => children.push(node.clone()),
            }
        }
        children
    }

    /// Evaluates the tree against a record, short-circuiting left to right.
    pub fn evaluate(&self, record: &T) -> Result<bool, FieldFault> {
        match self {
            PredicateNode::Leaf(criterion) => criterion.evaluate(record),
            PredicateNode::And(children) => {
                for child in children.iter() {
                    if !child.evaluate(record)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            PredicateNode::Or(children) => {
                for child in children.iter() {
                    if child.evaluate(record)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    /// Returns the criteria of the tree in left-to-right order.
    pub fn criteria(&self) -> Vec<&Criterion<T>> {
        let mut out = Vec::new();
        self.collect_criteria(&mut out);
        out
    }

    fn collect_criteria<'a>(&'a self, out: &mut Vec<&'a Criterion<T>>) {
        match self {
            PredicateNode::Leaf(criterion) => out.push(criterion),
            PredicateNode::And(children) | PredicateNode::Or(children) => {
                for child in children.iter() {
                    child.collect_criteria(out);
                }
            }
        }
    }

    /// Returns the depth of the tree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            PredicateNode::Leaf(_) => 1,
            PredicateNode::And(children) | PredicateNode::Or(children) => {
                1 + children.iter().map(PredicateNode::depth).max().unwrap_or(0)
            }
        }
    }
}

impl<T> Clone for PredicateNode<T> {
    fn clone(&self) -> Self {
        match self {
            PredicateNode::Leaf(c) => PredicateNode::Leaf(Arc::clone(c)),
            PredicateNode::And(children) => PredicateNode::And(Arc::clone(children)),
            PredicateNode::Or(children) => PredicateNode::Or(Arc::clone(children)),
        }
    }
}

impl<T> fmt::Debug for PredicateNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredicateNode::Leaf(c) => f.debug_tuple("Leaf").field(c).finish(),
            PredicateNode::And(children) => f.debug_tuple("And").field(children).finish(),
            PredicateNode::Or(children) => f.debug_tuple("Or").field(children).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldPath;
    use crate::strategy::{SearchOptions, Strategy};
    use crate::traits::{read, FieldRead, ReadFn, Searchable};

    struct Row {
        a: String,
        b: String,
    }

    fn row_a(r: &Row) -> FieldRead<'_> {
        read::text(&r.a)
    }

    fn row_b(r: &Row) -> FieldRead<'_> {
        read::text(&r.b)
    }

    impl Searchable for Row {
        fn search_field(name: &str) -> Option<ReadFn<Self>> {
            match name {
                "a" => Some(row_a),
                "b" => Some(row_b),
                _ => None,
            }
        }
    }

    fn leaf(field: &str, term: &str) -> PredicateNode<Row> {
        let path = FieldPath::resolve([field]).unwrap();
        PredicateNode::leaf(
            Criterion::new(Strategy::Equals, path, [term], SearchOptions::default()).unwrap(),
        )
    }

    fn row(a: &str, b: &str) -> Row {
        Row {
            a: a.to_string(),
            b: b.to_string(),
        }
    }

    #[test]
    fn and_requires_both() {
        let node = leaf("a", "x").and(&leaf("b", "y"));
        assert!(node.evaluate(&row("x", "y")).unwrap());
        assert!(!node.evaluate(&row("x", "n")).unwrap());
        assert!(!node.evaluate(&row("n", "y")).unwrap());
    }

    #[test]
    fn or_requires_either() {
        let node = leaf("a", "x").or(&leaf("b", "y"));
        assert!(node.evaluate(&row("x", "n")).unwrap());
        assert!(node.evaluate(&row("n", "y")).unwrap());
        assert!(!node.evaluate(&row("n", "n")).unwrap());
    }

    #[test]
    fn combining_does_not_touch_operands() {
        let base = leaf("a", "x");
        let narrowed = base.and(&leaf("b", "y"));
        assert!(base.evaluate(&row("x", "n")).unwrap());
        assert!(!narrowed.evaluate(&row("x", "n")).unwrap());
        assert_eq!(base.depth(), 1);
    }

    #[test]
    fn same_kind_nests_flatten() {
        let node = leaf("a", "1").and(&leaf("a", "2")).and(&leaf("a", "3"));
        match &node {
            PredicateNode::And(children) => assert_eq!(children.len(), 3),
            other => panic!("expected And, got {other:?}"),
        }
        assert_eq!(node.depth(), 2);
    }

    #[test]
    fn mixed_kinds_nest() {
        let node = leaf("a", "1").or(&leaf("a", "2")).and(&leaf("b", "3"));
        assert_eq!(node.depth(), 3);
        assert_eq!(node.criteria().len(), 3);
    }

    #[test]
    fn all_and_any_constructors() {
        assert!(PredicateNode::<Row>::all(Vec::new()).is_none());
        let single = PredicateNode::all([leaf("a", "x")]).unwrap();
        assert!(matches!(single, PredicateNode::Leaf(_)));
        let any = PredicateNode::any([leaf("a", "x"), leaf("a", "y")]).unwrap();
        assert!(any.evaluate(&row("y", "")).unwrap());
    }

    #[test]
    fn criteria_are_in_construction_order() {
        let node = leaf("a", "1").or(&leaf("b", "2"));
        let names: Vec<_> = node
            .criteria()
            .iter()
            .map(|c| c.fields().names().next().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
