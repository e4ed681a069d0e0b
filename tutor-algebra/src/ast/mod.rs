//! The expression tree that tasks are written in.
//!
//! Tasks are produced by problem generators as pre-built trees, never as text, so there is no
//! parser here. [`Node`] is a closed set of node kinds. Every consumer (the renderer, the
//! power-law simplifier, the radical decomposer, and the evaluator) matches on it exhaustively, so
//! adding a node kind is a compile error until every consumer has decided what to do with it.
//!
//! Trees are read from and written to JSON documents of the form
//! `{"type": "power", "base": ..., "exponent": ...}`; see the [`json`] module.

mod iter;
pub mod json;

use iter::NodeIter;
use std::collections::BTreeSet;

/// The `type` tags of every node kind, in the order of the [`Node`] variants.
pub const NODE_TAGS: [&str; 8] = [
    "integer",
    "variable",
    "power",
    "product",
    "fraction",
    "sqrt",
    "binary_op",
    "range_query",
];

/// The operator of a [`Node::BinaryOp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    /// `a + b`
    Add,

    /// `a - b`
    Sub,

    /// `a · b`
    Mul,

    /// `a : b`
    Div,
}

impl BinOp {
    /// Returns the symbol this operator is rendered with.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "·",
            Self::Div => ":",
        }
    }

    /// Reads an operator from its symbol. `*` and `/` are accepted as spellings of `·` and `:`.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Self::Add),
            "-" | "−" => Some(Self::Sub),
            "·" | "*" => Some(Self::Mul),
            ":" | "/" => Some(Self::Div),
            _ => None,
        }
    }
}

/// A node of an expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    /// An integer literal, such as `2` or `-3`.
    Integer(i64),

    /// A variable, such as `a` or `x`.
    Variable(String),

    /// A base raised to an exponent. Simplification requires the exponent to be a
    /// [`Node::Integer`].
    Power(Box<Node>, Box<Node>),

    /// Factors multiplied together, in order. Never empty.
    Product(Vec<Node>),

    /// A numerator divided by a denominator.
    Fraction(Box<Node>, Box<Node>),

    /// The square root of a radicand.
    Sqrt(Box<Node>),

    /// A binary arithmetic operation.
    BinaryOp(BinOp, Box<Node>, Box<Node>),

    /// The question of which bounds a value lies between, written `[left; right]`.
    RangeQuery(Box<Node>, Box<Node>),
}

impl Node {
    /// Creates a [`Node::Integer`].
    pub fn int(value: i64) -> Self {
        Self::Integer(value)
    }

    /// Creates a [`Node::Variable`].
    pub fn var(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// Creates a [`Node::Power`].
    pub fn pow(base: Node, exponent: Node) -> Self {
        Self::Power(Box::new(base), Box::new(exponent))
    }

    /// Creates a [`Node::Product`].
    pub fn product(factors: Vec<Node>) -> Self {
        Self::Product(factors)
    }

    /// Creates a [`Node::Fraction`].
    pub fn frac(numerator: Node, denominator: Node) -> Self {
        Self::Fraction(Box::new(numerator), Box::new(denominator))
    }

    /// Creates a [`Node::Sqrt`].
    pub fn sqrt(radicand: Node) -> Self {
        Self::Sqrt(Box::new(radicand))
    }

    /// Creates a [`Node::BinaryOp`].
    pub fn binary(op: BinOp, left: Node, right: Node) -> Self {
        Self::BinaryOp(op, Box::new(left), Box::new(right))
    }

    /// Creates a [`Node::RangeQuery`].
    pub fn range(left: Node, right: Node) -> Self {
        Self::RangeQuery(Box::new(left), Box::new(right))
    }

    /// Returns the `type` tag of this node.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Integer(_) => NODE_TAGS[0],
            Self::Variable(_) => NODE_TAGS[1],
            Self::Power(..) => NODE_TAGS[2],
            Self::Product(_) => NODE_TAGS[3],
            Self::Fraction(..) => NODE_TAGS[4],
            Self::Sqrt(_) => NODE_TAGS[5],
            Self::BinaryOp(..) => NODE_TAGS[6],
            Self::RangeQuery(..) => NODE_TAGS[7],
        }
    }

    /// If the node is a [`Node::Integer`], returns its value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// If the node is a [`Node::Variable`], returns its name.
    pub fn as_variable(&self) -> Option<&str> {
        match self {
            Self::Variable(name) => Some(name),
            _ => None,
        }
    }

    /// Returns true if the node is a negative [`Node::Integer`].
    pub fn is_negative_integer(&self) -> bool {
        self.as_integer().is_some_and(|value| value < 0)
    }

    /// Returns true if the node is a [`Node::Sqrt`].
    pub fn is_sqrt(&self) -> bool {
        matches!(self, Self::Sqrt(_))
    }

    /// Returns the top-level factors of the node: the factors of a [`Node::Product`], or the node
    /// itself otherwise.
    pub fn factors(&self) -> &[Node] {
        match self {
            Self::Product(factors) => factors,
            other => std::slice::from_ref(other),
        }
    }

    /// Returns the names of every variable in the tree, sorted.
    pub fn variables(&self) -> BTreeSet<&str> {
        self.post_order_iter()
            .filter_map(Node::as_variable)
            .collect()
    }

    /// Returns an iterator that traverses the tree in left-to-right post-order (i.e.
    /// depth-first).
    pub fn post_order_iter(&self) -> NodeIter {
        NodeIter::new(self)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn tags_follow_variants() {
        let nodes = [
            Node::int(1),
            Node::var("a"),
            Node::pow(Node::var("a"), Node::int(2)),
            Node::product(vec![Node::int(2), Node::var("a")]),
            Node::frac(Node::int(1), Node::var("a")),
            Node::sqrt(Node::var("a")),
            Node::binary(BinOp::Add, Node::var("a"), Node::int(1)),
            Node::range(Node::int(1), Node::int(2)),
        ];
        let tags = nodes.iter().map(Node::tag).collect::<Vec<_>>();
        assert_eq!(tags, NODE_TAGS.to_vec());
    }

    #[test]
    fn collect_variables() {
        let tree = Node::frac(
            Node::product(vec![
                Node::pow(Node::pow(Node::var("a"), Node::int(2)), Node::int(3)),
                Node::sqrt(Node::var("c")),
            ]),
            Node::binary(BinOp::Sub, Node::var("b"), Node::var("a")),
        );
        assert_eq!(tree.variables().into_iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn factors_of_non_product() {
        let node = Node::sqrt(Node::var("x"));
        assert_eq!(node.factors(), &[Node::sqrt(Node::var("x"))]);
    }

    #[test]
    fn operator_symbols() {
        assert_eq!(BinOp::from_symbol("*"), Some(BinOp::Mul));
        assert_eq!(BinOp::from_symbol(":"), Some(BinOp::Div));
        assert_eq!(BinOp::from_symbol("^"), None);
        assert_eq!(BinOp::Sub.symbol(), "-");
    }
}
