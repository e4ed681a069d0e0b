//! Rendering of expression trees in exam notation.
//!
//! The output is meant for students, not for machines: multiplication is written `·` (or left
//! implicit between a coefficient and what it multiplies), division of expressions is written with
//! `/`, exponents are written as superscripts, and square roots use `√`.
//!
//! ```
//! use tutor_algebra::ast::Node;
//!
//! let tree = Node::frac(
//!     Node::product(vec![
//!         Node::pow(Node::pow(Node::var("a"), Node::int(2)), Node::int(3)),
//!         Node::pow(Node::var("a"), Node::int(5)),
//!     ]),
//!     Node::pow(Node::var("a"), Node::int(4)),
//! );
//! assert_eq!(tree.to_string(), "((a²)³ · a⁵)/a⁴");
//! ```

use crate::ast::Node;
use once_cell::sync::Lazy;
use std::{collections::HashMap, fmt::{Display, Formatter}};

/// Maps the characters that can appear in an integer exponent to their superscript form.
static SUPERSCRIPTS: Lazy<HashMap<char, char>> = Lazy::new(|| {
    "0123456789-+"
        .chars()
        .zip("⁰¹²³⁴⁵⁶⁷⁸⁹⁻⁺".chars())
        .collect()
});

/// Converts the given text to superscript. Characters with no superscript form are kept as-is.
pub fn superscript(s: &str) -> String {
    s.chars()
        .map(|c| SUPERSCRIPTS.get(&c).copied().unwrap_or(c))
        .collect()
}

/// Renders the node in exam notation. This is the same as `node.to_string()`.
pub fn render(node: &Node) -> String {
    node.to_string()
}

/// Writes the node, wrapped in parentheses if `parens` is true.
fn fmt_wrapped(f: &mut Formatter<'_>, node: &Node, parens: bool) -> std::fmt::Result {
    if parens {
        write!(f, "({})", node)
    } else {
        write!(f, "{}", node)
    }
}

/// Returns true if the node must be parenthesized when raised to a power.
fn base_needs_parens(base: &Node) -> bool {
    match base {
        Node::Power(..)
        | Node::Product(_)
        | Node::Fraction(..)
        | Node::Sqrt(_)
        | Node::BinaryOp(..)
        | Node::RangeQuery(..) => true,
        other => other.is_negative_integer(),
    }
}

/// Renders the node the way it is written as the base of a power, e.g. `(a²)` in `(a²)³`.
pub fn render_power_base(base: &Node) -> String {
    if base_needs_parens(base) {
        format!("({})", base)
    } else {
        base.to_string()
    }
}

/// Returns true if the node must be parenthesized as the denominator of a fraction.
fn denominator_needs_parens(denominator: &Node) -> bool {
    match denominator {
        // `a/√b`
        Node::Variable(_) | Node::Power(..) | Node::Sqrt(_) => false,
        Node::Integer(value) => *value < 0,
        _ => true,
    }
}

/// Renders the node the way it is written as the denominator of a fraction, e.g. `(2a)` in
/// `6a²/(2a)`.
pub fn render_denominator(denominator: &Node) -> String {
    if denominator_needs_parens(denominator) {
        format!("({})", denominator)
    } else {
        denominator.to_string()
    }
}

/// Returns true if the node, written right after a coefficient, reads as being multiplied by it
/// without a `·` in between (`2a`, `3√x`, `5a²`).
fn binds_to_coefficient(node: &Node) -> bool {
    match node {
        Node::Variable(_) | Node::Sqrt(_) => true,
        Node::Power(base, _) => matches!(**base, Node::Variable(_)),
        _ => false,
    }
}

/// Writes the factors of a product.
fn fmt_product(f: &mut Formatter<'_>, factors: &[Node]) -> std::fmt::Result {
    let mut prev: Option<&Node> = None;
    for (i, factor) in factors.iter().enumerate() {
        let is_last = i + 1 == factors.len();

        // a leading coefficient of 1 or -1 is written as nothing or a bare minus
        if i == 0 && !is_last {
            match factor {
                Node::Integer(1) => continue,
                Node::Integer(-1) => {
                    write!(f, "-")?;
                    continue;
                },
                _ => {},
            }
        }

        let implicit = match prev {
            Some(Node::Integer(_)) | None => binds_to_coefficient(factor),
            Some(_) => false,
        };
        if prev.is_some() && !implicit {
            write!(f, " · ")?;
        }

        let parens = matches!(factor, Node::BinaryOp(..))
            || (prev.is_some() && factor.is_negative_integer());
        fmt_wrapped(f, factor, parens)?;
        prev = Some(factor);
    }
    Ok(())
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{}", value),
            Self::Variable(name) => write!(f, "{}", name),
            Self::Power(base, exp) => {
                fmt_wrapped(f, base, base_needs_parens(base))?;

                match &**exp {
                    Self::Integer(value) => write!(f, "{}", superscript(&value.to_string())),
                    other => {
                        write!(f, "^")?;
                        fmt_wrapped(f, other, !matches!(other, Self::Integer(_) | Self::Variable(_)))
                    },
                }
            },
            Self::Product(factors) => fmt_product(f, factors),
            Self::Fraction(numerator, denominator) => {
                let numerator_parens = !matches!(
                    **numerator,
                    Self::Integer(_) | Self::Variable(_) | Self::Power(..) | Self::Sqrt(_)
                );
                fmt_wrapped(f, numerator, numerator_parens)?;
                write!(f, "/")?;
                fmt_wrapped(f, denominator, denominator_needs_parens(denominator))
            },
            Self::Sqrt(radicand) => {
                write!(f, "√")?;
                let parens = matches!(
                    **radicand,
                    Self::Product(_) | Self::Fraction(..) | Self::BinaryOp(..)
                );
                fmt_wrapped(f, radicand, parens)
            },
            Self::BinaryOp(op, left, right) => {
                write!(f, "{} {} ", left, op.symbol())?;
                fmt_wrapped(f, right, matches!(**right, Self::BinaryOp(..)))
            },
            Self::RangeQuery(left, right) => write!(f, "[{}; {}]", left, right),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::BinOp;
    use pretty_assertions::assert_eq;
    use super::*;

    fn a() -> Node {
        Node::var("a")
    }

    #[test]
    fn superscript_digits_and_signs() {
        assert_eq!(superscript("-12"), "⁻¹²");
        assert_eq!(superscript("6+5"), "⁶⁺⁵");
        assert_eq!(superscript("2·3"), "²·³");
    }

    #[test]
    fn power_of_power() {
        let node = Node::pow(Node::pow(a(), Node::int(2)), Node::int(3));
        assert_eq!(render(&node), "(a²)³");
    }

    #[test]
    fn negative_base_and_exponent() {
        assert_eq!(render(&Node::pow(Node::int(-2), Node::int(3))), "(-2)³");
        assert_eq!(render(&Node::pow(a(), Node::int(-1))), "a⁻¹");
    }

    #[test]
    fn symbolic_exponent() {
        assert_eq!(render(&Node::pow(a(), Node::var("n"))), "a^n");
        assert_eq!(
            render(&Node::pow(a(), Node::binary(BinOp::Add, Node::var("n"), Node::int(1)))),
            "a^(n + 1)",
        );
    }

    #[test]
    fn implicit_coefficients() {
        let node = Node::product(vec![Node::int(12), Node::pow(a(), Node::int(3))]);
        assert_eq!(render(&node), "12a³");

        let node = Node::product(vec![Node::int(3), Node::sqrt(Node::int(2))]);
        assert_eq!(render(&node), "3√2");

        let node = Node::product(vec![Node::int(2), Node::int(3)]);
        assert_eq!(render(&node), "2 · 3");

        let node = Node::product(vec![Node::int(6), a(), Node::var("b")]);
        assert_eq!(render(&node), "6a · b");
    }

    #[test]
    fn unit_coefficients() {
        assert_eq!(render(&Node::product(vec![Node::int(1), a()])), "a");
        assert_eq!(render(&Node::product(vec![Node::int(-1), a()])), "-a");
        assert_eq!(render(&Node::product(vec![Node::int(-1), Node::int(2)])), "-2");
        assert_eq!(render(&Node::product(vec![Node::int(1)])), "1");
    }

    #[test]
    fn parenthesized_factors() {
        let node = Node::product(vec![a(), Node::int(-3)]);
        assert_eq!(render(&node), "a · (-3)");

        let node = Node::product(vec![
            Node::int(2),
            Node::binary(BinOp::Add, a(), Node::int(1)),
        ]);
        assert_eq!(render(&node), "2 · (a + 1)");
    }

    #[test]
    fn fractions() {
        let node = Node::frac(
            Node::product(vec![
                Node::sqrt(Node::product(vec![Node::int(12), Node::pow(a(), Node::int(3))])),
                Node::sqrt(Node::product(vec![Node::int(3), a()])),
            ]),
            Node::product(vec![Node::int(2), a()]),
        );
        assert_eq!(render(&node), "(√(12a³) · √(3a))/(2a)");

        let node = Node::frac(Node::int(1), Node::sqrt(Node::int(2)));
        assert_eq!(render(&node), "1/√2");

        let node = Node::frac(a(), Node::int(-2));
        assert_eq!(render(&node), "a/(-2)");
    }

    #[test]
    fn roots() {
        let node = Node::sqrt(Node::frac(Node::pow(Node::var("x"), Node::int(6)), Node::pow(Node::var("x"), Node::int(2))));
        assert_eq!(render(&node), "√(x⁶/x²)");
        assert_eq!(render(&Node::sqrt(Node::pow(Node::var("x"), Node::int(2)))), "√x²");
        assert_eq!(render(&Node::pow(Node::sqrt(Node::var("x")), Node::int(2))), "(√x)²");
    }

    #[test]
    fn binary_ops_and_ranges() {
        let node = Node::binary(
            BinOp::Sub,
            a(),
            Node::binary(BinOp::Add, Node::var("b"), Node::int(1)),
        );
        assert_eq!(render(&node), "a - (b + 1)");

        let node = Node::range(Node::int(4), Node::int(5));
        assert_eq!(render(&node), "[4; 5]");

        let node = Node::binary(BinOp::Div, Node::sqrt(Node::int(50)), Node::int(2));
        assert_eq!(render(&node), "√50 : 2");
    }
}
