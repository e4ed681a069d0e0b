//! The radical decomposer.
//!
//! Splits the value under a square root into the part that can be taken out of the root and the
//! part that must stay inside: `√(8x³) = x√(8x)`, `√(36a²) = 6a`.

use crate::{
    ast::Node,
    error::MalformedTree,
    monomial::Monomial,
    power::extract_linear_powers,
    primitive::rational_sqrt,
    step_collector::StepCollector,
};
use std::fmt::{Display, Formatter};
use tutor_error::Error;

/// A value of the form `outside·√(inside)`.
///
/// Once fully decomposed, every exponent of [`RadicalComponent::inside`] is exactly 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadicalComponent {
    /// The factor in front of the root.
    pub outside: Monomial,

    /// The factor under the root.
    pub inside: Monomial,
}

/// A perfect square taken out of a root: `√(radicand) = extracted·√(rest)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// The monomial under the root before anything was taken out.
    pub radicand: Monomial,

    /// The monomial taken out of the root.
    pub extracted: Monomial,
}

impl Default for RadicalComponent {
    fn default() -> Self {
        Self::one()
    }
}

impl RadicalComponent {
    /// The component `1·√1`.
    pub fn one() -> Self {
        Self { outside: Monomial::one(), inside: Monomial::one() }
    }

    /// A component with nothing under the root.
    pub fn rational(outside: Monomial) -> Self {
        Self { outside, inside: Monomial::one() }
    }

    /// Returns true if nothing is left under the root.
    pub fn is_rational(&self) -> bool {
        self.inside.is_one()
    }

    /// Returns true if the component is written as a single factor, such as `3a`, `√(3a)`, or
    /// `a²`, so that it does not need parentheses as one side of a fraction.
    pub fn is_single_factor(&self) -> bool {
        if self.is_rational() {
            !self.outside.needs_parens()
        } else {
            self.outside.is_one()
        }
    }

    /// Multiplies both parts by the parts of another component, without decomposing the result.
    /// Returns [`None`] if an exponent overflows.
    pub fn checked_mul(&self, rhs: &RadicalComponent) -> Option<RadicalComponent> {
        Some(RadicalComponent {
            outside: self.outside.checked_mul(&rhs.outside)?,
            inside: self.inside.checked_mul(&rhs.inside)?,
        })
    }

    /// Decomposes the inside part again, moving whatever became a perfect square out of the root.
    /// Returns [`None`] if an exponent overflows.
    pub fn redecompose(&self, steps: &mut dyn StepCollector<Extraction>) -> Option<RadicalComponent> {
        let RadicalComponent { outside, inside } = decompose_recorded(&self.inside, steps);
        Some(RadicalComponent { outside: self.outside.checked_mul(&outside)?, inside })
    }

    /// Divides this component by another part-wise, then decomposes the inside part again.
    ///
    /// Returns [`None`] if either part of the divisor has a zero coefficient, or if an exponent
    /// overflows.
    pub fn checked_div(
        &self,
        rhs: &RadicalComponent,
        steps: &mut dyn StepCollector<Extraction>,
    ) -> Option<RadicalComponent> {
        let component = RadicalComponent {
            outside: self.outside.checked_div(&rhs.outside)?,
            inside: self.inside.checked_div(&rhs.inside)?,
        };
        component.redecompose(steps)
    }
}

/// Splits `√(monomial)` into the part that can be taken out of the root and the part that stays.
///
/// The coefficient is taken out whole if its reduced numerator and denominator are both perfect
/// squares, and left inside otherwise. Each exponent `e` is split into `e div 2` outside and
/// `e mod 2` inside with Euclidean division, so negative exponents leave `0` or `1` inside as well:
/// `√(b⁻¹) = b⁻¹√b`.
pub fn decompose_under_sqrt(monomial: &Monomial) -> RadicalComponent {
    let (mut outside, mut inside) = match rational_sqrt(&monomial.coeff) {
        Some(root) => (Monomial::constant(root), Monomial::one()),
        None => (Monomial::one(), Monomial::constant(monomial.coeff.clone())),
    };

    for (name, exp) in &monomial.powers {
        let (half, rest) = (exp.div_euclid(2), exp.rem_euclid(2));
        if half != 0 {
            outside.powers.insert(name.clone(), half);
        }
        if rest != 0 {
            inside.powers.insert(name.clone(), rest);
        }
    }

    RadicalComponent { outside, inside }
}

/// Calls [`decompose_under_sqrt`], recording what is taken out of the root unless nothing is.
fn decompose_recorded(monomial: &Monomial, steps: &mut dyn StepCollector<Extraction>) -> RadicalComponent {
    let component = decompose_under_sqrt(monomial);
    if !component.outside.is_one() {
        steps.push(Extraction { radicand: monomial.clone(), extracted: component.outside.clone() });
    }
    component
}

/// Decomposes a single factor of a product: a [`Node::Sqrt`] is decomposed with
/// [`decompose_under_sqrt`], and any other factor is entirely outside of the root.
pub fn decompose_factor(factor: &Node, steps: &mut dyn StepCollector<Extraction>) -> Result<RadicalComponent, Error> {
    match factor {
        Node::Sqrt(radicand) => Ok(decompose_recorded(&extract_linear_powers(radicand)?, steps)),
        other => Ok(RadicalComponent::rational(extract_linear_powers(other)?)),
    }
}

/// Multiplies the decomposed top-level factors of a node together, without decomposing the
/// combined inside part again. This is the intermediate `a√(36a²)` in
/// `a√(12a) · √(3a) = a√(36a²) = 6a²`.
pub fn accumulate_radical_product(
    node: &Node,
    steps: &mut dyn StepCollector<Extraction>,
) -> Result<RadicalComponent, Error> {
    node.factors()
        .iter()
        .try_fold(RadicalComponent::one(), |acc, factor| {
            acc.checked_mul(&decompose_factor(factor, steps)?)
                .ok_or_else(|| Error::whole(node.to_string(), MalformedTree::exponent_too_large()))
        })
}

/// Decomposes a product of square roots and plain factors into a single `outside·√(inside)`,
/// recording every perfect square taken out of a root.
///
/// A node that is not a [`Node::Product`] is treated as a product of one factor.
pub fn simplify_radical_product(
    node: &Node,
    steps: &mut dyn StepCollector<Extraction>,
) -> Result<RadicalComponent, Error> {
    accumulate_radical_product(node, steps)?
        .redecompose(steps)
        .ok_or_else(|| Error::whole(node.to_string(), MalformedTree::exponent_too_large()))
}

/// Writes a monomial so it can be followed by `√`: `-` for `-1`, and parenthesized if it is a
/// fraction.
fn outside_text(outside: &Monomial) -> String {
    if outside.is_constant() && outside.coeff == -1 {
        "-".to_string()
    } else if *outside.coeff.denom() != 1 || outside.powers.values().any(|exp| *exp < 0) {
        format!("({})", outside)
    } else {
        outside.to_string()
    }
}

/// Writes `√` followed by the monomial, parenthesized if it has more than one factor.
pub fn format_root(inside: &Monomial) -> String {
    if inside.needs_parens() {
        format!("√({})", inside)
    } else {
        format!("√{}", inside)
    }
}

/// Renders a component as `outside·√(inside)`, e.g. `x√(8x)`. The outside part is omitted if it
/// is 1, and the root is omitted if the inside part is 1.
pub fn format_radical_component(component: &RadicalComponent) -> String {
    match (component.outside.is_one(), component.is_rational()) {
        (_, true) => component.outside.to_string(),
        (true, false) => format_root(&component.inside),
        (false, false) => format!("{}{}", outside_text(&component.outside), format_root(&component.inside)),
    }
}

/// Renders a component, parenthesized if it is not a single factor.
pub fn format_operand(component: &RadicalComponent) -> String {
    if component.is_single_factor() {
        format_radical_component(component)
    } else {
        format!("({})", format_radical_component(component))
    }
}

/// Renders the fraction of two components, e.g. `(6a²)/(2a)` or `√3/2`.
pub fn format_fraction(numerator: &RadicalComponent, denominator: &RadicalComponent) -> String {
    let numerator = if numerator.is_single_factor() && numerator.outside.coeff >= 0 {
        format_radical_component(numerator)
    } else {
        format!("({})", format_radical_component(numerator))
    };
    format!("{}/{}", numerator, format_operand(denominator))
}

/// Splits a monomial into its largest perfect-square factor and the rest, as in
/// `√(8x³) = √x² · √(8x)`. The perfect square is returned as the monomial that is squared.
pub fn square_part(monomial: &Monomial) -> (Monomial, Monomial) {
    let RadicalComponent { outside, inside } = decompose_under_sqrt(monomial);
    (outside, inside)
}

/// Renders `√(square)²`, the perfect-square part of a radicand, e.g. `√x²` or `√(3x)²`.
pub fn format_square(root: &Monomial) -> String {
    let needs_parens = root.needs_parens()
        || root.coeff < 0
        || root.powers.values().any(|exp| *exp != 1);
    if needs_parens {
        format!("√({})²", root)
    } else {
        format!("√{}²", root)
    }
}

impl Display for RadicalComponent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_radical_component(self))
    }
}

#[cfg(test)]
mod tests {
    use crate::primitive::rational;
    use pretty_assertions::assert_eq;
    use super::*;

    fn a() -> Node {
        Node::var("a")
    }

    #[test]
    fn decompose_perfect_square_coefficient() {
        let monomial = Monomial::new(rational(36), [("a", 2)]);
        assert_eq!(decompose_under_sqrt(&monomial), RadicalComponent {
            outside: Monomial::new(rational(6), [("a", 1)]),
            inside: Monomial::one(),
        });
    }

    #[test]
    fn decompose_keeps_coefficient_inside() {
        let monomial = Monomial::new(rational(8), [("x", 3)]);
        let component = decompose_under_sqrt(&monomial);
        assert_eq!(component, RadicalComponent {
            outside: Monomial::variable("x"),
            inside: Monomial::new(rational(8), [("x", 1)]),
        });
        assert_eq!(component.to_string(), "x√(8x)");
    }

    #[test]
    fn decompose_rational_coefficient() {
        let component = decompose_under_sqrt(&Monomial::constant(rational((9, 4))));
        assert_eq!(component.to_string(), "3/2");

        let component = decompose_under_sqrt(&Monomial::constant(rational((4, 3))));
        assert_eq!(component.to_string(), "√(4/3)");
    }

    #[test]
    fn decompose_negative_exponent() {
        let component = decompose_under_sqrt(&Monomial::new(rational(1), [("b", -1)]));
        assert_eq!(component, RadicalComponent {
            outside: Monomial::new(rational(1), [("b", -1)]),
            inside: Monomial::variable("b"),
        });
        assert_eq!(component.to_string(), "(1/b)√b");
    }

    #[test]
    fn decompose_is_idempotent_on_inside() {
        let monomial = Monomial::new(rational(12), [("a", 5), ("b", 2), ("c", -3)]);
        let first = decompose_under_sqrt(&monomial);
        assert!(first.inside.powers.values().all(|exp| *exp == 1));

        let second = decompose_under_sqrt(&first.inside);
        assert_eq!(second.outside, Monomial::one());
        assert_eq!(second.inside, first.inside);
    }

    #[test]
    fn product_of_roots() {
        let node = Node::product(vec![
            Node::sqrt(Node::product(vec![Node::int(12), Node::pow(a(), Node::int(3))])),
            Node::sqrt(Node::product(vec![Node::int(3), a()])),
        ]);

        let accumulated = accumulate_radical_product(&node, &mut ()).unwrap();
        assert_eq!(accumulated.to_string(), "a√(36a²)");

        let mut extractions = Vec::new();
        let simplified = simplify_radical_product(&node, &mut extractions).unwrap();
        assert_eq!(simplified, RadicalComponent::rational(Monomial::new(rational(6), [("a", 2)])));
        assert_eq!(extractions, vec![
            Extraction {
                radicand: Monomial::new(rational(12), [("a", 3)]),
                extracted: Monomial::variable("a"),
            },
            Extraction {
                radicand: Monomial::new(rational(36), [("a", 2)]),
                extracted: Monomial::new(rational(6), [("a", 1)]),
            },
        ]);
    }

    #[test]
    fn product_with_plain_factors() {
        let node = Node::product(vec![Node::int(2), a(), Node::sqrt(Node::int(50))]);
        let mut extractions = Vec::new();
        assert_eq!(simplify_radical_product(&node, &mut extractions).unwrap().to_string(), "2a√50");
        assert!(extractions.is_empty());
    }

    #[test]
    fn single_root_is_one_factor_product() {
        let node = Node::sqrt(Node::product(vec![Node::int(8), Node::pow(Node::var("x"), Node::int(3))]));
        assert_eq!(simplify_radical_product(&node, &mut ()).unwrap().to_string(), "x√(8x)");
    }

    #[test]
    fn cancel_across_fraction() {
        let numerator = RadicalComponent::rational(Monomial::new(rational(6), [("a", 2)]));
        let denominator = RadicalComponent::rational(Monomial::new(rational(2), [("a", 1)]));
        assert_eq!(format_fraction(&numerator, &denominator), "(6a²)/(2a)");
        assert_eq!(
            numerator.checked_div(&denominator, &mut ()),
            Some(RadicalComponent::rational(Monomial::new(rational(3), [("a", 1)]))),
        );
    }

    #[test]
    fn cancel_roots_across_fraction() {
        let numerator = decompose_under_sqrt(&Monomial::new(rational(1), [("a", 3)]));
        let denominator = decompose_under_sqrt(&Monomial::variable("a"));
        let mut extractions = Vec::new();
        assert_eq!(numerator.checked_div(&denominator, &mut extractions).unwrap().to_string(), "a");
        assert!(extractions.is_empty());

        // √(a³b)/√b = √(a³) = a√a
        let numerator = decompose_under_sqrt(&Monomial::new(rational(1), [("a", 3), ("b", 1)]));
        let denominator = decompose_under_sqrt(&Monomial::variable("b"));
        assert_eq!(numerator.checked_div(&denominator, &mut extractions).unwrap().to_string(), "a√a");
        assert!(extractions.is_empty());
    }

    #[test]
    fn format_components() {
        assert_eq!(RadicalComponent::one().to_string(), "1");
        assert_eq!(
            RadicalComponent { outside: Monomial::constant(rational(-1)), inside: Monomial::constant(rational(3)) }
                .to_string(),
            "-√3",
        );
        assert_eq!(format_square(&Monomial::variable("x")), "√x²");
        assert_eq!(format_square(&Monomial::new(rational(1), [("x", 2)])), "√(x²)²");
    }
}
