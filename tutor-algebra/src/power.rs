//! The power-law simplifier.
//!
//! Applies the exponent laws `(aᵐ)ⁿ = aᵐ·ⁿ`, `aᵐ · aⁿ = aᵐ⁺ⁿ`, and `aᵐ/aⁿ = aᵐ⁻ⁿ` to expressions
//! built from integers, variables, powers with integer exponents, products, and fractions, and
//! builds the formula strings that show each law being applied.

use crate::{
    ast::Node,
    error::{DivisionByZero, MalformedTree, NonIntegerExponent},
    monomial::{fmt_power, Monomial},
    render::{render_denominator, render_power_base, superscript},
    step_collector::StepCollector,
};
use rug::Rational;
use std::collections::BTreeMap;
use tutor_error::Error;

/// A single application of `(bⁱ)ᵒ = bⁱ·ᵒ`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerTransform {
    /// The base of the inner power.
    pub base: Node,

    /// The exponent of the inner power.
    pub inner: i64,

    /// The exponent the inner power is raised to.
    pub outer: i64,

    /// The product of the two exponents.
    pub result: i64,
}

/// Rewrites every power of a power with literal integer exponents into a single power, recording
/// each rewrite in `steps`.
///
/// The tree is rewritten bottom-up, so a tower such as `((a²)³)⁴` collapses fully in two recorded
/// rewrites. Subtrees that cannot be collapsed are returned unchanged.
pub fn collapse_power_of_power(node: &Node, steps: &mut dyn StepCollector<PowerTransform>) -> Node {
    match node {
        Node::Integer(_) | Node::Variable(_) => node.clone(),
        Node::Power(base, exp) => {
            let base = collapse_power_of_power(base, steps);
            let exp = collapse_power_of_power(exp, steps);

            if let (Node::Power(inner_base, inner_exp), Node::Integer(outer)) = (&base, &exp) {
                if let Node::Integer(inner) = **inner_exp {
                    if let Some(result) = inner.checked_mul(*outer) {
                        steps.push(PowerTransform {
                            base: (**inner_base).clone(),
                            inner,
                            outer: *outer,
                            result,
                        });
                        return Node::pow((**inner_base).clone(), Node::int(result));
                    }
                }
            }

            Node::pow(base, exp)
        },
        Node::Product(factors) => Node::product(
            factors.iter()
                .map(|factor| collapse_power_of_power(factor, steps))
                .collect()
        ),
        Node::Fraction(numerator, denominator) => Node::frac(
            collapse_power_of_power(numerator, steps),
            collapse_power_of_power(denominator, steps),
        ),
        Node::Sqrt(radicand) => Node::sqrt(collapse_power_of_power(radicand, steps)),
        Node::BinaryOp(op, left, right) => Node::binary(
            *op,
            collapse_power_of_power(left, steps),
            collapse_power_of_power(right, steps),
        ),
        Node::RangeQuery(left, right) => Node::range(
            collapse_power_of_power(left, steps),
            collapse_power_of_power(right, steps),
        ),
    }
}

/// Calls [`collapse_power_of_power`], returning the rewritten tree along with every rewrite.
pub fn collapse_all(node: &Node) -> (Node, Vec<PowerTransform>) {
    let mut transforms = Vec::new();
    let node = collapse_power_of_power(node, &mut transforms);
    (node, transforms)
}

/// Reduces an expression made of integers, variables, integer powers, products, and fractions to a
/// single [`Monomial`].
///
/// Returns [`NonIntegerExponent`] if a power has an exponent that is not a literal integer,
/// [`DivisionByZero`] if a zero is divided by or raised to a negative power, and [`MalformedTree`]
/// for any other kind of node.
pub fn extract_linear_powers(node: &Node) -> Result<Monomial, Error> {
    match node {
        Node::Integer(value) => Ok(Monomial::constant(Rational::from(*value))),
        Node::Variable(name) => Ok(Monomial::variable(name.as_str())),
        Node::Power(base, exp) => {
            let Node::Integer(exp) = **exp else {
                let base_len = render_power_base(base).chars().count();
                let src = node.to_string();
                // the exponent is written after a `^`
                let end = src.chars().count();
                return Err(Error::new(src, vec![0..base_len, base_len + 1..end], NonIntegerExponent));
            };

            let base = extract_linear_powers(base)?;
            base.checked_pow(exp).ok_or_else(|| if base.coeff == 0 && exp < 0 {
                Error::whole(node.to_string(), DivisionByZero)
            } else {
                Error::whole(node.to_string(), MalformedTree::exponent_too_large())
            })
        },
        Node::Product(factors) => factors.iter()
            .try_fold(Monomial::one(), |acc, factor| {
                acc.checked_mul(&extract_linear_powers(factor)?)
                    .ok_or_else(|| Error::whole(node.to_string(), MalformedTree::exponent_too_large()))
            }),
        Node::Fraction(numerator, denominator) => {
            let numerator_map = extract_linear_powers(numerator)?;
            let denominator_map = extract_linear_powers(denominator)?;
            numerator_map.checked_div(&denominator_map).ok_or_else(|| {
                let src = node.to_string();
                if denominator_map.coeff != 0 {
                    return Error::whole(src, MalformedTree::exponent_too_large());
                }
                let len = src.chars().count();
                let denominator_len = render_denominator(denominator).chars().count();
                Error::new(src, vec![len.saturating_sub(denominator_len)..len], DivisionByZero)
            })
        },
        Node::Sqrt(_) | Node::BinaryOp(..) | Node::RangeQuery(..) => Err(Error::whole(
            node.to_string(),
            MalformedTree {
                reason: format!("a {} cannot be reduced to a product of powers", node.tag()),
            },
        )),
    }
}

/// A product reduced to a [`Monomial`], keeping what each top-level factor contributed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductContributions {
    /// The coefficient of every factor whose coefficient is not 1, in order.
    pub coefficients: Vec<Rational>,

    /// For each variable, the exponent contributed by every factor that mentions it, in order.
    pub exponents: BTreeMap<String, Vec<i64>>,

    /// The product of all the factors.
    pub combined: Monomial,
}

/// Reduces the top-level factors of a node to a [`Monomial`] like [`extract_linear_powers`], but
/// also keeps the individual contributions so that `a⁶ · a⁵ = a⁶⁺⁵` can be shown with the
/// original exponents.
pub fn combine_product_to_map(node: &Node) -> Result<ProductContributions, Error> {
    let mut contributions = ProductContributions {
        coefficients: Vec::new(),
        exponents: BTreeMap::new(),
        combined: Monomial::one(),
    };

    for factor in node.factors() {
        let monomial = extract_linear_powers(factor)?;
        if monomial.coeff != 1 {
            contributions.coefficients.push(monomial.coeff.clone());
        }
        for (name, exp) in &monomial.powers {
            contributions.exponents.entry(name.clone()).or_default().push(*exp);
        }
        contributions.combined = contributions.combined
            .checked_mul(&monomial)
            .ok_or_else(|| Error::whole(node.to_string(), MalformedTree::exponent_too_large()))?;
    }

    Ok(contributions)
}

/// Writes a variable raised to an exponent, or `1` if the exponent is zero.
fn power_text(name: &str, exp: i64) -> String {
    let mut out = String::new();
    if exp == 0 {
        out.push('1');
    } else {
        // writing into a `String` cannot fail
        let _ = fmt_power(&mut out, name, exp);
    }
    out
}

/// Writes a rational number, parenthesized if it is negative or not an integer, as it appears in
/// the middle of a product or fraction.
fn operand_text(n: &Rational) -> String {
    if *n < 0 || *n.denom() != 1 {
        format!("({})", n)
    } else {
        n.to_string()
    }
}

/// Writes the exponents of a sum or difference, e.g. `6+5` or `11-4`, to be put in superscript.
fn exponent_terms(terms: &[i64]) -> String {
    let mut out = String::new();
    for (i, term) in terms.iter().enumerate() {
        if i > 0 && *term >= 0 {
            out.push('+');
        }
        out.push_str(&term.to_string());
    }
    out
}

/// Builds the formula for a single power-of-power rewrite, e.g. `(a²)³ = a²·³ = a⁶`.
pub fn build_collapse_formula(transform: &PowerTransform) -> String {
    let base = render_power_base(&transform.base);
    format!(
        "({}{}){} = {}{} = {}{}",
        base, superscript(&transform.inner.to_string()), superscript(&transform.outer.to_string()),
        base, superscript(&format!("{}·{}", transform.inner, transform.outer)),
        base, superscript(&transform.result.to_string()),
    )
}

/// Builds the formula for multiplying the factors of a product, one clause per variable that is
/// contributed to by at least two factors, e.g. `a⁶ · a⁵ = a⁶⁺⁵ = a¹¹`. If at least two factors
/// have coefficients, a leading clause such as `2 · 3 = 6` multiplies them.
///
/// Returns [`None`] if there is nothing to combine.
pub fn build_sum_formula(contributions: &ProductContributions) -> Option<String> {
    let mut clauses = Vec::new();

    if contributions.coefficients.len() >= 2 {
        let mut clause = contributions.coefficients
            .iter()
            .enumerate()
            .map(|(i, coeff)| if i == 0 && *coeff.denom() == 1 { coeff.to_string() } else { operand_text(coeff) })
            .collect::<Vec<_>>()
            .join(" · ");
        let product = contributions.coefficients
            .iter()
            .fold(Rational::from(1), |acc, coeff| acc * coeff);
        clause.push_str(&format!(" = {}", product));
        clauses.push(clause);
    }

    for (name, exps) in &contributions.exponents {
        if exps.len() < 2 {
            continue;
        }

        let lhs = exps.iter()
            .map(|exp| power_text(name, *exp))
            .collect::<Vec<_>>()
            .join(" · ");
        clauses.push(format!(
            "{} = {}{} = {}",
            lhs, name, superscript(&exponent_terms(exps)),
            power_text(name, contributions.combined.exponent(name)),
        ));
    }

    if clauses.is_empty() {
        None
    } else {
        Some(clauses.join("; "))
    }
}

/// Builds the formula for dividing one monomial by another, with one clause per variable of the
/// divisor, e.g. `a¹¹/a⁴ = a¹¹⁻⁴ = a⁷`. A negative exponent in the divisor is shown as an addition:
/// `a⁴/a⁻² = a⁴⁺² = a⁶`. If the divisor has a coefficient other than 1, a leading clause such as
/// `6/2 = 3` divides the coefficients.
///
/// Returns [`None`] if the divisor is `1`, if its coefficient is zero, or if an exponent of the
/// quotient overflows.
pub fn build_division_formula(numerator: &Monomial, denominator: &Monomial) -> Option<String> {
    if denominator.coeff == 0 {
        return None;
    }

    let mut clauses = Vec::new();
    if denominator.coeff != 1 {
        let quotient = Rational::from(&numerator.coeff / &denominator.coeff);
        let lhs = if *numerator.coeff.denom() == 1 {
            numerator.coeff.to_string()
        } else {
            operand_text(&numerator.coeff)
        };
        clauses.push(format!("{}/{} = {}", lhs, operand_text(&denominator.coeff), quotient));
    }

    for (name, subtrahend) in &denominator.powers {
        let minuend = numerator.exponent(name);
        let negated = subtrahend.checked_neg()?;
        let difference = minuend.checked_add(negated)?;
        let terms = exponent_terms(&[minuend, negated]);
        if minuend == 0 {
            clauses.push(format!(
                "1/{} = {}",
                power_text(name, *subtrahend), power_text(name, difference),
            ));
        } else {
            clauses.push(format!(
                "{}/{} = {}{} = {}",
                power_text(name, minuend), power_text(name, *subtrahend),
                name, superscript(&terms), power_text(name, difference),
            ));
        }
    }

    if clauses.is_empty() {
        None
    } else {
        Some(clauses.join("; "))
    }
}
