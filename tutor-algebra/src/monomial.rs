//! A rational coefficient times a product of variables raised to integer powers.
//!
//! [`Monomial`] is the canonical form the power-law simplifier reduces expressions to, and the
//! building block of the radical decomposer's `outside·√(inside)` components.

use crate::render::superscript;
use rug::{Integer, Rational};
use std::{collections::BTreeMap, fmt::{Display, Formatter}};

/// Maps each variable to its integer exponent.
///
/// A [`BTreeMap`] keeps the variables in lexicographic order, which is the order they are always
/// displayed in.
pub type ExponentMap = BTreeMap<String, i64>;

/// A rational coefficient times a product of variables raised to integer powers, such as `3a²b⁻¹`.
///
/// The exponent map never contains a zero exponent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monomial {
    /// The coefficient.
    pub coeff: Rational,

    /// The exponent of every variable.
    pub powers: ExponentMap,
}

impl Default for Monomial {
    fn default() -> Self {
        Self::one()
    }
}

impl Monomial {
    /// The monomial `1`.
    pub fn one() -> Self {
        Self::constant(Rational::from(1))
    }

    /// A monomial with no variables.
    pub fn constant(coeff: Rational) -> Self {
        Self { coeff, powers: ExponentMap::new() }
    }

    /// A single variable with exponent 1.
    pub fn variable(name: impl Into<String>) -> Self {
        let mut powers = ExponentMap::new();
        powers.insert(name.into(), 1);
        Self { coeff: Rational::from(1), powers }
    }

    /// Creates a monomial from a coefficient and a list of `(variable, exponent)` pairs. Zero
    /// exponents are skipped, and a repeated variable keeps its last exponent.
    pub fn new<'a>(coeff: Rational, powers: impl IntoIterator<Item = (&'a str, i64)>) -> Self {
        Self {
            coeff,
            powers: powers.into_iter()
                .filter(|(_, exp)| *exp != 0)
                .map(|(name, exp)| (name.to_string(), exp))
                .collect(),
        }
    }

    /// Returns true if this is the monomial `1`.
    pub fn is_one(&self) -> bool {
        self.coeff == 1 && self.powers.is_empty()
    }

    /// Returns true if the monomial has no variables.
    pub fn is_constant(&self) -> bool {
        self.powers.is_empty()
    }

    /// Returns the exponent of the given variable, which is 0 if it does not appear.
    pub fn exponent(&self, name: &str) -> i64 {
        self.powers.get(name).copied().unwrap_or(0)
    }

    /// Adds `exp` to the exponent of the given variable, removing it if the sum is zero. Returns
    /// [`None`] and leaves the monomial unchanged if the sum overflows.
    pub fn checked_add_exponent(&mut self, name: &str, exp: i64) -> Option<()> {
        let sum = self.exponent(name).checked_add(exp)?;
        if sum == 0 {
            self.powers.remove(name);
        } else {
            self.powers.insert(name.to_string(), sum);
        }
        Some(())
    }

    /// Multiplies this monomial by another, returning [`None`] if an exponent overflows.
    pub fn checked_mul(&self, rhs: &Monomial) -> Option<Monomial> {
        let mut result = self.clone();
        result.coeff *= &rhs.coeff;
        for (name, exp) in &rhs.powers {
            result.checked_add_exponent(name, *exp)?;
        }
        Some(result)
    }

    /// Divides this monomial by another, returning [`None`] if the divisor's coefficient is zero or
    /// if an exponent overflows.
    pub fn checked_div(&self, rhs: &Monomial) -> Option<Monomial> {
        if rhs.coeff == 0 {
            return None;
        }

        let mut result = self.clone();
        result.coeff /= &rhs.coeff;
        for (name, exp) in &rhs.powers {
            result.checked_add_exponent(name, exp.checked_neg()?)?;
        }
        Some(result)
    }

    /// Raises this monomial to an integer power, returning [`None`] if the coefficient is zero and
    /// the exponent negative, or if the result is too large to represent.
    pub fn checked_pow(&self, exp: i64) -> Option<Monomial> {
        let coeff = crate::primitive::rational_pow(&self.coeff, exp)?;
        let powers = if exp == 0 {
            ExponentMap::new()
        } else {
            self.powers
                .iter()
                .map(|(name, e)| Some((name.clone(), e.checked_mul(exp)?)))
                .collect::<Option<ExponentMap>>()?
        };
        Some(Self { coeff, powers })
    }

    /// Returns true if the monomial displays as more than a single factor (`3a`, `a · b`, `1/a`), so
    /// it needs parentheses when written under a root or as one side of a fraction.
    pub fn needs_parens(&self) -> bool {
        let (numerator, denominator) = self.split();
        !denominator.is_one() || factor_count(&numerator.coeff.numer().clone().abs(), &numerator.powers) > 1
    }

    /// Returns the part of the monomial with positive exponents and the coefficient's numerator,
    /// and the part with negative exponents (negated) and the coefficient's denominator.
    pub fn split(&self) -> (Monomial, Monomial) {
        let numerator = Monomial {
            coeff: Rational::from(self.coeff.numer().clone()),
            powers: self.powers.iter()
                .filter(|(_, exp)| **exp > 0)
                .map(|(name, exp)| (name.clone(), *exp))
                .collect(),
        };
        let denominator = Monomial {
            coeff: Rational::from(self.coeff.denom().clone()),
            powers: self.powers.iter()
                .filter(|(_, exp)| **exp < 0)
                .map(|(name, exp)| (name.clone(), -exp))
                .collect(),
        };
        (numerator, denominator)
    }
}

/// Writes the quotient of two monomials as a fraction, e.g. `a¹¹/a⁴` or `(6a²)/(2a)`. If the
/// divisor is 1, only the dividend is written.
pub fn format_quotient(numerator: &Monomial, denominator: &Monomial) -> String {
    if denominator.is_one() {
        return numerator.to_string();
    }

    let wrap = |monomial: &Monomial, parens: bool| if parens {
        format!("({})", monomial)
    } else {
        monomial.to_string()
    };
    format!(
        "{}/{}",
        wrap(numerator, numerator.needs_parens()),
        wrap(denominator, denominator.needs_parens() || denominator.coeff < 0),
    )
}

/// Writes `x` or `x` with a superscript exponent.
pub(crate) fn fmt_power(f: &mut impl std::fmt::Write, name: &str, exp: i64) -> std::fmt::Result {
    if exp == 1 {
        write!(f, "{}", name)
    } else {
        write!(f, "{}{}", name, superscript(&exp.to_string()))
    }
}

/// Writes an integer coefficient and positive powers as a product. The coefficient is left
/// implicit if it is 1.
fn fmt_positive(f: &mut Formatter<'_>, coeff: &Integer, powers: &ExponentMap) -> std::fmt::Result {
    if powers.is_empty() || *coeff != 1 {
        write!(f, "{}", coeff)?;
    }
    for (i, (name, exp)) in powers.iter().enumerate() {
        if i > 0 {
            write!(f, " · ")?;
        }
        fmt_power(f, name, *exp)?;
    }
    Ok(())
}

/// Returns the number of factors [`fmt_positive`] would write.
fn factor_count(coeff: &Integer, powers: &ExponentMap) -> usize {
    powers.len() + usize::from(powers.is_empty() || *coeff != 1)
}

impl Display for Monomial {
    /// Formats the monomial in the same notation as the renderer: `3a²`, `a · b`, `a/(2b²)`,
    /// `-3/4`.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let (numerator, denominator) = self.split();
        let numer = numerator.coeff.numer().clone().abs();
        let denom = denominator.coeff.numer();
        let negative = self.coeff < 0;

        if denominator.is_one() {
            if negative {
                write!(f, "-")?;
            }
            return fmt_positive(f, &numer, &numerator.powers);
        }

        let numer_parens = factor_count(&numer, &numerator.powers) > 1;
        if numer_parens {
            write!(f, "(")?;
        }
        if negative {
            write!(f, "-")?;
        }
        fmt_positive(f, &numer, &numerator.powers)?;
        if numer_parens {
            write!(f, ")")?;
        }

        write!(f, "/")?;
        let denom_parens = factor_count(denom, &denominator.powers) > 1;
        if denom_parens {
            write!(f, "(")?;
        }
        fmt_positive(f, denom, &denominator.powers)?;
        if denom_parens {
            write!(f, ")")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::primitive::rational;
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn multiply_prunes_zero_exponents() {
        let lhs = Monomial::new(rational(2), [("a", 3), ("b", -1)]);
        let rhs = Monomial::new(rational(3), [("b", 1)]);
        assert_eq!(lhs.checked_mul(&rhs), Some(Monomial::new(rational(6), [("a", 3)])));
    }

    #[test]
    fn exponent_overflow() {
        let huge = Monomial::new(rational(1), [("a", i64::MAX - 1)]);
        assert_eq!(huge.checked_mul(&Monomial::variable("a")), Some(Monomial::new(rational(1), [("a", i64::MAX)])));
        assert_eq!(huge.checked_mul(&huge), None);
        assert_eq!(huge.checked_div(&Monomial::new(rational(1), [("a", -2)])), None);
        assert_eq!(Monomial::one().checked_div(&Monomial::new(rational(1), [("a", i64::MIN)])), None);
        assert_eq!(huge.checked_pow(2), None);

        let mut monomial = huge.clone();
        assert_eq!(monomial.checked_add_exponent("a", 2), None);
        assert_eq!(monomial, huge);
    }

    #[test]
    fn divide() {
        let lhs = Monomial::new(rational(1), [("a", 11)]);
        let rhs = Monomial::new(rational(2), [("a", 4), ("b", 1)]);
        assert_eq!(
            lhs.checked_div(&rhs),
            Some(Monomial::new(rational((1, 2)), [("a", 7), ("b", -1)])),
        );
        assert_eq!(lhs.checked_div(&Monomial::constant(rational(0))), None);
    }

    #[test]
    fn power() {
        let base = Monomial::new(rational(-2), [("a", 2)]);
        assert_eq!(base.checked_pow(3), Some(Monomial::new(rational(-8), [("a", 6)])));
        assert_eq!(base.checked_pow(0), Some(Monomial::one()));
        assert_eq!(Monomial::constant(rational(0)).checked_pow(-1), None);
    }

    #[test]
    fn display() {
        assert_eq!(Monomial::new(rational(3), [("a", 2)]).to_string(), "3a²");
        assert_eq!(Monomial::new(rational(1), [("a", 1), ("b", 1)]).to_string(), "a · b");
        assert_eq!(Monomial::new(rational(-1), [("x", 7)]).to_string(), "-x⁷");
        assert_eq!(Monomial::new(rational((1, 2)), [("a", 1), ("b", -2)]).to_string(), "a/(2b²)");
        assert_eq!(Monomial::constant(rational((-3, 4))).to_string(), "-3/4");
        assert_eq!(Monomial::new(rational(6), [("b", -1)]).to_string(), "6/b");
        assert_eq!(Monomial::new(rational(-6), [("a", 1), ("b", -1)]).to_string(), "(-6a)/b");
        assert_eq!(Monomial::one().to_string(), "1");
    }

    #[test]
    fn quotient() {
        let numerator = Monomial::new(rational(1), [("a", 11)]);
        let denominator = Monomial::new(rational(1), [("a", 4)]);
        assert_eq!(format_quotient(&numerator, &denominator), "a¹¹/a⁴");

        let numerator = Monomial::new(rational(6), [("a", 2)]);
        let denominator = Monomial::new(rational(2), [("a", 1)]);
        assert_eq!(format_quotient(&numerator, &denominator), "(6a²)/(2a)");
        assert_eq!(format_quotient(&numerator, &Monomial::one()), "6a²");
    }

    #[test]
    fn parenthesization() {
        assert!(!Monomial::variable("a").needs_parens());
        assert!(!Monomial::new(rational(-1), [("a", 2)]).needs_parens());
        assert!(Monomial::new(rational(12), [("a", 1)]).needs_parens());
        assert!(Monomial::new(rational(1), [("a", -1)]).needs_parens());
        assert!(!Monomial::constant(rational(3)).needs_parens());
    }
}
