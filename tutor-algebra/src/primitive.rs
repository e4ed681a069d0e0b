//! Functions to construct [`Integer`]s, [`Rational`]s, and [`Float`]s from various types.

use rug::{ops::Pow, Assign, Float, Integer, Rational};

/// The number of bits of precision to use when computing floating-point values.
///
/// Floating-point values only appear when the square root of an irrational value is taken for
/// display, so this is far more than is ever printed.
pub const PRECISION: u32 = 1 << 8;

/// The largest exponent, in absolute value, a number is ever raised to.
///
/// Larger exponents are reported as a malformed tree instead of being computed.
pub const MAX_EXPONENT: i64 = 1 << 12;

/// Creates a [`Rational`] with the given value.
pub fn rational<T>(n: T) -> Rational
where
    Rational: From<T>,
{
    Rational::from(n)
}

/// Creates a [`Float`] with the given value.
pub fn float<T>(n: T) -> Float
where
    Float: Assign<T>,
{
    Float::with_val(PRECISION, n)
}

/// Returns the exact square root of the given rational, if there is one.
///
/// A rational has an exact square root when the numerator and denominator of its reduced form are
/// both perfect squares. Negative rationals never do.
pub fn rational_sqrt(n: &Rational) -> Option<Rational> {
    let (numer, denom) = (n.numer(), n.denom());
    if numer.is_perfect_square() && denom.is_perfect_square() {
        Some(Rational::from((numer.clone().sqrt(), denom.clone().sqrt())))
    } else {
        None
    }
}

/// Raises the given rational to an integer power, returning [`None`] if the base is zero and the
/// exponent is negative, or if the exponent is larger than [`MAX_EXPONENT`] in absolute value.
pub fn rational_pow(base: &Rational, exp: i64) -> Option<Rational> {
    if exp < 0 && *base == 0 {
        return None;
    }

    let exp = i32::try_from(exp).ok().filter(|exp| i64::from(exp.unsigned_abs()) <= MAX_EXPONENT)?;
    Some(base.clone().pow(exp))
}

/// Parses an exact rational from a string.
///
/// Accepted forms are integers (`-12`), fractions of integers (`3/4`), and decimals with either a
/// `.` or a `,` separator and an optional exponent (`0.25`, `-0,5`, `1e-3`). Decimals are converted
/// exactly from their digits, so `0.1` becomes `1/10`.
pub fn rational_from_str(s: &str) -> Option<Rational> {
    let s = s.trim();
    if let Some((numer, denom)) = s.split_once('/') {
        let numer = Integer::from_str_radix(numer.trim(), 10).ok()?;
        let denom = Integer::from_str_radix(denom.trim(), 10).ok()?;
        if denom == 0 {
            return None;
        }
        return Some(Rational::from((numer, denom)));
    }

    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(idx) => (&s[..idx], s[idx + 1..].parse::<i32>().ok()?),
        None => (s, 0),
    };

    let (negative, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa.strip_prefix('+').unwrap_or(mantissa)),
    };

    let (whole, fractional) = match mantissa.find(['.', ',']) {
        Some(idx) => (&mantissa[..idx], &mantissa[idx + 1..]),
        None => (mantissa, ""),
    };

    if whole.is_empty() && fractional.is_empty() {
        return None;
    }
    if !whole.chars().chain(fractional.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }

    let digits = Integer::from_str_radix(&format!("{}{}", whole, fractional), 10).ok()?;
    let scale = exponent - i32::try_from(fractional.len()).ok()?;
    let mut value = Rational::from(digits) * Rational::from(10).pow(scale);
    if negative {
        value = -value;
    }
    Some(value)
}

/// Returns the number of fractional digits in the decimal expansion of the given rational, or
/// [`None`] if the expansion does not terminate (its reduced denominator has a prime factor other
/// than 2 and 5).
pub fn terminating_places(n: &Rational) -> Option<usize> {
    let mut denom = n.denom().clone();
    let mut places = 0;
    for p in [2u32, 5] {
        let mut count = 0;
        while denom.is_divisible_u(p) {
            denom /= p;
            count += 1;
        }
        places = places.max(count);
    }
    (denom == 1).then_some(places)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn exact_square_roots() {
        assert_eq!(rational_sqrt(&rational((9, 4))), Some(rational((3, 2))));
        assert_eq!(rational_sqrt(&rational(0)), Some(rational(0)));
        assert_eq!(rational_sqrt(&rational(12)), None);
        assert_eq!(rational_sqrt(&rational((4, 3))), None);
        assert_eq!(rational_sqrt(&rational(-4)), None);
    }

    #[test]
    fn powers() {
        assert_eq!(rational_pow(&rational(2), 7), Some(rational(128)));
        assert_eq!(rational_pow(&rational((2, 3)), -2), Some(rational((9, 4))));
        assert_eq!(rational_pow(&rational(0), -1), None);
        assert_eq!(rational_pow(&rational(5), 0), Some(rational(1)));
        assert_eq!(rational_pow(&rational(-1), MAX_EXPONENT), Some(rational(1)));
    }

    #[test]
    fn huge_powers_are_refused() {
        assert_eq!(rational_pow(&rational(10), MAX_EXPONENT + 1), None);
        assert_eq!(rational_pow(&rational(10), -MAX_EXPONENT - 1), None);
        assert_eq!(rational_pow(&rational(10), i64::from(i32::MAX)), None);
        assert_eq!(rational_pow(&rational(1), i64::MIN), None);
    }

    #[test]
    fn parse_rationals() {
        assert_eq!(rational_from_str("128"), Some(rational(128)));
        assert_eq!(rational_from_str("-3/6"), Some(rational((-1, 2))));
        assert_eq!(rational_from_str("0.25"), Some(rational((1, 4))));
        assert_eq!(rational_from_str("-0,5"), Some(rational((-1, 2))));
        assert_eq!(rational_from_str("1e-3"), Some(rational((1, 1000))));
        assert_eq!(rational_from_str("2.5E2"), Some(rational(250)));
        assert_eq!(rational_from_str(".5"), Some(rational((1, 2))));
        assert_eq!(rational_from_str("1/0"), None);
        assert_eq!(rational_from_str("abc"), None);
        assert_eq!(rational_from_str(""), None);
        assert_eq!(rational_from_str("-"), None);
    }

    #[test]
    fn terminating_decimals() {
        assert_eq!(terminating_places(&rational((3, 40))), Some(3));
        assert_eq!(terminating_places(&rational(7)), Some(0));
        assert_eq!(terminating_places(&rational((1, 3))), None);
    }
}
