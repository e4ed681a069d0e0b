//! Formatting of computed values for display to students.

use crate::{eval::Value, primitive::terminating_places};
use rug::{ops::Pow, Integer, Rational};

/// Formatting options for values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// How to format an exact value.
    pub number: NumberFormat,

    /// The maximum number of fractional digits to show when a value is written as a decimal.
    /// Trailing zeros are trimmed.
    pub decimal_places: usize,

    /// The character that separates the integer part of a decimal from its fractional part.
    pub separator: DecimalSeparator,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            number: NumberFormat::default(),
            decimal_places: 4,
            separator: DecimalSeparator::default(),
        }
    }
}

impl FormatOptions {
    /// Wraps the given [`FormatOptions`] into a builder for further customization.
    pub fn into_builder(self) -> FormatOptionsBuilder {
        FormatOptionsBuilder(self)
    }
}

/// The different ways to format an exact value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    /// Formats exact values as a reduced fraction `p/q`, or as an integer if `q = 1`.
    ///
    /// This is the default option.
    #[default]
    Fraction,

    /// Formats exact values as decimals if their decimal expansion terminates, and as fractions
    /// otherwise.
    Decimal,
}

impl NumberFormat {
    /// Utility function to create a new [`FormatOptions`] with the same formating options as the
    /// given [`FormatOptions`], but with the number format set to this value.
    pub fn inside(self, options: FormatOptions) -> FormatOptions {
        FormatOptions {
            number: self,
            ..options
        }
    }
}

/// The character that separates the integer and fractional parts of a decimal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DecimalSeparator {
    /// `3,1416`. This is the convention of the exams the tasks come from.
    ///
    /// This is the default option.
    #[default]
    Comma,

    /// `3.1416`.
    Point,
}

impl DecimalSeparator {
    /// Returns the separator character.
    pub fn as_char(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Point => '.',
        }
    }

    /// Utility function to create a new [`FormatOptions`] with the same formating options as the
    /// given [`FormatOptions`], but with the separator set to this value.
    pub fn inside(self, options: FormatOptions) -> FormatOptions {
        FormatOptions {
            separator: self,
            ..options
        }
    }
}

/// Helper struct to build a [`FormatOptions`] struct.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptionsBuilder(FormatOptions);

impl FormatOptionsBuilder {
    /// Creates a new builder with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number format. See [`NumberFormat`] for more information.
    pub fn number(mut self, number: NumberFormat) -> Self {
        self.0.number = number;
        self
    }

    /// Sets the number of fractional digits shown in decimals.
    pub fn decimal_places(mut self, decimal_places: usize) -> Self {
        self.0.decimal_places = decimal_places;
        self
    }

    /// Sets the decimal separator. See [`DecimalSeparator`] for more information.
    pub fn separator(mut self, separator: DecimalSeparator) -> Self {
        self.0.separator = separator;
        self
    }

    /// Builds the [`FormatOptions`] struct.
    pub fn build(self) -> FormatOptions {
        self.0
    }
}

/// Rounds a rational half away from zero to the given number of fractional digits, and writes it
/// in decimal notation with trailing zeros trimmed.
fn fmt_rounded(n: &Rational, places: usize, separator: DecimalSeparator) -> String {
    let negative = *n < 0;
    let abs = Rational::from(n.abs_ref());
    let scale = Integer::from(10).pow(places as u32);
    let numer = Integer::from(abs.numer() * &scale);
    let denom = abs.denom();

    // round(numer / denom) = floor((2 * numer + denom) / (2 * denom)) for non-negative values
    let rounded = (numer * 2u32 + denom) / Integer::from(denom * 2u32);

    let mut digits = rounded.to_string();
    if digits.len() <= places {
        digits.insert_str(0, &"0".repeat(places + 1 - digits.len()));
    }
    let (whole, fractional) = digits.split_at(digits.len() - places);
    let fractional = fractional.trim_end_matches('0');

    let sign = if negative && !digits.chars().all(|c| c == '0') { "-" } else { "" };
    if fractional.is_empty() {
        format!("{}{}", sign, whole)
    } else {
        format!("{}{}{}{}", sign, whole, separator.as_char(), fractional)
    }
}

/// Formats an exact value according to the options.
pub fn format_rational(n: &Rational, options: FormatOptions) -> String {
    if *n.denom() == 1 {
        return n.numer().to_string();
    }

    match (options.number, terminating_places(n)) {
        (NumberFormat::Decimal, Some(places)) => fmt_rounded(n, places, options.separator),
        _ => n.to_string(),
    }
}

/// Formats a value according to the options. Exact values are formatted with
/// [`format_rational`]; approximate values are rounded to [`FormatOptions::decimal_places`].
pub fn format_number(value: &Value, options: FormatOptions) -> String {
    match value {
        Value::Exact(n) => format_rational(n, options),
        Value::Approx(f) => match f.to_rational() {
            Some(n) => fmt_rounded(&n, options.decimal_places, options.separator),
            None => f.to_string(),
        },
    }
}

/// Formats a value as a decimal, regardless of [`FormatOptions::number`].
///
/// Returns the decimal and whether it is exactly equal to the value. It is exact if the value is
/// exact and its decimal expansion ends within [`FormatOptions::decimal_places`] digits.
pub fn format_decimal(value: &Value, options: FormatOptions) -> (String, bool) {
    match value {
        Value::Exact(n) => match terminating_places(n) {
            Some(places) if places <= options.decimal_places => {
                (fmt_rounded(n, places, options.separator), true)
            },
            _ => (fmt_rounded(n, options.decimal_places, options.separator), false),
        },
        Value::Approx(_) => (format_number(value, options), false),
    }
}

#[cfg(test)]
mod tests {
    use crate::primitive::{float, rational};
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn integers_and_fractions() {
        let options = FormatOptions::default();
        assert_eq!(format_number(&Value::Exact(rational(128)), options), "128");
        assert_eq!(format_number(&Value::Exact(rational((-6, 4))), options), "-3/2");
    }

    #[test]
    fn decimal_number_format() {
        let options = NumberFormat::Decimal.inside(FormatOptions::default());
        assert_eq!(format_number(&Value::Exact(rational((3, 8))), options), "0,375");
        assert_eq!(format_number(&Value::Exact(rational((1, 3))), options), "1/3");
    }

    #[test]
    fn approximate_values() {
        let value = Value::Approx(float(24).sqrt() * 3);
        assert_eq!(format_number(&value, FormatOptions::default()), "14,6969");

        let options = FormatOptionsBuilder::new()
            .decimal_places(2)
            .separator(DecimalSeparator::Point)
            .build();
        assert_eq!(format_number(&value, options), "14.7");

        let options = DecimalSeparator::Point.inside(options.into_builder().decimal_places(3).build());
        assert_eq!(format_number(&value, options), "14.697");
    }

    #[test]
    fn rounding() {
        assert_eq!(fmt_rounded(&rational((2, 3)), 4, DecimalSeparator::Comma), "0,6667");
        assert_eq!(fmt_rounded(&rational((-1, 8)), 2, DecimalSeparator::Point), "-0.13");
        assert_eq!(fmt_rounded(&rational((-1, 1000)), 2, DecimalSeparator::Point), "0");
        assert_eq!(fmt_rounded(&rational((199, 100)), 1, DecimalSeparator::Point), "2");
        assert_eq!(fmt_rounded(&rational(42), 0, DecimalSeparator::Point), "42");
    }

    #[test]
    fn decimals() {
        let options = FormatOptions::default();
        assert_eq!(format_decimal(&Value::Exact(rational((3, 2))), options), ("1,5".to_string(), true));
        assert_eq!(format_decimal(&Value::Exact(rational((1, 3))), options), ("0,3333".to_string(), false));
        assert_eq!(format_decimal(&Value::Exact(rational((1, 1024))), options), ("0,001".to_string(), false));
    }
}
