//! The numeric evaluator.
//!
//! Values are computed with exact rational arithmetic wherever possible. The only inexact
//! operation is the square root of a value that is not a perfect square, which produces a
//! [`Value::Approx`] used for display only.

use crate::{
    ast::{BinOp, Node},
    error::{
        locate,
        DivisionByZero,
        InvalidBinding,
        InvalidTask,
        MalformedTree,
        MissingBinding,
        NegativeExtraction,
        NegativeRadicand,
        NonIntegerExponent,
    },
    fmt::{format_rational, FormatOptions},
    monomial::Monomial,
    primitive::{float, rational_from_str, rational_pow, rational_sqrt, MAX_EXPONENT},
    radical::{format_root, Extraction, RadicalComponent},
    render::superscript,
};
use rug::{ops::Pow, Float, Rational};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use tutor_error::Error;

/// The values of the variables of a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings(BTreeMap<String, Rational>);

impl Bindings {
    /// Creates an empty set of bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a variable to a value, returning the previous value if there was one.
    pub fn insert(&mut self, name: impl Into<String>, value: Rational) -> Option<Rational> {
        self.0.insert(name.into(), value)
    }

    /// Returns the value of a variable.
    pub fn get(&self, name: &str) -> Option<&Rational> {
        self.0.get(name)
    }

    /// Returns true if the variable is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Returns an iterator over the bindings, sorted by variable name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rational)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Reads the bindings from the `variables` object of a task.
    ///
    /// Values may be JSON numbers, which are converted exactly from their decimal text, or strings
    /// holding an integer, a fraction `p/q`, or a decimal written with `.` or `,`.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, Error> {
        let object = value.as_object().ok_or_else(|| Error::whole(
            value.to_string(),
            InvalidTask { reason: "`variables` must be an object".to_string() },
        ))?;

        object.iter()
            .map(|(name, raw)| {
                let parsed = match raw {
                    serde_json::Value::Number(n) => rational_from_str(&n.to_string()),
                    serde_json::Value::String(s) => rational_from_str(s),
                    _ => None,
                };
                parsed
                    .map(|value| (name.clone(), value))
                    .ok_or_else(|| Error::whole(raw.to_string(), InvalidBinding { name: name.clone() }))
            })
            .collect()
    }
}

impl FromIterator<(String, Rational)> for Bindings {
    fn from_iter<T: IntoIterator<Item = (String, Rational)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<(&'a str, Rational)> for Bindings {
    fn from_iter<T: IntoIterator<Item = (&'a str, Rational)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(name, value)| (name.to_string(), value)).collect())
    }
}

/// A computed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An exact rational value.
    Exact(Rational),

    /// An irrational value, approximated with [`crate::primitive::PRECISION`] bits.
    Approx(Float),
}

impl Value {
    /// Returns true if the value is exact.
    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Exact(_))
    }

    /// Returns the value as a [`Float`].
    pub fn to_float(&self) -> Float {
        match self {
            Self::Exact(n) => float(n),
            Self::Approx(f) => f.clone(),
        }
    }

    /// Returns the value as an `f64`.
    pub fn to_f64(&self) -> f64 {
        match self {
            Self::Exact(n) => n.to_f64(),
            Self::Approx(f) => f.to_f64(),
        }
    }

    /// Returns true if the value is zero.
    fn is_zero(&self) -> bool {
        match self {
            Self::Exact(n) => *n == 0,
            Self::Approx(f) => f.is_zero(),
        }
    }

    /// Returns true if the value is less than zero.
    fn is_negative(&self) -> bool {
        match self {
            Self::Exact(n) => *n < 0,
            Self::Approx(f) => *f < 0,
        }
    }

    /// Applies a binary operator to two values, staying exact if both values are exact. Returns
    /// [`None`] on division by zero.
    fn apply(self, op: BinOp, rhs: Value) -> Option<Value> {
        if op == BinOp::Div && rhs.is_zero() {
            return None;
        }

        Some(match (self, rhs) {
            (Self::Exact(lhs), Self::Exact(rhs)) => Self::Exact(match op {
                BinOp::Add => lhs + rhs,
                BinOp::Sub => lhs - rhs,
                BinOp::Mul => lhs * rhs,
                BinOp::Div => lhs / rhs,
            }),
            (lhs, rhs) => {
                let (lhs, rhs) = (lhs.to_float(), rhs.to_float());
                Self::Approx(match op {
                    BinOp::Add => lhs + rhs,
                    BinOp::Sub => lhs - rhs,
                    BinOp::Mul => lhs * rhs,
                    BinOp::Div => lhs / rhs,
                })
            },
        })
    }
}

impl Serialize for Value {
    /// Serializes an integral exact value as an integer, any other exact value as a `"p/q"`
    /// string, and an approximate value as a float.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Exact(n) if *n.denom() == 1 => match n.numer().to_i64() {
                Some(int) => serializer.serialize_i64(int),
                None => serializer.serialize_str(&n.numer().to_string()),
            },
            Self::Exact(n) => serializer.serialize_str(&n.to_string()),
            Self::Approx(f) => serializer.serialize_f64(f.to_f64()),
        }
    }
}

/// Returns the value of a variable, or a [`MissingBinding`] error pointing at it in `src`.
fn lookup<'a>(bindings: &'a Bindings, name: &str, src: &str) -> Result<&'a Rational, Error> {
    bindings.get(name).ok_or_else(|| Error::new(
        src,
        vec![locate(src, name)],
        MissingBinding { name: name.to_string() },
    ))
}

/// Evaluates a monomial exactly.
///
/// Returns [`MissingBinding`] if a variable has no value, and [`DivisionByZero`] if a variable
/// with a negative exponent is zero.
pub fn evaluate_expression_map(monomial: &Monomial, bindings: &Bindings) -> Result<Rational, Error> {
    let mut result = monomial.coeff.clone();
    for (name, exp) in &monomial.powers {
        let src = monomial.to_string();
        let value = lookup(bindings, name, &src)?;
        let power = rational_pow(value, *exp).ok_or_else(|| {
            let spans = vec![locate(&src, name)];
            if *value == 0 && *exp < 0 {
                Error::new(src.clone(), spans, DivisionByZero)
            } else {
                Error::new(src.clone(), spans, MalformedTree::exponent_too_large())
            }
        })?;
        result *= power;
    }
    Ok(result)
}

/// Computes `outside·√(inside)` from the values of both parts.
///
/// The root is exact if `inside` is a perfect square; otherwise this is the single place a
/// floating-point approximation is made. Returns [`NegativeRadicand`] if `inside` is negative.
pub fn compose_radical(outside: &Rational, inside: &Rational, src: &str) -> Result<Value, Error> {
    if *inside < 0 {
        return Err(Error::whole(src, NegativeRadicand { value: inside.to_string() }));
    }

    Ok(match rational_sqrt(inside) {
        Some(root) => Value::Exact(Rational::from(outside * &root)),
        None => Value::Approx(float(outside) * float(inside).sqrt()),
    })
}

/// Evaluates both parts of a radical component exactly.
pub fn evaluate_radical_parts(
    component: &RadicalComponent,
    bindings: &Bindings,
) -> Result<(Rational, Rational), Error> {
    Ok((
        evaluate_expression_map(&component.outside, bindings)?,
        evaluate_expression_map(&component.inside, bindings)?,
    ))
}

/// Evaluates a radical component `outside·√(inside)`.
pub fn evaluate_radical_composed(component: &RadicalComponent, bindings: &Bindings) -> Result<Value, Error> {
    let (outside, inside) = evaluate_radical_parts(component, bindings)?;
    compose_radical(&outside, &inside, &component.to_string())
}

/// Writes a bound value as a factor: parenthesized if it is negative or not an integer.
fn value_operand(value: &Rational, options: FormatOptions) -> String {
    let text = format_rational(value, options);
    if *value < 0 || *value.denom() != 1 {
        format!("({})", text)
    } else {
        text
    }
}

/// Writes a monomial with the bound values substituted for its variables, e.g. `3 · 2⁷/4`.
/// Returns the text and whether it has more than one factor.
fn substitute_monomial(
    monomial: &Monomial,
    bindings: &Bindings,
    options: FormatOptions,
) -> Result<(String, bool), Error> {
    let src = monomial.to_string();
    let side = |part: &Monomial| -> Result<Vec<String>, Error> {
        let coeff = part.coeff.numer().clone().abs();
        let mut factors = Vec::new();
        if part.powers.is_empty() || coeff != 1 {
            factors.push(coeff.to_string());
        }
        for (name, exp) in &part.powers {
            let value = value_operand(lookup(bindings, name, &src)?, options);
            if *exp == 1 {
                factors.push(value);
            } else {
                factors.push(format!("{}{}", value, superscript(&exp.to_string())));
            }
        }
        Ok(factors)
    };

    let (numerator, denominator) = monomial.split();
    let numerator_factors = side(&numerator)?;
    let sign = if monomial.coeff < 0 { "-" } else { "" };
    if denominator.is_one() {
        let compound = numerator_factors.len() > 1;
        return Ok((format!("{}{}", sign, numerator_factors.join(" · ")), compound));
    }

    let wrap = |factors: Vec<String>| if factors.len() > 1 {
        format!("({})", factors.join(" · "))
    } else {
        factors.join(" · ")
    };
    let numerator_text = wrap(numerator_factors);
    let denominator_text = wrap(side(&denominator)?);
    Ok((format!("{}{}/{}", sign, numerator_text, denominator_text), true))
}

/// Writes `outside√inside` for two computed values, leaving out whichever part is 1.
fn radical_value_text(outside: &Rational, inside: &Rational, options: FormatOptions) -> String {
    if *inside == 1 {
        return format_rational(outside, options);
    }

    let root = if *inside.denom() != 1 {
        format!("√({})", format_rational(inside, options))
    } else {
        format!("√{}", format_rational(inside, options))
    };
    if *outside == 1 {
        root
    } else if *outside == -1 {
        format!("-{}", root)
    } else if *outside.denom() != 1 {
        format!("({}){}", format_rational(outside, options), root)
    } else {
        format!("{}{}", format_rational(outside, options), root)
    }
}

/// The bound values substituted into a radical component, and the resulting value.
#[derive(Debug, Clone, PartialEq)]
pub struct Substitution {
    /// The chain of equalities from the substituted component to its exact value, such as
    /// `3√(8 · 3) = 3√24`, or [`None`] if there is nothing to compute.
    pub formula: Option<String>,

    /// The exact value in closed form, such as `128`, `3/2`, or `3√24`.
    pub exact: String,

    /// The value.
    pub value: Value,
}

/// Substitutes the bound values into a radical component and computes its value.
pub fn substitute_radical(
    component: &RadicalComponent,
    bindings: &Bindings,
    options: FormatOptions,
) -> Result<Substitution, Error> {
    let (outside_text, outside_compound) = substitute_monomial(&component.outside, bindings, options)?;
    let substituted = if component.is_rational() {
        outside_text
    } else {
        let (inside_text, inside_compound) = substitute_monomial(&component.inside, bindings, options)?;
        let root = if inside_compound {
            format!("√({})", inside_text)
        } else {
            format!("√{}", inside_text)
        };

        if component.outside.is_one() {
            root
        } else if component.outside.is_constant() && component.outside.coeff == -1 {
            format!("-{}", root)
        } else if outside_compound {
            format!("{} · {}", outside_text, root)
        } else {
            format!("{}{}", outside_text, root)
        }
    };

    let (outside, inside) = evaluate_radical_parts(component, bindings)?;
    let value = compose_radical(&outside, &inside, &component.to_string())?;
    let mut chain = vec![substituted, radical_value_text(&outside, &inside, options)];
    if let Value::Exact(n) = &value {
        chain.push(format_rational(n, options));
    }
    chain.dedup();

    let exact = chain.last().cloned().unwrap_or_default();
    let formula = (chain.len() > 1).then(|| chain.join(" = "));
    Ok(Substitution { formula, exact, value })
}

/// Writes the bound values of the given variables, e.g. `a = 2, b = 3/4`.
pub fn format_bindings<'a>(
    names: impl IntoIterator<Item = &'a str>,
    bindings: &Bindings,
    options: FormatOptions,
) -> String {
    names.into_iter()
        .filter_map(|name| bindings.get(name).map(|value| format!("{} = {}", name, format_rational(value, options))))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Evaluates an expression tree directly, without simplifying it first.
///
/// Every node kind has a value except [`Node::RangeQuery`], which is a [`MalformedTree`].
pub fn evaluate_node(node: &Node, bindings: &Bindings) -> Result<Value, Error> {
    let src = || node.to_string();
    match node {
        Node::Integer(value) => Ok(Value::Exact(Rational::from(*value))),
        Node::Variable(name) => lookup(bindings, name, name).map(|value| Value::Exact(value.clone())),
        Node::Power(base, exp) => {
            let base = evaluate_node(base, bindings)?;
            let exp = match evaluate_node(exp, bindings)? {
                Value::Exact(n) if *n.denom() == 1 => n.numer().to_i64(),
                _ => None,
            }
                .ok_or_else(|| Error::whole(src(), NonIntegerExponent))?;

            if base.is_zero() && exp < 0 {
                return Err(Error::whole(src(), DivisionByZero));
            }
            match base {
                Value::Exact(n) => rational_pow(&n, exp)
                    .map(Value::Exact)
                    .ok_or_else(|| Error::whole(src(), MalformedTree::exponent_too_large())),
                Value::Approx(f) => {
                    let exp = i32::try_from(exp)
                        .ok()
                        .filter(|exp| i64::from(exp.unsigned_abs()) <= MAX_EXPONENT)
                        .ok_or_else(|| Error::whole(src(), MalformedTree::exponent_too_large()))?;
                    Ok(Value::Approx(f.pow(exp)))
                },
            }
        },
        Node::Product(factors) => factors.iter()
            .try_fold(Value::Exact(Rational::from(1)), |acc, factor| {
                let factor = evaluate_node(factor, bindings)?;
                acc.apply(BinOp::Mul, factor).ok_or_else(|| Error::whole(src(), DivisionByZero))
            }),
        Node::Fraction(numerator, denominator) => {
            let numerator = evaluate_node(numerator, bindings)?;
            let denominator = evaluate_node(denominator, bindings)?;
            numerator.apply(BinOp::Div, denominator)
                .ok_or_else(|| Error::whole(src(), DivisionByZero))
        },
        Node::Sqrt(radicand) => match evaluate_node(radicand, bindings)? {
            Value::Exact(n) => compose_radical(&Rational::from(1), &n, &src()),
            Value::Approx(f) if f.is_sign_negative() && !f.is_zero() => Err(Error::whole(
                src(),
                NegativeRadicand { value: f.to_f64().to_string() },
            )),
            Value::Approx(f) => Ok(Value::Approx(f.sqrt())),
        },
        Node::BinaryOp(op, left, right) => {
            let left = evaluate_node(left, bindings)?;
            let right = evaluate_node(right, bindings)?;
            left.apply(*op, right).ok_or_else(|| Error::whole(src(), DivisionByZero))
        },
        Node::RangeQuery(..) => Err(Error::whole(src(), MalformedTree {
            reason: "a range query has no numeric value".to_string(),
        })),
    }
}

/// Evaluates the radicand of every square root in the tree, innermost first, and returns
/// [`NegativeRadicand`] for the first one that is negative.
///
/// Run this before simplifying: a product of roots combined into one root no longer shows the
/// sign of each factor, as in `√a · √a = a`.
pub fn check_radicands(node: &Node, bindings: &Bindings) -> Result<(), Error> {
    let radicands = node.post_order_iter().filter_map(|node| match node {
        Node::Sqrt(radicand) => Some(&**radicand),
        _ => None,
    });

    for radicand in radicands {
        let value = evaluate_node(radicand, bindings)?;
        if value.is_negative() {
            let src = node.to_string();
            let spans = vec![locate(&src, &radicand.to_string())];
            let value = match value {
                Value::Exact(n) => n.to_string(),
                Value::Approx(f) => f.to_f64().to_string(),
            };
            return Err(Error::new(src, spans, NegativeRadicand { value }));
        }
    }
    Ok(())
}

/// Checks that a perfect square taken out of a root keeps the sign of the root.
///
/// `√x² = |x|`, so the monomial taken out must not be negative under the bindings. It is negative
/// when an odd number of the variables taken out with an odd exponent are bound to negative
/// values; [`NegativeExtraction`] then points at the first of them.
pub fn check_extraction(extraction: &Extraction, bindings: &Bindings) -> Result<(), Error> {
    let src = format_root(&extraction.radicand);
    let mut negatives = Vec::new();
    for (name, exp) in &extraction.extracted.powers {
        let value = lookup(bindings, name, &src)?;
        if *value == 0 {
            return Ok(());
        }
        if exp % 2 != 0 && *value < 0 {
            negatives.push((name, value));
        }
    }

    match negatives.first() {
        Some((name, value)) if negatives.len() % 2 == 1 => {
            let spans = vec![locate(&src, name)];
            Err(Error::new(
                src,
                spans,
                NegativeExtraction { name: name.to_string(), value: value.to_string() },
            ))
        },
        _ => Ok(()),
    }
}

/// The expected answer of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    /// The value of the answer.
    pub value: Rational,

    /// The number of fractional digits the answer was written with, if it was written as a
    /// decimal.
    pub decimal_places: Option<usize>,
}

/// Parses the `answer` of a task: an integer (`128`), a fraction (`3/2`), or a decimal with `.`
/// or `,` (`-0,25`, `4,24`), optionally preceded by `≈`.
pub fn parse_answer(s: &str) -> Option<Answer> {
    let s = s.trim();
    let s = s.strip_prefix('≈').unwrap_or(s).trim();
    let value = rational_from_str(s)?;
    let decimal_places = match s.split_once(['.', ',']) {
        Some((_, fractional)) if !s.contains('/') => Some(
            fractional.chars().take_while(char::is_ascii_digit).count(),
        ),
        _ => None,
    };
    Some(Answer { value, decimal_places })
}

/// Returns true if a computed value agrees with an expected answer.
///
/// An answer written as an integer or fraction must equal the value exactly (or within `1e-9`
/// if the value is approximate). An answer written as a decimal must equal the value rounded to
/// the answer's number of fractional digits.
pub fn answer_matches(value: &Value, answer: &Answer) -> bool {
    match (value, answer.decimal_places) {
        (Value::Exact(n), None) => *n == answer.value,
        (value, places) => {
            let diff = (value.to_float() - float(&answer.value)).abs();
            let tolerance = match places {
                Some(places) => float(5) / float(10).pow(places as u32 + 1) + float(1e-12),
                None => float(1e-9),
            };
            diff <= tolerance
        },
    }
}
