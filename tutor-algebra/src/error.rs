//! The kinds of errors that can abort building a solution.
//!
//! Every kind derives [`ErrorKind`], and is wrapped in a [`tutor_error::Error`] together with the
//! rendered text of the expression it is about. None of them are recoverable: a task that produces
//! one is treated as a defect of whoever generated the task.

use ariadne::Fmt;
use std::ops::Range;
use tutor_attrs::ErrorKind;
use tutor_error::{ErrorKind, EXPR};

/// The expression tree contains a node type this engine does not know.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unsupported expression node `{}`", self.tag),
    labels = ["this node type"],
    help = format!(
        "supported node types are: {}",
        crate::ast::NODE_TAGS.join(", "),
    ),
)]
pub struct UnsupportedNode {
    /// The unrecognized `type` tag.
    pub tag: String,
}

/// A power's exponent is not a literal integer, so the exponent laws cannot be applied to it.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "the exponent of this power is not an integer",
    labels = ["this base", "this exponent"],
    help = "only powers with literal integer exponents can be simplified",
)]
pub struct NonIntegerExponent;

/// A variable of the expression has no value in the task's bindings.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("no value was given for `{}`", self.name),
    labels = ["this variable"],
    help = format!("add {} to the task's variables", (&self.name).fg(EXPR)),
)]
pub struct MissingBinding {
    /// The name of the unbound variable.
    pub name: String,
}

/// The expression tree does not have the shape an operation requires.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("malformed expression tree: {}", self.reason),
    labels = ["this expression"],
)]
pub struct MalformedTree {
    /// What is wrong with the tree.
    pub reason: String,
}

impl MalformedTree {
    /// An exponent, or a sum or product of exponents, is larger than
    /// [`MAX_EXPONENT`](crate::primitive::MAX_EXPONENT).
    pub fn exponent_too_large() -> Self {
        Self { reason: "exponent is too large".to_string() }
    }
}

/// A denominator, or a base raised to a negative power, evaluated to zero.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "division by zero",
    labels = ["this evaluates to zero"],
)]
pub struct DivisionByZero;

/// The value under a square root evaluated to a negative number.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot take the square root of the negative value {}", self.value),
    labels = ["this radicand"],
)]
pub struct NegativeRadicand {
    /// The formatted value of the radicand.
    pub value: String,
}

/// A variable taken out of a square root with an odd exponent makes the part taken out negative.
/// Since `√x² = |x|`, the simplified form would have the wrong sign.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot take `{}` out of the square root", self.name),
    labels = ["this variable"],
    help = format!(
        "{} is bound to {}, but {} only holds for non-negative values",
        (&self.name).fg(EXPR),
        self.value,
        "√a² = a".fg(EXPR),
    ),
)]
pub struct NegativeExtraction {
    /// The name of the variable.
    pub name: String,

    /// The formatted value of the variable.
    pub value: String,
}

/// The task names a solution pattern this engine does not implement.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unknown solution pattern `{}`", self.tag),
    labels = ["this pattern"],
    help = if self.suggestions.is_empty() {
        format!("known patterns are: {}", crate::solve::SolutionPattern::TAGS.join(", "))
    } else {
        format!("did you mean `{}`?", self.suggestions[0].fg(EXPR))
    },
)]
pub struct UnknownPattern {
    /// The unrecognized pattern tag.
    pub tag: String,

    /// Known pattern tags similar to the unrecognized one.
    pub suggestions: Vec<&'static str>,
}

/// A variable binding could not be read as an exact number.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the value of `{}` is not a number", self.name),
    labels = ["this value"],
    help = "use an integer, a decimal such as `0.25` or `0,25`, or a fraction such as `3/4`",
)]
pub struct InvalidBinding {
    /// The name of the variable.
    pub name: String,
}

/// The task document could not be read.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid task: {}", self.reason),
    labels = ["here"],
)]
pub struct InvalidTask {
    /// What is wrong with the task.
    pub reason: String,
}

/// Returns the character range of the first standalone occurrence of `needle` in `haystack`, or
/// the whole of `haystack` if there is none.
///
/// An occurrence is standalone if it is not directly preceded or followed by a letter
/// character, so looking for `a` in `ab · a` finds the second `a`.
pub(crate) fn locate(haystack: &str, needle: &str) -> Range<usize> {
    let chars = haystack.chars().collect::<Vec<_>>();
    let target = needle.chars().collect::<Vec<_>>();
    let whole = 0..chars.len();
    if target.is_empty() || target.len() > chars.len() {
        return whole;
    }

    (0..=chars.len() - target.len())
        .find(|&start| {
            let end = start + target.len();
            chars[start..end] == target[..]
                && (start == 0 || !chars[start - 1].is_alphabetic())
                && (end == chars.len() || !chars[end].is_alphabetic())
        })
        .map(|start| start..start + target.len())
        .unwrap_or(whole)
}
