//! The pattern dispatcher.
//!
//! A [`Task`] names one of a fixed set of [`SolutionPattern`]s. Each pattern walks the expression
//! through its own fixed sequence of states, appending one [`Step`] to the solution every time it
//! enters a new state, and finishes with the value of the expression.
//!
//! ```
//! use tutor_algebra::solve::{solve, Task};
//!
//! let task = Task::from_json(r#"{
//!     "expression_tree": {
//!         "type": "sqrt",
//!         "radicand": {
//!             "type": "fraction",
//!             "numerator": { "type": "power", "base": { "type": "variable", "name": "x" }, "exponent": { "type": "integer", "value": 6 } },
//!             "denominator": { "type": "power", "base": { "type": "variable", "name": "x" }, "exponent": { "type": "integer", "value": 2 } }
//!         }
//!     },
//!     "variables": { "x": 3 },
//!     "answer": "9",
//!     "solution_pattern": "alg_radical_power"
//! }"#).unwrap();
//!
//! let solution = solve(&task).unwrap();
//! assert_eq!(solution.final_answer.value_display, "9");
//! ```

pub mod hints;
mod power_fraction;
mod radical_fraction;
mod radical_power;
pub mod solution;
pub mod step;

use crate::{
    ast::Node,
    error::{locate, InvalidTask, MalformedTree, MissingBinding, UnknownPattern},
    eval::{check_radicands, format_bindings, substitute_radical, Bindings, Substitution, Value},
    fmt::{format_decimal, format_number, FormatOptions},
    radical::RadicalComponent,
};
use hints::PatternText;
use levenshtein::levenshtein;
use std::collections::BTreeSet;
use tutor_error::Error;

pub use solution::{FinalAnswer, SolutionCore};
pub use step::{Step, Trace};

/// The solution patterns this engine can build worked solutions for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolutionPattern {
    /// A fraction of products of powers, simplified with the laws of exponents:
    /// `((a²)³ · a⁵)/a⁴`.
    PowerFraction,

    /// The square root of an expression of powers, from which a perfect square is taken out:
    /// `√(x⁶/x²)`.
    RadicalPower,

    /// A fraction with square roots in it, simplified by taking perfect squares out of the roots
    /// and cancelling: `(√(12a³) · √(3a))/(2a)`.
    RadicalFraction,
}

impl SolutionPattern {
    /// Every pattern, in the order of [`SolutionPattern::TAGS`].
    pub const ALL: [SolutionPattern; 3] = [Self::PowerFraction, Self::RadicalPower, Self::RadicalFraction];

    /// The tags of every pattern, as they appear in the `solution_pattern` field of a task.
    pub const TAGS: [&'static str; 3] = ["alg_power_fraction", "alg_radical_power", "alg_radical_fraction"];

    /// Returns the tag of the pattern.
    pub fn tag(self) -> &'static str {
        match self {
            Self::PowerFraction => Self::TAGS[0],
            Self::RadicalPower => Self::TAGS[1],
            Self::RadicalFraction => Self::TAGS[2],
        }
    }

    /// Returns the question group that tasks of this pattern belong to, unless the task names its
    /// own.
    pub fn group(self) -> &'static str {
        match self {
            Self::PowerFraction => "algebra_powers",
            Self::RadicalPower | Self::RadicalFraction => "algebra_radicals",
        }
    }

    /// Returns the fixed texts shown with every solution of this pattern.
    pub fn text(self) -> &'static PatternText {
        match self {
            Self::PowerFraction => &hints::POWER_FRACTION,
            Self::RadicalPower => &hints::RADICAL_POWER,
            Self::RadicalFraction => &hints::RADICAL_FRACTION,
        }
    }

    /// Returns the pattern with the given tag.
    ///
    /// Returns [`UnknownPattern`] if there is none, suggesting the known tags closest to the given
    /// one.
    pub fn from_tag(tag: &str) -> Result<Self, Error> {
        Self::ALL.into_iter()
            .find(|pattern| pattern.tag() == tag)
            .ok_or_else(|| Error::whole(tag, UnknownPattern {
                tag: tag.to_string(),
                suggestions: get_similar_tags(tag),
            }))
    }
}

/// Returns the known pattern tags similar to the given tag, closest first.
fn get_similar_tags(tag: &str) -> Vec<&'static str> {
    let mut similar = SolutionPattern::TAGS
        .into_iter()
        .map(|known| (levenshtein(known, tag), known))
        .filter(|(distance, _)| *distance < 4)
        .collect::<Vec<_>>();
    similar.sort();
    similar.into_iter().map(|(_, known)| known).collect()
}

/// A problem to build a worked solution for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Identifies the problem to whoever generated it.
    pub question_id: Option<String>,

    /// The group the problem belongs to. Defaults to the group of the pattern.
    pub question_group: Option<String>,

    /// The expression to simplify and evaluate.
    pub expression_tree: Node,

    /// The values of the variables of the expression.
    pub variables: Bindings,

    /// The expected answer, as written by whoever generated the problem.
    pub answer: Option<String>,

    /// The tag of the pattern to solve the problem with.
    pub solution_pattern: String,
}

/// Returns the character offset of a 1-based line and column, as reported by [`serde_json`].
fn char_offset(src: &str, line: usize, column: usize) -> usize {
    let preceding = src.split('\n')
        .take(line.saturating_sub(1))
        .map(|line| line.chars().count() + 1)
        .sum::<usize>();
    preceding + column.saturating_sub(1)
}

/// Returns the string held by a field that may be written as a JSON string or number.
fn string_field(object: &serde_json::Map<String, serde_json::Value>, field: &str) -> Result<Option<String>, Error> {
    match object.get(field) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s.clone())),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(Error::whole(other.to_string(), InvalidTask {
            reason: format!("`{}` must be a string", field),
        })),
    }
}

impl Task {
    /// Reads a task from a JSON document.
    pub fn from_json(src: &str) -> Result<Self, Error> {
        let value = serde_json::from_str::<serde_json::Value>(src).map_err(|err| {
            let len = src.chars().count();
            let start = char_offset(src, err.line(), err.column()).min(len.saturating_sub(1));
            let spans = vec![start..(start + 1).min(len)];
            Error::new(src, spans, InvalidTask { reason: err.to_string() })
        })?;
        Self::from_value(&value)
    }

    /// Reads a task from a parsed JSON value.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, Error> {
        let object = value.as_object().ok_or_else(|| Error::whole(
            value.to_string(),
            InvalidTask { reason: "a task must be an object".to_string() },
        ))?;
        let required = |field: &str| object.get(field).ok_or_else(|| Error::whole(
            value.to_string(),
            InvalidTask { reason: format!("missing field `{}`", field) },
        ));

        let solution_pattern = required("solution_pattern")?
            .as_str()
            .ok_or_else(|| Error::whole(value.to_string(), InvalidTask {
                reason: "`solution_pattern` must be a string".to_string(),
            }))?
            .to_string();

        Ok(Self {
            question_id: string_field(object, "question_id")?,
            question_group: string_field(object, "question_group")?,
            expression_tree: Node::from_json(required("expression_tree")?)?,
            variables: Bindings::from_json(required("variables")?)?,
            answer: string_field(object, "answer")?,
            solution_pattern,
        })
    }
}

/// Options for building solutions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveOptions {
    /// How the numbers in the steps and the final answer are written.
    pub format: FormatOptions,
}

/// Builds the worked solution of a task with the default options.
pub fn solve(task: &Task) -> Result<SolutionCore, Error> {
    solve_with(task, &SolveOptions::default())
}

/// Builds the worked solution of a task.
///
/// The task is rejected as a whole if any step of its solution cannot be built; no partial solution
/// is ever returned.
pub fn solve_with(task: &Task, options: &SolveOptions) -> Result<SolutionCore, Error> {
    let pattern = SolutionPattern::from_tag(&task.solution_pattern)?;
    let question_id = task.question_id.clone().unwrap_or_default();
    tracing::debug!(
        target: "tutor_algebra::solve",
        pattern = pattern.tag(),
        question_id = %question_id,
        expression = %task.expression_tree,
        "solving task"
    );

    check_bindings(&task.expression_tree, &task.variables)?;
    check_radicands(&task.expression_tree, &task.variables)?;

    let mut trace = Trace::new();
    let tree = &task.expression_tree;
    let value = match pattern {
        SolutionPattern::PowerFraction => power_fraction::solve(tree, &task.variables, options.format, &mut trace)?,
        SolutionPattern::RadicalPower => radical_power::solve(tree, &task.variables, options.format, &mut trace)?,
        SolutionPattern::RadicalFraction => radical_fraction::solve(tree, &task.variables, options.format, &mut trace)?,
    };

    let text = pattern.text();
    Ok(SolutionCore {
        question_id,
        question_group: task.question_group.clone().unwrap_or_else(|| pattern.group().to_string()),
        explanation_idea: text.explanation_idea.to_string(),
        calculation_steps: trace.into_steps(),
        final_answer: FinalAnswer {
            value_display: format_number(&value, options.format),
            value_machine: value,
            unit: String::new(),
        },
        hints: text.hints.iter().map(|hint| hint.to_string()).collect(),
    })
}

/// Returns [`MissingBinding`] for the first variable of the tree without a value.
fn check_bindings(tree: &Node, bindings: &Bindings) -> Result<(), Error> {
    match tree.variables().into_iter().find(|name| !bindings.contains(name)) {
        Some(name) => {
            let src = tree.to_string();
            let span = locate(&src, name);
            Err(Error::new(src, vec![span], MissingBinding { name: name.to_string() }))
        },
        None => Ok(()),
    }
}

/// Returns a [`MalformedTree`] error for a tree that does not have the shape a pattern requires.
fn unexpected_shape(pattern: SolutionPattern, tree: &Node, expected: &str) -> Error {
    Error::whole(tree.to_string(), MalformedTree {
        reason: format!("`{}` expects {}, found a {}", pattern.tag(), expected, tree.tag()),
    })
}

/// Appends the step that substitutes the bound values into the simplified expression, returning
/// the substitution.
fn substitute_step(
    trace: &mut Trace,
    state: &'static str,
    component: &RadicalComponent,
    bindings: &Bindings,
    options: FormatOptions,
) -> Result<Substitution, Error> {
    let substitution = substitute_radical(component, bindings, options)?;
    let names = component.outside.powers.keys()
        .chain(component.inside.powers.keys())
        .map(String::as_str)
        .collect::<BTreeSet<_>>();

    let step = trace.push(state, hints::SUBSTITUTE_VARIABLES, substitution.exact.clone());
    if !names.is_empty() {
        step.general(format_bindings(names, bindings, options));
    }
    step.calculation(substitution.formula.clone());
    if let Value::Exact(_) = substitution.value {
        step.result(format_number(&substitution.value, options));
    }

    Ok(substitution)
}

/// Appends the step that writes the result as a decimal, returning the value.
fn decimalize_step(trace: &mut Trace, substitution: Substitution, options: FormatOptions) -> Value {
    let (decimal, exact) = format_decimal(&substitution.value, options);
    let calculation = (decimal != substitution.exact).then(|| format!(
        "{} {} {}",
        substitution.exact,
        if exact { "=" } else { "≈" },
        decimal,
    ));

    trace.push("DECIMALIZE", hints::DECIMALIZE, decimal.clone())
        .calculation(calculation)
        .result(decimal);
    substitution.value
}
