//! `alg_radical_fraction`: a fraction with square roots among the factors of its numerator or
//! denominator.

use crate::{
    ast::Node,
    error::{DivisionByZero, MalformedTree},
    eval::{check_extraction, Bindings, Substitution, Value},
    fmt::FormatOptions,
    monomial::format_quotient,
    power::build_division_formula,
    radical::{
        decompose_factor,
        format_fraction,
        format_radical_component,
        format_root,
        simplify_radical_product,
        Extraction,
        RadicalComponent,
    },
    render::render_denominator,
};
use tutor_error::Error;
use super::{decimalize_step, hints, substitute_step, unexpected_shape, SolutionPattern, Trace};

#[derive(Debug)]
enum State {
    Initial,

    /// Decomposes the `next`-th root of the numerator. `decomposed` holds the decomposed form of
    /// every factor of the numerator that was decomposed so far.
    Decompose { next: usize, decomposed: Vec<Option<RadicalComponent>> },

    CombineNumerator { decomposed: Vec<Option<RadicalComponent>> },
    CombineDenominator { numerator: RadicalComponent },
    FormFraction { numerator: RadicalComponent, denominator: RadicalComponent },
    ReduceCommonRadicals { numerator: RadicalComponent, denominator: RadicalComponent, form: String },
    SubstituteAndCompute { component: RadicalComponent },
    Decimalize { substitution: Substitution },
    Done(Value),
}

/// Checks every perfect square taken out of a root against the bindings.
fn check_extractions(extractions: &[Extraction], bindings: &Bindings) -> Result<(), Error> {
    extractions.iter().try_for_each(|extraction| check_extraction(extraction, bindings))
}

/// Writes a factor of the numerator: its decomposed form if it has one, and the factor itself
/// otherwise.
fn factor_text(factor: &Node, decomposed: Option<&RadicalComponent>) -> String {
    match decomposed {
        Some(component) => format_radical_component(component),
        None if matches!(factor, Node::BinaryOp(..)) || factor.is_negative_integer() => format!("({})", factor),
        None => factor.to_string(),
    }
}

/// Writes the fraction with its numerator partially decomposed.
fn partial_fraction(factors: &[Node], decomposed: &[Option<RadicalComponent>], denominator: &Node) -> String {
    let texts = factors.iter()
        .zip(decomposed)
        .map(|(factor, component)| factor_text(factor, component.as_ref()))
        .collect::<Vec<_>>();

    let parens = match (factors, decomposed) {
        ([factor], [None]) => matches!(
            factor,
            Node::Product(_) | Node::Fraction(..) | Node::BinaryOp(..) | Node::RangeQuery(..)
        ) || factor.is_negative_integer(),
        ([_], [Some(component)]) => !component.is_single_factor() || component.outside.coeff < 0,
        _ => true,
    };

    if parens {
        format!("({})/{}", texts.join(" · "), render_denominator(denominator))
    } else {
        format!("{}/{}", texts.join(" · "), render_denominator(denominator))
    }
}

/// Writes the fraction as a rational fraction times a single root, e.g. `a · √(6/(2a))`, or
/// returns [`None`] if neither side has a root left.
fn separate_root(numerator: &RadicalComponent, denominator: &RadicalComponent) -> Option<String> {
    if numerator.is_rational() && denominator.is_rational() {
        return None;
    }

    let rational = format_quotient(&numerator.outside, &denominator.outside);
    let root = if denominator.is_rational() {
        format_root(&numerator.inside)
    } else {
        format!("√({})", format_quotient(&numerator.inside, &denominator.inside))
    };

    if rational == "1" {
        Some(root)
    } else {
        Some(format!("{} · {}", rational, root))
    }
}

pub(super) fn solve(
    tree: &Node,
    bindings: &Bindings,
    options: FormatOptions,
    trace: &mut Trace,
) -> Result<Value, Error> {
    let expected = "a fraction with a square root in it";
    let Node::Fraction(numerator, denominator) = tree else {
        return Err(unexpected_shape(SolutionPattern::RadicalFraction, tree, expected));
    };

    let factors = numerator.factors();
    if !factors.iter().chain(denominator.factors()).any(Node::is_sqrt) {
        return Err(unexpected_shape(SolutionPattern::RadicalFraction, tree, expected));
    }

    let roots = factors.iter()
        .enumerate()
        .filter(|(_, factor)| factor.is_sqrt())
        .map(|(i, _)| i)
        .collect::<Vec<_>>();

    let mut state = State::Initial;
    loop {
        state = match state {
            State::Initial => {
                let decomposed = vec![None; factors.len()];
                if roots.is_empty() {
                    State::CombineNumerator { decomposed }
                } else {
                    State::Decompose { next: 0, decomposed }
                }
            },
            State::Decompose { next, mut decomposed } => {
                let position = roots[next];
                let factor = &factors[position];
                let mut extractions = Vec::new();
                let component = decompose_factor(factor, &mut extractions)?;
                check_extractions(&extractions, bindings)?;
                let formula = format!("{} = {}", factor, component);
                decomposed[position] = Some(component);

                trace.push(
                    "DECOMPOSE",
                    hints::decompose_description(next + 1, roots.len()),
                    partial_fraction(factors, &decomposed, denominator),
                )
                    .general(hints::EXTRACT_SQUARE)
                    .calculation(Some(formula));

                if next + 1 < roots.len() {
                    State::Decompose { next: next + 1, decomposed }
                } else {
                    State::CombineNumerator { decomposed }
                }
            },
            State::CombineNumerator { decomposed } => {
                let parts = factors.iter()
                    .zip(decomposed)
                    .map(|(factor, component)| match component {
                        Some(component) => Ok(component),
                        None => decompose_factor(factor, &mut ()),
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                let too_large = || Error::whole(tree.to_string(), MalformedTree::exponent_too_large());
                let accumulated = parts.iter()
                    .try_fold(RadicalComponent::one(), |acc, part| acc.checked_mul(part))
                    .ok_or_else(too_large)?;
                let mut extractions = Vec::new();
                let combined = accumulated.redecompose(&mut extractions).ok_or_else(too_large)?;
                check_extractions(&extractions, bindings)?;

                let mut chain = vec![
                    parts.iter().map(format_radical_component).collect::<Vec<_>>().join(" · "),
                    accumulated.to_string(),
                    combined.to_string(),
                ];
                chain.dedup();

                let expression = format!(
                    "{}/{}",
                    if combined.is_single_factor() && combined.outside.coeff >= 0 {
                        combined.to_string()
                    } else {
                        format!("({})", combined)
                    },
                    render_denominator(denominator),
                );
                trace.push("COMBINE_NUMERATOR", hints::COMBINE_NUMERATOR, expression)
                    .general(hints::PRODUCT_OF_ROOTS)
                    .calculation((chain.len() > 1).then(|| chain.join(" = ")));
                State::CombineDenominator { numerator: combined }
            },
            State::CombineDenominator { numerator } => {
                let mut extractions = Vec::new();
                let simplified = simplify_radical_product(denominator, &mut extractions)?;
                check_extractions(&extractions, bindings)?;
                let before = denominator.to_string();
                let after = simplified.to_string();

                let step = trace.push(
                    "COMBINE_DENOMINATOR",
                    hints::COMBINE_DENOMINATOR,
                    format_fraction(&numerator, &simplified),
                );
                if denominator.factors().iter().any(Node::is_sqrt) {
                    step.general(hints::EXTRACT_SQUARE);
                }
                step.calculation((before != after).then(|| format!("{} = {}", before, after)));
                State::FormFraction { numerator, denominator: simplified }
            },
            State::FormFraction { numerator, denominator } => {
                let whole = format_fraction(&numerator, &denominator);
                let separated = separate_root(&numerator, &denominator);

                let step = trace.push(
                    "FORM_FRACTION",
                    hints::FORM_FRACTION,
                    separated.clone().unwrap_or_else(|| whole.clone()),
                );
                if !denominator.is_rational() {
                    step.general(hints::QUOTIENT_OF_ROOTS);
                }
                step.calculation(separated.as_ref().map(|separated| format!("{} = {}", whole, separated)));

                let form = separated.unwrap_or(whole);
                State::ReduceCommonRadicals { numerator, denominator, form }
            },
            State::ReduceCommonRadicals { numerator, denominator, form } => {
                let mut extractions = Vec::new();
                let reduced = numerator.checked_div(&denominator, &mut extractions).ok_or_else(|| {
                    if denominator.outside.coeff == 0 || denominator.inside.coeff == 0 {
                        Error::whole(form.clone(), DivisionByZero)
                    } else {
                        Error::whole(form.clone(), MalformedTree::exponent_too_large())
                    }
                })?;
                check_extractions(&extractions, bindings)?;

                let mut clauses = Vec::new();
                clauses.extend(build_division_formula(&numerator.outside, &denominator.outside));
                let reduced_text = reduced.to_string();
                if form != reduced_text {
                    clauses.push(format!("{} = {}", form, reduced_text));
                }

                trace.push("REDUCE_COMMON_RADICALS", hints::REDUCE_COMMON_RADICALS, reduced_text)
                    .general(hints::CANCEL_FACTORS)
                    .calculation((!clauses.is_empty()).then(|| clauses.join("; ")));
                State::SubstituteAndCompute { component: reduced }
            },
            State::SubstituteAndCompute { component } => {
                let substitution = substitute_step(trace, "SUBSTITUTE_AND_COMPUTE", &component, bindings, options)?;
                State::Decimalize { substitution }
            },
            State::Decimalize { substitution } => State::Done(decimalize_step(trace, substitution, options)),
            State::Done(value) => return Ok(value),
        };
    }
}
