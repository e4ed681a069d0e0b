//! `alg_power_fraction`: a fraction of products of powers of the same base.

use crate::{
    ast::Node,
    error::{DivisionByZero, MalformedTree},
    eval::{Bindings, Substitution, Value},
    fmt::FormatOptions,
    monomial::{format_quotient, Monomial},
    power::{
        build_collapse_formula,
        build_division_formula,
        build_sum_formula,
        collapse_all,
        combine_product_to_map,
        extract_linear_powers,
    },
    radical::RadicalComponent,
};
use tutor_error::Error;
use super::{decimalize_step, hints, substitute_step, unexpected_shape, SolutionPattern, Trace};

/// The states of the solution. Each state carries what the previous step produced.
#[derive(Debug)]
enum State {
    Initial,
    CollapsePowerOfPower,
    CombineNumeratorProduct { numerator: Node, denominator: Node },
    DivideByDenominator { numerator: Monomial, denominator: Monomial },
    SubstituteVariables { result: Monomial },
    Decimalize { substitution: Substitution },
    Done(Value),
}

pub(super) fn solve(
    tree: &Node,
    bindings: &Bindings,
    options: FormatOptions,
    trace: &mut Trace,
) -> Result<Value, Error> {
    let Node::Fraction(numerator, denominator) = tree else {
        return Err(unexpected_shape(SolutionPattern::PowerFraction, tree, "a fraction at the top level"));
    };

    let mut state = State::Initial;
    loop {
        state = match state {
            State::Initial => State::CollapsePowerOfPower,
            State::CollapsePowerOfPower => {
                let (numerator, mut transforms) = collapse_all(numerator);
                let (denominator, denominator_transforms) = collapse_all(denominator);
                transforms.extend(denominator_transforms);

                let formula = (!transforms.is_empty()).then(|| transforms.iter()
                    .map(build_collapse_formula)
                    .collect::<Vec<_>>()
                    .join("; "));
                let collapsed = Node::frac(numerator.clone(), denominator.clone());
                trace.push("COLLAPSE_POWER_OF_POWER", hints::COLLAPSE_POWER_OF_POWER, collapsed.to_string())
                    .general(hints::POWER_OF_POWER)
                    .calculation(formula);
                State::CombineNumeratorProduct { numerator, denominator }
            },
            State::CombineNumeratorProduct { numerator, denominator } => {
                let contributions = combine_product_to_map(&numerator)?;
                let denominator = extract_linear_powers(&denominator)?;
                trace.push(
                    "COMBINE_NUMERATOR_PRODUCT",
                    hints::COMBINE_NUMERATOR_PRODUCT,
                    format_quotient(&contributions.combined, &denominator),
                )
                    .general(hints::PRODUCT_OF_POWERS)
                    .calculation(build_sum_formula(&contributions));
                State::DivideByDenominator { numerator: contributions.combined, denominator }
            },
            State::DivideByDenominator { numerator, denominator } => {
                let result = numerator.checked_div(&denominator).ok_or_else(|| {
                    let src = format_quotient(&numerator, &denominator);
                    if denominator.coeff == 0 {
                        Error::whole(src, DivisionByZero)
                    } else {
                        Error::whole(src, MalformedTree::exponent_too_large())
                    }
                })?;
                trace.push("DIVIDE_BY_DENOMINATOR", hints::DIVIDE_BY_DENOMINATOR, result.to_string())
                    .general(hints::QUOTIENT_OF_POWERS)
                    .calculation(build_division_formula(&numerator, &denominator));
                State::SubstituteVariables { result }
            },
            State::SubstituteVariables { result } => {
                let component = RadicalComponent::rational(result);
                let substitution = substitute_step(trace, "SUBSTITUTE_VARIABLES", &component, bindings, options)?;
                State::Decimalize { substitution }
            },
            State::Decimalize { substitution } => State::Done(decimalize_step(trace, substitution, options)),
            State::Done(value) => return Ok(value),
        };
    }
}
