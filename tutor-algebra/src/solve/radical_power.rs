//! `alg_radical_power`: the square root of an expression of powers.

use crate::{
    ast::Node,
    error::{DivisionByZero, MalformedTree},
    eval::{check_extraction, Bindings, Substitution, Value},
    fmt::FormatOptions,
    monomial::Monomial,
    power::{
        build_collapse_formula,
        build_division_formula,
        build_sum_formula,
        collapse_all,
        combine_product_to_map,
        extract_linear_powers,
    },
    radical::{format_root, format_square, square_part, Extraction, RadicalComponent},
};
use tutor_error::Error;
use super::{decimalize_step, hints, substitute_step, unexpected_shape, SolutionPattern, Trace};

#[derive(Debug)]
enum State {
    Initial,
    SimplifyExponentUnderRoot,
    SplitRootIntoFactors { radicand: Monomial },
    ExtractPerfectSquare { square: Monomial, rest: Monomial, split: String },
    SubstituteAndCompute { component: RadicalComponent },
    Decimalize { substitution: Substitution },
    Done(Value),
}

/// Reduces the radicand to a single [`Monomial`], returning it along with the laws applied and the
/// formulas that apply them.
fn simplify_radicand(radicand: &Node) -> Result<(Monomial, Vec<&'static str>, Vec<String>), Error> {
    let (collapsed, transforms) = collapse_all(radicand);
    let mut laws = Vec::new();
    let mut formulas = Vec::new();
    if !transforms.is_empty() {
        laws.push(hints::POWER_OF_POWER);
        formulas.extend(transforms.iter().map(build_collapse_formula));
    }

    let (numerator, denominator) = match &collapsed {
        Node::Fraction(numerator, denominator) => (&**numerator, Some(&**denominator)),
        other => (other, None),
    };

    let contributions = combine_product_to_map(numerator)?;
    if let Some(formula) = build_sum_formula(&contributions) {
        laws.push(hints::PRODUCT_OF_POWERS);
        formulas.push(formula);
    }

    let Some(denominator) = denominator else {
        return Ok((contributions.combined, laws, formulas));
    };

    let denominator = extract_linear_powers(denominator)?;
    if let Some(formula) = build_division_formula(&contributions.combined, &denominator) {
        laws.push(hints::QUOTIENT_OF_POWERS);
        formulas.push(formula);
    }
    let simplified = contributions.combined
        .checked_div(&denominator)
        .ok_or_else(|| if denominator.coeff == 0 {
            Error::whole(collapsed.to_string(), DivisionByZero)
        } else {
            Error::whole(collapsed.to_string(), MalformedTree::exponent_too_large())
        })?;
    Ok((simplified, laws, formulas))
}

pub(super) fn solve(
    tree: &Node,
    bindings: &Bindings,
    options: FormatOptions,
    trace: &mut Trace,
) -> Result<Value, Error> {
    let Node::Sqrt(radicand) = tree else {
        return Err(unexpected_shape(SolutionPattern::RadicalPower, tree, "a square root at the top level"));
    };

    let mut state = State::Initial;
    loop {
        state = match state {
            State::Initial => State::SimplifyExponentUnderRoot,
            State::SimplifyExponentUnderRoot => {
                let (radicand, laws, formulas) = simplify_radicand(radicand)?;
                let step = trace.push(
                    "SIMPLIFY_EXPONENT_UNDER_ROOT",
                    hints::SIMPLIFY_EXPONENT_UNDER_ROOT,
                    format_root(&radicand),
                );
                if !laws.is_empty() {
                    step.general(laws.join("; "));
                }
                step.calculation((!formulas.is_empty()).then(|| formulas.join("; ")));
                State::SplitRootIntoFactors { radicand }
            },
            State::SplitRootIntoFactors { radicand } => {
                let (square, rest) = square_part(&radicand);
                check_extraction(&Extraction { radicand: radicand.clone(), extracted: square.clone() }, bindings)?;
                let before = format_root(&radicand);
                let split = match (square.is_one(), rest.is_one()) {
                    (true, _) => before.clone(),
                    (false, true) => format_square(&square),
                    (false, false) => format!("{} · {}", format_square(&square), format_root(&rest)),
                };

                let step = trace.push("SPLIT_ROOT_INTO_FACTORS", hints::SPLIT_ROOT_INTO_FACTORS, split.clone());
                if !square.is_one() && !rest.is_one() {
                    step.general(hints::ROOT_OF_PRODUCT);
                }
                step.calculation((split != before).then(|| format!("{} = {}", before, split)));
                State::ExtractPerfectSquare { square, rest, split }
            },
            State::ExtractPerfectSquare { square, rest, split } => {
                let law = if rest.is_one() { hints::ROOT_OF_SQUARE } else { hints::EXTRACT_SQUARE };
                let nothing_to_extract = square.is_one();
                let component = RadicalComponent { outside: square, inside: rest };
                trace.push("EXTRACT_PERFECT_SQUARE", hints::EXTRACT_PERFECT_SQUARE, component.to_string())
                    .general(law)
                    .calculation((!nothing_to_extract).then(|| format!("{} = {}", split, component)));
                State::SubstituteAndCompute { component }
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

#[cfg(test)]
mod tests {
    use assert_float_eq::{
        afe_abs,
        afe_relative_error_msg,
        afe_is_relative_eq,
        assert_float_relative_eq,
    };
    use crate::{
        error::{NegativeExtraction, NegativeRadicand, NonIntegerExponent},
        primitive::rational,
        solve::Step,
    };
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> Node {
        Node::var("x")
    }

    fn pow(base: Node, exp: i64) -> Node {
        Node::pow(base, Node::int(exp))
    }

    fn bindings(value: i64) -> Bindings {
        [("x", rational(value))].into_iter().collect()
    }

    fn run(tree: &Node, value: i64) -> (Value, Vec<Step>) {
        let mut trace = Trace::new();
        let value = solve(tree, &bindings(value), FormatOptions::default(), &mut trace).unwrap();
        (value, trace.into_steps())
    }

    #[test]
    fn radical_power_scenario() {
        let tree = Node::sqrt(Node::frac(pow(x(), 6), pow(x(), 2)));
        let (value, steps) = run(&tree, 3);
        assert_eq!(value, Value::Exact(rational(9)));

        let calculations = steps.iter()
            .map(|step| step.formula_calculation.as_deref())
            .collect::<Vec<_>>();
        assert_eq!(calculations, vec![
            Some("x⁶/x² = x⁶⁻² = x⁴"),
            Some("√x⁴ = √(x²)²"),
            Some("√(x²)² = x²"),
            Some("3² = 9"),
            None,
        ]);

        let expressions = steps.iter()
            .map(|step| step.expression_after_step.as_str())
            .collect::<Vec<_>>();
        assert_eq!(expressions, vec!["√x⁴", "√(x²)²", "x²", "9", "9"]);
        assert_eq!(steps[0].formula_general.as_deref(), Some(hints::QUOTIENT_OF_POWERS));
        assert_eq!(steps[2].formula_general.as_deref(), Some(hints::ROOT_OF_SQUARE));
    }

    #[test]
    fn irrational_result() {
        let tree = Node::sqrt(Node::product(vec![Node::int(8), pow(x(), 3)]));
        let (value, steps) = run(&tree, 3);
        assert_float_relative_eq!(value.to_f64(), 3.0 * 24f64.sqrt());

        let calculations = steps.iter()
            .map(|step| step.formula_calculation.as_deref())
            .collect::<Vec<_>>();
        assert_eq!(calculations, vec![
            None,
            Some("√(8x³) = √x² · √(8x)"),
            Some("√x² · √(8x) = x√(8x)"),
            Some("3√(8 · 3) = 3√24"),
            Some("3√24 ≈ 14,6969"),
        ]);
        assert_eq!(steps[3].calculation_result, None);
        assert_eq!(steps[4].calculation_result.as_deref(), Some("14,6969"));
    }

    #[test]
    fn tower_under_root() {
        // √((x²)³ · x⁴)
        let tree = Node::sqrt(Node::product(vec![pow(pow(x(), 2), 3), pow(x(), 4)]));
        let (value, steps) = run(&tree, 2);
        assert_eq!(value, Value::Exact(rational(32)));
        assert_eq!(
            steps[0].formula_calculation.as_deref(),
            Some("(x²)³ = x²·³ = x⁶; x⁶ · x⁴ = x⁶⁺⁴ = x¹⁰"),
        );
        assert_eq!(steps[2].expression_after_step, "x⁵");
    }

    #[test]
    fn nothing_to_extract() {
        let tree = Node::sqrt(Node::product(vec![Node::int(3), x()]));
        let (value, steps) = run(&tree, 12);
        assert_eq!(value, Value::Exact(rational(6)));
        assert_eq!(steps[1].formula_calculation, None);
        assert_eq!(steps[2].formula_calculation, None);
        assert_eq!(steps[3].formula_calculation.as_deref(), Some("√(3 · 12) = √36 = 6"));
    }

    #[test]
    fn errors() {
        let mut trace = Trace::new();
        let err = solve(&x(), &bindings(1), FormatOptions::default(), &mut trace).unwrap_err();
        assert!(err.is::<MalformedTree>());

        let tree = Node::sqrt(Node::pow(x(), Node::var("n")));
        let err = solve(&tree, &bindings(1), FormatOptions::default(), &mut Trace::new()).unwrap_err();
        assert!(err.is::<NonIntegerExponent>());

        let tree = Node::sqrt(x());
        let err = solve(&tree, &bindings(-4), FormatOptions::default(), &mut Trace::new()).unwrap_err();
        assert!(err.is::<NegativeRadicand>());

        // √(x^max / x⁻¹)
        let tree = Node::sqrt(Node::frac(pow(x(), i64::MAX), pow(x(), -1)));
        let err = solve(&tree, &bindings(1), FormatOptions::default(), &mut Trace::new()).unwrap_err();
        assert_eq!(err.downcast_ref::<MalformedTree>(), Some(&MalformedTree::exponent_too_large()));

        let tree = Node::sqrt(Node::frac(x(), Node::product(vec![Node::int(0), x()])));
        let err = solve(&tree, &bindings(1), FormatOptions::default(), &mut Trace::new()).unwrap_err();
        assert!(err.is::<DivisionByZero>());
    }

    #[test]
    fn negative_base_keeps_sign_of_root() {
        let tree = Node::sqrt(pow(x(), 4));
        let (value, _) = run(&tree, -3);
        assert_eq!(value, Value::Exact(rational(9)));

        let tree = Node::sqrt(pow(x(), 2));
        let (value, _) = run(&tree, 3);
        assert_eq!(value, Value::Exact(rational(3)));

        let mut trace = Trace::new();
        let err = solve(&tree, &bindings(-3), FormatOptions::default(), &mut trace).unwrap_err();
        assert_eq!(
            err.downcast_ref::<NegativeExtraction>(),
            Some(&NegativeExtraction { name: "x".to_string(), value: "-3".to_string() }),
        );
        assert_eq!(err.src, "√x²");
        assert_eq!(err.spans, vec![1..2]);
        assert_eq!(trace.into_steps().len(), 1);
    }
}
