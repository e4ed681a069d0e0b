//! Worked solutions for algebra problems on powers and square roots.
//!
//! A problem arrives as a [`Task`](solve::Task): an expression tree, the values of its variables,
//! and the name of a solution pattern. [`solve`](solve::solve) simplifies the expression with the
//! laws of exponents and by taking perfect squares out of roots, records each rewrite as a
//! numbered [`Step`](solve::Step) written in exam notation, and finishes with the exact value of
//! the expression (or a decimal approximation, if the value is irrational).
//!
//! ```
//! use tutor_algebra::{ast::Node, eval::Bindings, primitive::rational, solve::{solve, Task}};
//!
//! let a = || Node::var("a");
//! let task = Task {
//!     question_id: None,
//!     question_group: None,
//!     expression_tree: Node::frac(
//!         Node::product(vec![
//!             Node::pow(Node::pow(a(), Node::int(2)), Node::int(3)),
//!             Node::pow(a(), Node::int(5)),
//!         ]),
//!         Node::pow(a(), Node::int(4)),
//!     ),
//!     variables: [("a", rational(2))].into_iter().collect::<Bindings>(),
//!     answer: Some("128".to_string()),
//!     solution_pattern: "alg_power_fraction".to_string(),
//! };
//!
//! let solution = solve(&task).unwrap();
//! assert_eq!(solution.calculation_steps[0].formula_calculation.as_deref(), Some("(a²)³ = a²·³ = a⁶"));
//! assert_eq!(solution.final_answer.value_display, "128");
//! ```

pub mod ast;
pub mod error;
pub mod eval;
pub mod fmt;
pub mod monomial;
pub mod power;
pub mod primitive;
pub mod radical;
pub mod render;
pub mod solve;
pub mod step_collector;

pub use ast::Node;
pub use solve::{solve, solve_with, SolutionCore, SolveOptions, Task};

#[cfg(test)]
mod tests {
    use assert_float_eq::{
        afe_abs,
        afe_relative_error_msg,
        afe_is_relative_eq,
        assert_float_relative_eq,
    };
    use crate::{
        error::{NegativeExtraction, NegativeRadicand},
        eval::{answer_matches, evaluate_node, parse_answer, Bindings, Value},
        primitive::rational,
    };
    use pretty_assertions::assert_eq;
    use rand::Rng;
    use super::*;

    const FIXTURES: [&str; 4] = [
        include_str!("../tasks/power_fraction.json"),
        include_str!("../tasks/radical_power.json"),
        include_str!("../tasks/radical_fraction.json"),
        include_str!("../tasks/irrational.json"),
    ];

    /// Asserts that the value of a solution is the value of the expression it started from.
    fn assert_equivalent(solved: &Value, direct: &Value) {
        match (solved, direct) {
            (Value::Exact(solved), Value::Exact(direct)) => assert_eq!(solved, direct),
            (solved, direct) => assert_float_relative_eq!(solved.to_f64(), direct.to_f64()),
        }
    }

    #[test]
    fn fixtures_solve() {
        for src in FIXTURES {
            let task = Task::from_json(src).unwrap();
            let solution = solve(&task).unwrap();

            let direct = evaluate_node(&task.expression_tree, &task.variables).unwrap();
            assert_equivalent(&solution.final_answer.value_machine, &direct);

            let answer = task.answer.as_deref().and_then(parse_answer).unwrap();
            assert!(answer_matches(&solution.final_answer.value_machine, &answer), "{}", src);

            for (i, step) in solution.calculation_steps.iter().enumerate() {
                assert_eq!(step.step_number, i + 1);
            }
        }
    }

    #[test]
    fn fixture_answers() {
        let displays = FIXTURES.iter()
            .map(|src| solve(&Task::from_json(src).unwrap()).unwrap().final_answer.value_display)
            .collect::<Vec<_>>();
        assert_eq!(displays, vec!["128", "9", "15", "14,6969"]);
    }

    #[test]
    fn fixture_question_group() {
        let solution = solve(&Task::from_json(FIXTURES[2]).unwrap()).unwrap();
        assert_eq!(solution.question_id, "radicals-0002");
        assert_eq!(solution.question_group, "algebra_radical_fractions");
    }

    fn pow(name: &str, exp: i64) -> Node {
        Node::pow(Node::var(name), Node::int(exp))
    }

    #[test]
    fn random_power_fractions() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            // (aⁱ)ᵒ · aᵐ · bⁿ / (k · aᵈ)
            let numerator = Node::product(vec![
                Node::pow(pow("a", rng.gen_range(-3..=4)), Node::int(rng.gen_range(-2..=3))),
                pow("a", rng.gen_range(-4..=6)),
                pow("b", rng.gen_range(-2..=3)),
            ]);
            let denominator = Node::product(vec![
                Node::int(rng.gen_range(1..=6)),
                pow("a", rng.gen_range(-3..=5)),
            ]);
            let mut a = rng.gen_range(-5..=5);
            if a == 0 {
                a = 1;
            }
            let variables = [("a", rational(a)), ("b", rational((rng.gen_range(1..=9), 2)))]
                .into_iter()
                .collect::<Bindings>();

            let task = Task {
                question_id: None,
                question_group: None,
                expression_tree: Node::frac(numerator, denominator),
                variables,
                answer: None,
                solution_pattern: "alg_power_fraction".to_string(),
            };
            let solution = solve(&task).unwrap();
            let direct = evaluate_node(&task.expression_tree, &task.variables).unwrap();
            assert_equivalent(&solution.final_answer.value_machine, &direct);
            assert_eq!(solution.calculation_steps.len(), 5);
        }
    }

    #[test]
    fn random_radical_powers() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            // √(k · xᵐ / xⁿ)
            let radicand = Node::frac(
                Node::product(vec![Node::int(rng.gen_range(1..=50)), pow("x", rng.gen_range(0..=9))]),
                pow("x", rng.gen_range(0..=4)),
            );
            let variables = [("x", rational(rng.gen_range(1..=12)))].into_iter().collect::<Bindings>();

            let task = Task {
                question_id: None,
                question_group: None,
                expression_tree: Node::sqrt(radicand),
                variables,
                answer: None,
                solution_pattern: "alg_radical_power".to_string(),
            };
            let solution = solve(&task).unwrap();
            let direct = evaluate_node(&task.expression_tree, &task.variables).unwrap();
            assert_equivalent(&solution.final_answer.value_machine, &direct);
        }
    }

    #[test]
    fn random_radical_fractions() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            // (√(k · aᵐ) · √(l · a)) / (n · aᵈ)
            let numerator = Node::product(vec![
                Node::sqrt(Node::product(vec![Node::int(rng.gen_range(1..=20)), pow("a", rng.gen_range(1..=5))])),
                Node::sqrt(Node::product(vec![Node::int(rng.gen_range(1..=20)), Node::var("a")])),
            ]);
            let denominator = Node::product(vec![Node::int(rng.gen_range(1..=6)), pow("a", rng.gen_range(0..=3))]);
            let variables = [("a", rational(rng.gen_range(1..=9)))].into_iter().collect::<Bindings>();

            let task = Task {
                question_id: None,
                question_group: None,
                expression_tree: Node::frac(numerator, denominator),
                variables,
                answer: None,
                solution_pattern: "alg_radical_fraction".to_string(),
            };
            let solution = solve(&task).unwrap();
            let direct = evaluate_node(&task.expression_tree, &task.variables).unwrap();
            assert_equivalent(&solution.final_answer.value_machine, &direct);
            assert_eq!(solution.calculation_steps.len(), 8);
        }
    }

    #[test]
    fn random_negative_bindings() {
        let mut rng = rand::thread_rng();
        for _ in 0..400 {
            let value = match rng.gen_range(-9..=9) {
                0 => -1,
                value => value,
            };
            let (expression_tree, solution_pattern, name) = if rng.gen_bool(0.5) {
                // √(k · xᵐ / xⁿ)
                let radicand = Node::frac(
                    Node::product(vec![Node::int(rng.gen_range(1..=50)), pow("x", rng.gen_range(0..=9))]),
                    pow("x", rng.gen_range(-2..=4)),
                );
                (Node::sqrt(radicand), "alg_radical_power", "x")
            } else {
                // (√(k · aᵐ) · √(l · aʲ)) / (n · aᵈ)
                let numerator = Node::product(vec![
                    Node::sqrt(Node::product(vec![Node::int(rng.gen_range(1..=20)), pow("a", rng.gen_range(0..=5))])),
                    Node::sqrt(Node::product(vec![Node::int(rng.gen_range(1..=20)), pow("a", rng.gen_range(0..=3))])),
                ]);
                let denominator = Node::product(vec![Node::int(rng.gen_range(1..=6)), pow("a", rng.gen_range(0..=3))]);
                (Node::frac(numerator, denominator), "alg_radical_fraction", "a")
            };

            let task = Task {
                question_id: None,
                question_group: None,
                expression_tree,
                variables: [(name, rational(value))].into_iter().collect(),
                answer: None,
                solution_pattern: solution_pattern.to_string(),
            };
            let direct = evaluate_node(&task.expression_tree, &task.variables);
            match (solve(&task), direct) {
                (Ok(solution), Ok(direct)) => assert_equivalent(&solution.final_answer.value_machine, &direct),
                (Ok(solution), Err(err)) => panic!(
                    "{} solved to {:?} with {} = {}, but evaluates to {:?}",
                    task.expression_tree, solution.final_answer.value_machine, name, value, err,
                ),
                (Err(err), _) => assert!(
                    err.is::<NegativeExtraction>() || err.is::<NegativeRadicand>(),
                    "{} with {} = {}: {:?}",
                    task.expression_tree, name, value, err,
                ),
            }
        }
    }
}
