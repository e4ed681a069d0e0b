use std::{fs, io::{self, IsTerminal, Read}, process::ExitCode};
use tracing_subscriber::EnvFilter;
use tutor_algebra::{
    eval::{answer_matches, evaluate_node, parse_answer},
    solve::{solve, SolutionCore, Task},
};
use tutor_error::Error;

/// Reads the task document from the file named by the first argument, or from stdin if it is not
/// a terminal. Returns [`None`] if there is nothing to read.
fn read_input() -> io::Result<Option<String>> {
    let mut args = std::env::args();
    args.next();

    if let Some(filename) = args.next() {
        fs::read_to_string(filename).map(Some)
    } else if !io::stdin().is_terminal() {
        let mut input = String::new();
        io::stdin().read_to_string(&mut input)?;
        Ok(Some(input))
    } else {
        Ok(None)
    }
}

/// Warns if the solution disagrees with the task's own answer, or with the value of the
/// expression computed directly from the tree.
fn check_answer(task: &Task, solution: &SolutionCore) {
    let computed = &solution.final_answer.value_machine;
    if let Some(expected) = task.answer.as_deref() {
        match parse_answer(expected) {
            Some(answer) if !answer_matches(computed, &answer) => tracing::warn!(
                expected = expected,
                computed = %solution.final_answer.value_display,
                "the solution disagrees with the task's answer"
            ),
            Some(_) => {},
            None => tracing::warn!(answer = expected, "the task's answer is not a number"),
        }
    }

    match evaluate_node(&task.expression_tree, &task.variables) {
        Ok(direct) => {
            let diff = (direct.to_f64() - computed.to_f64()).abs();
            if diff > 1e-9 * direct.to_f64().abs().max(1.0) {
                tracing::warn!(
                    direct = direct.to_f64(),
                    computed = computed.to_f64(),
                    "the solution disagrees with the value of the expression"
                );
            }
        },
        Err(err) => tracing::warn!(error = %err, "the expression could not be evaluated directly"),
    }
}

/// Reads the task and builds its solution.
fn run(input: &str) -> Result<(Task, SolutionCore), Error> {
    let task = Task::from_json(input)?;
    let solution = solve(&task)?;
    Ok((task, solution))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let input = match read_input() {
        Ok(Some(input)) => input,
        Ok(None) => {
            eprintln!("usage: tutor-solve [TASK.json], or pipe a task into stdin");
            return ExitCode::FAILURE;
        },
        Err(err) => {
            eprintln!("could not read the task: {}", err);
            return ExitCode::FAILURE;
        },
    };

    let (task, solution) = match run(&input) {
        Ok(solved) => solved,
        Err(err) => {
            err.report_to_stderr();
            return ExitCode::FAILURE;
        },
    };
    check_answer(&task, &solution);

    match serde_json::to_string_pretty(&solution) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        },
        Err(err) => {
            eprintln!("could not write the solution: {}", err);
            ExitCode::FAILURE
        },
    }
}
