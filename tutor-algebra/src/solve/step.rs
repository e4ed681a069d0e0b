use serde::Serialize;

/// A single step of a worked solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    /// The position of the step in the solution, starting at 1.
    pub step_number: usize,

    /// What is done in this step.
    pub description: String,

    /// The general law applied in this step, such as `(aᵐ)ⁿ = aᵐ·ⁿ`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula_general: Option<String>,

    /// The law applied to the expression at hand, such as `(a²)³ = a²·³ = a⁶`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula_calculation: Option<String>,

    /// The whole expression after this step.
    pub expression_after_step: String,

    /// The number computed in this step, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculation_result: Option<String>,
}

impl Step {
    /// Sets the general law applied in this step.
    pub fn general(&mut self, formula: impl Into<String>) -> &mut Self {
        self.formula_general = Some(formula.into());
        self
    }

    /// Sets the law as applied to the expression, if there is one.
    pub fn calculation(&mut self, formula: Option<String>) -> &mut Self {
        self.formula_calculation = formula;
        self
    }

    /// Sets the number computed in this step.
    pub fn result(&mut self, result: impl Into<String>) -> &mut Self {
        self.calculation_result = Some(result.into());
        self
    }
}

/// The steps of a solution, numbered in the order they are added.
///
/// Steps can only be appended; once added, a step keeps its number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    steps: Vec<Step>,
}

impl Trace {
    /// Creates an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of steps added so far.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if no step was added yet.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Appends a step entered through the given state, returning it so that its optional fields
    /// can be filled in.
    pub fn push(
        &mut self,
        state: &'static str,
        description: impl Into<String>,
        expression_after_step: impl Into<String>,
    ) -> &mut Step {
        let step_number = self.steps.len() + 1;
        tracing::trace!(state = state, step_number = step_number, "transition");

        self.steps.push(Step {
            step_number,
            description: description.into(),
            formula_general: None,
            formula_calculation: None,
            expression_after_step: expression_after_step.into(),
            calculation_result: None,
        });

        // the step was just pushed
        let last = self.steps.len() - 1;
        &mut self.steps[last]
    }

    /// Returns the steps.
    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }
}
