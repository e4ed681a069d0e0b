use crate::eval::Value;
use serde::Serialize;
use super::step::Step;

/// The answer a worked solution arrives at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalAnswer {
    /// The value, for machine comparison.
    pub value_machine: Value,

    /// The value as it is shown to the student.
    pub value_display: String,

    /// The unit of the value. Always empty for algebra tasks.
    pub unit: String,
}

/// A complete worked solution, ready to be handed to whatever presents it to the student.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolutionCore {
    pub question_id: String,
    pub question_group: String,
    pub explanation_idea: String,
    pub calculation_steps: Vec<Step>,
    pub final_answer: FinalAnswer,
    pub hints: Vec<String>,
}

impl SolutionCore {
    /// Returns the solution as a JSON document.
    pub fn to_json(&self) -> serde_json::Value {
        // every field serializes to a plain JSON value
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
