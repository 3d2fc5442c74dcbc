//! Snapshot of a scripting agent's progress through the wizard.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::content::{Analysis, Question, Structure};
use crate::script::ScriptType;

/// Wizard stage. Advances monotonically; `Analysis` and `Questions` are only
/// observed while their model calls are in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Input,
    Analysis,
    Questions,
    Structure,
    Generation,
    Completed,
}

/// User answers to the refinement questions, keyed by question id.
pub type Answers = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentState {
    pub idea: String,
    pub script_type: ScriptType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<Question>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answers: Option<Answers>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<Structure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_script: Option<String>,
    pub current_step: Step,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Human-readable progress notes, oldest first.
    #[serde(default)]
    pub thoughts: Vec<String>,
}

impl AgentState {
    pub fn new(idea: impl Into<String>, script_type: ScriptType) -> Self {
        Self {
            idea: idea.into(),
            script_type,
            analysis: None,
            questions: None,
            answers: None,
            structure: None,
            final_script: None,
            current_step: Step::Input,
            error: None,
            thoughts: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_serializes_minimal_shape() {
        let s = AgentState::new("ideia", ScriptType::Youtube);
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["scriptType"], "youtube");
        assert_eq!(v["currentStep"], "input");
        assert_eq!(v["thoughts"], serde_json::json!([]));
        assert!(v.get("error").is_none());
        assert!(v.get("finalScript").is_none());
    }

    #[test]
    fn steps_are_ordered() {
        assert!(Step::Input < Step::Analysis);
        assert!(Step::Structure < Step::Generation);
        assert!(Step::Generation < Step::Completed);
    }
}
