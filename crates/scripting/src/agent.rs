//! The scripting agent: a sequential state holder that walks one script
//! through analysis, questions, structure and final generation.

use std::sync::Arc;
use std::time::Instant;

use sw_domain::trace::TraceEvent;
use sw_domain::{AgentState, Answers, ScriptType, Step};

use crate::model::ScriptModel;

const THOUGHT_ANALYZING: &str = "Analisando a ideia inicial do roteiro...";
const THOUGHT_QUESTIONS: &str = "Gerando perguntas para refinar a ideia...";
const THOUGHT_STRUCTURE: &str = "Processando as respostas para gerar a estrutura do roteiro...";
const THOUGHT_SCRIPT: &str = "Gerando o roteiro final com base na estrutura e respostas...";
const THOUGHT_REGENERATE: &str = "Regenerando a estrutura do roteiro com base nas respostas...";

const MISSING_STRUCTURE_OR_ANSWERS: &str = "Estrutura ou respostas não disponíveis";
const MISSING_ANSWERS: &str = "Respostas não disponíveis para regenerar estrutura";
const EMPTY_SCRIPT: &str = "Falha ao gerar roteiro final: o modelo não retornou conteúdo";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Errors
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentErrorKind {
    /// The model gateway failed.
    Generation,
    /// The operation needs state an earlier step never produced.
    MissingPrerequisite,
}

/// A failed agent operation, with the state as it stood after the failure.
/// `state.error` carries the same message.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct AgentError {
    pub kind: AgentErrorKind,
    pub message: String,
    pub state: Box<AgentState>,
}

pub type AgentResult = std::result::Result<AgentState, AgentError>;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Agent
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct ScriptingAgent {
    /// Label used in trace events (the session key when registered).
    label: String,
    model: Arc<ScriptModel>,
    state: AgentState,
}

impl ScriptingAgent {
    pub fn new(
        label: impl Into<String>,
        idea: impl Into<String>,
        script_type: ScriptType,
        model: Arc<ScriptModel>,
    ) -> Self {
        Self {
            label: label.into(),
            model,
            state: AgentState::new(idea, script_type),
        }
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    /// Analyse the idea, then draft refinement questions. Each call issues
    /// both model calls again and overwrites earlier results.
    pub async fn process_idea(&mut self) -> AgentResult {
        let started = self.begin();

        self.think(THOUGHT_ANALYZING, Step::Analysis);
        let analyzed = self
            .model
            .analyze_idea(&self.state.idea, self.state.script_type)
            .await;
        let analysis = match analyzed {
            Ok(a) => a,
            Err(e) => return self.fail("analysis", started, AgentErrorKind::Generation, e.to_string()),
        };
        self.state.analysis = Some(analysis.clone());

        self.think(THOUGHT_QUESTIONS, Step::Questions);
        let generated = self
            .model
            .generate_questions(&self.state.idea, self.state.script_type, &analysis)
            .await;
        match generated {
            Ok(questions) => self.state.questions = Some(questions),
            Err(e) => return self.fail("questions", started, AgentErrorKind::Generation, e.to_string()),
        }

        self.advance(Step::Structure);
        self.succeed("questions", started)
    }

    /// Store `answers` verbatim and generate the structure from them.
    pub async fn process_answers(&mut self, answers: Answers) -> AgentResult {
        let started = self.begin();
        self.state.answers = Some(answers);
        self.think(THOUGHT_STRUCTURE, Step::Structure);
        self.run_structure("structure", started).await
    }

    /// Re-run structure generation from the stored answers, overwriting the
    /// current structure. The step is left untouched.
    pub async fn regenerate_structure(&mut self) -> AgentResult {
        let started = self.begin();
        if self.state.answers.is_none() {
            return self.fail(
                "regenerate_structure",
                started,
                AgentErrorKind::MissingPrerequisite,
                MISSING_ANSWERS.into(),
            );
        }
        self.state.thoughts.push(THOUGHT_REGENERATE.into());
        self.run_structure("regenerate_structure", started).await
    }

    /// Write the final script from the structure and answers. A blank
    /// completion is a generation failure; the step stays at `generation`.
    pub async fn generate_final_script(&mut self) -> AgentResult {
        let started = self.begin();
        let prerequisites = self.state.structure.clone().zip(self.state.answers.clone());
        let Some((structure, answers)) = prerequisites else {
            return self.fail(
                "generation",
                started,
                AgentErrorKind::MissingPrerequisite,
                MISSING_STRUCTURE_OR_ANSWERS.into(),
            );
        };

        self.think(THOUGHT_SCRIPT, Step::Generation);
        let written = self
            .model
            .generate_final_script(&self.state.idea, self.state.script_type, &structure, &answers)
            .await;
        match written {
            Ok(text) if text.trim().is_empty() => {
                self.fail("generation", started, AgentErrorKind::Generation, EMPTY_SCRIPT.into())
            }
            Ok(text) => {
                self.state.final_script = Some(text);
                self.advance(Step::Completed);
                self.succeed("generation", started)
            }
            Err(e) => self.fail("generation", started, AgentErrorKind::Generation, e.to_string()),
        }
    }

    // ── internals ───────────────────────────────────────────────────

    async fn run_structure(&mut self, stage: &str, started: Instant) -> AgentResult {
        let Some(answers) = self.state.answers.clone() else {
            return self.fail(stage, started, AgentErrorKind::MissingPrerequisite, MISSING_ANSWERS.into());
        };
        let generated = self
            .model
            .generate_structure(&self.state.idea, self.state.script_type, &answers)
            .await;
        match generated {
            Ok(structure) => {
                self.state.structure = Some(structure);
                self.succeed(stage, started)
            }
            Err(e) => self.fail(stage, started, AgentErrorKind::Generation, e.to_string()),
        }
    }

    fn begin(&mut self) -> Instant {
        self.state.error = None;
        Instant::now()
    }

    fn think(&mut self, thought: &str, step: Step) {
        self.state.thoughts.push(thought.to_string());
        self.advance(step);
    }

    /// Steps only move forward; re-running an earlier stage keeps the
    /// furthest step reached.
    fn advance(&mut self, step: Step) {
        if step > self.state.current_step {
            self.state.current_step = step;
        }
    }

    fn succeed(&self, stage: &str, started: Instant) -> AgentResult {
        self.trace(stage, started, true);
        Ok(self.state.clone())
    }

    fn fail(
        &mut self,
        stage: &str,
        started: Instant,
        kind: AgentErrorKind,
        message: String,
    ) -> AgentResult {
        self.state.error = Some(message.clone());
        self.trace(stage, started, false);
        Err(AgentError {
            kind,
            message,
            state: Box::new(self.state.clone()),
        })
    }

    fn trace(&self, stage: &str, started: Instant, ok: bool) {
        TraceEvent::AgentStage {
            session_key: self.label.clone(),
            stage: stage.to_string(),
            ok,
            duration_ms: started.elapsed().as_millis() as u64,
        }
        .emit();
    }
}
