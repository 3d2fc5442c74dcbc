//! Model gateway: one-shot prompts to the configured LLM and typed parsing
//! of what comes back.
//!
//! Every failure is reported as [`Error::Generation`] with a pt-BR prefix
//! naming the stage, followed by the underlying error text. There is no
//! retry and no partial-result recovery.

use std::sync::Arc;

use serde_json::Value;
use sw_domain::config::GenerationConfig;
use sw_domain::error::{Error, Result};
use sw_domain::{Analysis, Answers, Question, ScriptType, Structure};
use sw_providers::{ChatRequest, LlmProvider, Message, ProviderRegistry};

use crate::prompts;

const ANALYSIS_FAILED: &str = "Falha ao analisar ideia: ";
const QUESTIONS_FAILED: &str = "Falha ao gerar perguntas: ";
const STRUCTURE_FAILED: &str = "Falha ao gerar estrutura: ";
const SCRIPT_FAILED: &str = "Falha ao gerar roteiro final: ";

pub struct ScriptModel {
    provider: Option<Arc<dyn LlmProvider>>,
    params: GenerationConfig,
}

impl ScriptModel {
    pub fn new(provider: Option<Arc<dyn LlmProvider>>, params: GenerationConfig) -> Self {
        Self { provider, params }
    }

    /// Pick the provider named in `params.provider`, or the first registered.
    /// A missing provider is not fatal here; every call then fails with a
    /// generation error.
    pub fn from_registry(registry: &ProviderRegistry, params: GenerationConfig) -> Self {
        let provider = registry.resolve(params.provider.as_deref());
        if provider.is_none() {
            tracing::warn!(
                provider = ?params.provider,
                "no LLM provider available for generation"
            );
        }
        Self::new(provider, params)
    }

    pub fn provider_id(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.provider_id())
    }

    // ── stages ──────────────────────────────────────────────────────

    pub async fn analyze_idea(&self, idea: &str, t: ScriptType) -> Result<Analysis> {
        let run = async {
            let prompt = prompts::analysis(idea, t);
            let value = self
                .complete_json(prompt, self.params.analysis_temperature)
                .await?;
            Ok::<_, Error>(serde_json::from_value::<Analysis>(value)?)
        };
        run.await.map_err(|e| stage_error(ANALYSIS_FAILED, e))
    }

    pub async fn generate_questions(
        &self,
        idea: &str,
        t: ScriptType,
        analysis: &Analysis,
    ) -> Result<Vec<Question>> {
        let run = async {
            let prompt = prompts::questions(idea, t, analysis);
            let value = self
                .complete_json(prompt, self.params.questions_temperature)
                .await?;
            Ok::<_, Error>(parse_questions(value))
        };
        run.await.map_err(|e| stage_error(QUESTIONS_FAILED, e))
    }

    pub async fn generate_structure(
        &self,
        idea: &str,
        t: ScriptType,
        answers: &Answers,
    ) -> Result<Structure> {
        let run = async {
            let prompt = prompts::structure(idea, t, answers);
            let value = self
                .complete_json(prompt, self.params.structure_temperature)
                .await?;
            let mut structure = serde_json::from_value::<Structure>(value)?;
            if structure.format.trim().is_empty() {
                structure.format = t.as_str().to_string();
            }
            Ok::<_, Error>(structure)
        };
        run.await.map_err(|e| stage_error(STRUCTURE_FAILED, e))
    }

    /// Free-text final script. An empty completion yields an empty string.
    pub async fn generate_final_script(
        &self,
        idea: &str,
        t: ScriptType,
        structure: &Structure,
        answers: &Answers,
    ) -> Result<String> {
        let req = ChatRequest {
            messages: vec![Message::user(prompts::final_script(idea, t, structure, answers))],
            temperature: Some(self.params.script_temperature),
            max_tokens: Some(self.params.script_max_tokens),
            json_mode: false,
            model: self.params.model.clone(),
        };
        self.chat(&req)
            .await
            .map_err(|e| stage_error(SCRIPT_FAILED, e))
    }

    // ── plumbing ────────────────────────────────────────────────────

    async fn chat(&self, req: &ChatRequest) -> Result<String> {
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| Error::Other("nenhum provedor de LLM configurado".into()))?;
        Ok(provider.chat(req).await?.content)
    }

    async fn complete_json(&self, prompt: String, temperature: f32) -> Result<Value> {
        let req = ChatRequest {
            messages: vec![Message::user(prompt)],
            temperature: Some(temperature),
            max_tokens: None,
            json_mode: true,
            model: self.params.model.clone(),
        };
        let content = self.chat(&req).await?;
        parse_object(&content)
    }
}

fn stage_error(prefix: &str, e: Error) -> Error {
    let detail = match e {
        Error::Provider { message, .. } => message,
        other => other.to_string(),
    };
    tracing::warn!(stage = prefix.trim_end_matches([':', ' ']), error = %detail, "generation stage failed");
    Error::Generation(format!("{prefix}{detail}"))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Response parsing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Remove a surrounding Markdown code fence (```` ```json ... ``` ````).
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json", "JSON", ...) on the opening line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parse a completion that must be a JSON object. Empty content counts as
/// an empty object so every field takes its fallback.
pub(crate) fn parse_object(raw: &str) -> Result<Value> {
    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    let value: Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Err(Error::Other(format!(
            "resposta do modelo não é um objeto JSON (recebido: {})",
            json_kind(&value)
        )));
    }
    Ok(value)
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// `questions` may be absent or malformed; anything that is not an object
/// counts as a blank question and is dropped, keeping positions stable for
/// id fallback.
fn parse_questions(mut value: Value) -> Vec<Question> {
    let items = match value.get_mut("questions").map(Value::take) {
        Some(Value::Array(items)) => items,
        _ => return Vec::new(),
    };
    let questions = items
        .into_iter()
        .map(|item| {
            if item.is_object() {
                serde_json::from_value(item).unwrap_or_default()
            } else {
                Question::default()
            }
        })
        .collect();
    Question::normalize_all(questions)
}
