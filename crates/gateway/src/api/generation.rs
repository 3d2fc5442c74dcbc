//! Wizard endpoints that drive the scripting agent.
//!
//! `/analyze` opens (or replaces) the session for a script; the other
//! stages look it up and fail with 400 when there is none. Each stage that
//! reaches the model writes one audit record, whether it succeeded or not.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use sw_domain::trace::TraceEvent;
use sw_domain::{AgentState, AiSession, AiStep, Answers, NewAiSession, ScriptPatch, ScriptStatus};
use sw_scripting::{AgentErrorKind, AgentResult, ScriptingAgent};
use sw_sessions::{session_key, AgentHandle};

use super::error::{parse_id, ApiError};
use crate::state::AppState;

const NO_SESSION_ANALYZE_AGAIN: &str = "Sessão da IA não encontrada. Inicie a análise novamente.";
const NO_SESSION_START_OVER: &str = "Sessão da IA não encontrada. Inicie o processo novamente.";

fn live_session(
    state: &AppState,
    script_id: i64,
    missing: &str,
) -> Result<AgentHandle<ScriptingAgent>, ApiError> {
    state
        .sessions
        .get(&session_key(script_id))
        .ok_or_else(|| ApiError::BadRequest(missing.into()))
}

/// Append an audit record for a stage that ran, then hand the outcome back.
/// Prerequisite failures never reached the model and are not recorded.
async fn record(
    state: &AppState,
    script_id: i64,
    step: AiStep,
    input: Value,
    result: AgentResult,
) -> Result<Json<AgentState>, ApiError> {
    let snapshot = match &result {
        Ok(s) => Some(s),
        Err(e) if e.kind == AgentErrorKind::Generation => Some(e.state.as_ref()),
        Err(_) => None,
    };
    if let Some(snapshot) = snapshot {
        let output = serde_json::to_value(snapshot).map_err(|e| ApiError::Internal(e.to_string()))?;
        state
            .store
            .create_ai_session(NewAiSession {
                script_id,
                step,
                input,
                output,
            })
            .await?;
        TraceEvent::AiSessionRecorded {
            script_id,
            step: step.as_str().into(),
        }
        .emit();
    }
    Ok(Json(result?))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /api/scripts/:id/analyze
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Start a fresh agent for the script, replacing any previous session.
pub async fn analyze(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AgentState>, ApiError> {
    let id = parse_id(&id)?;
    let script = state
        .store
        .get_script(id)
        .await?
        .ok_or_else(ApiError::script_not_found)?;

    let key = session_key(id);
    let agent = ScriptingAgent::new(&key, &script.idea, script.script_type, state.model.clone());
    let (handle, _replaced) = state.sessions.insert(&key, agent);

    let result = handle.lock().await.process_idea().await;
    let input = json!({ "idea": script.idea, "type": script.script_type });
    record(&state, id, AiStep::Analysis, input, result).await
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /api/scripts/:id/answers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct AnswersBody {
    pub answers: Answers,
}

pub async fn submit_answers(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<AnswersBody>, JsonRejection>,
) -> Result<Json<AgentState>, ApiError> {
    let id = parse_id(&id)?;
    let Json(AnswersBody { answers }) = body?;
    let handle = live_session(&state, id, NO_SESSION_ANALYZE_AGAIN)?;

    let input = json!({ "answers": answers });
    let result = handle.lock().await.process_answers(answers).await;
    record(&state, id, AiStep::Structure, input, result).await
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /api/scripts/:id/generate
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Write the final script, persist it on the record, and close the session.
pub async fn generate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AgentState>, ApiError> {
    let id = parse_id(&id)?;
    let handle = live_session(&state, id, NO_SESSION_START_OVER)?;

    let result = handle.lock().await.generate_final_script().await;

    if let Ok(agent_state) = &result {
        persist_final_script(&state, id, agent_state).await?;
    }
    let response = record(&state, id, AiStep::Generation, json!({}), result).await?;

    state.sessions.remove_if_current(&session_key(id), &handle);
    Ok(response)
}

async fn persist_final_script(
    state: &AppState,
    script_id: i64,
    agent_state: &AgentState,
) -> Result<(), ApiError> {
    let (Some(structure), Some(final_script)) = (&agent_state.structure, &agent_state.final_script)
    else {
        return Ok(());
    };
    let patch = ScriptPatch {
        structure: Some(structure.clone()),
        final_script: Some(final_script.clone()),
        status: Some(ScriptStatus::Completed),
        duration: Some(structure.total_duration),
    };
    match state.store.update_script(script_id, patch).await? {
        Some(script) => TraceEvent::ScriptCompleted {
            script_id,
            duration_secs: script.duration.unwrap_or_default(),
            script_chars: final_script.chars().count(),
        }
        .emit(),
        None => tracing::warn!(script_id, "script vanished before the final script was saved"),
    }
    Ok(())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /api/scripts/:id/regenerate-structure
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn regenerate_structure(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AgentState>, ApiError> {
    let id = parse_id(&id)?;
    let handle = live_session(&state, id, NO_SESSION_START_OVER)?;

    let result = handle.lock().await.regenerate_structure().await;
    record(&state, id, AiStep::Structure, json!({ "regenerate": true }), result).await
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /api/scripts/:id/ai-sessions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn list_ai_sessions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<AiSession>>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.store.ai_sessions_by_script(id).await?))
}
