//! Script CRUD endpoints. Every route acts as the demo user.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use sw_domain::trace::TraceEvent;
use sw_domain::{NewScript, Script, ScriptPatch};

use super::error::{parse_id, ApiError};
use crate::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /api/scripts
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn list_scripts(State(state): State<AppState>) -> Result<Json<Vec<Script>>, ApiError> {
    let scripts = state.store.scripts_by_user(state.demo_user_id).await?;
    Ok(Json(scripts))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /api/scripts
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Raw wizard input; every field is checked by [`NewScript::parse`] so all
/// problems are reported together.
#[derive(Debug, Deserialize)]
pub struct CreateScriptBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "type")]
    pub script_type: Option<String>,
    #[serde(default)]
    pub idea: Option<String>,
}

pub async fn create_script(
    State(state): State<AppState>,
    body: Result<Json<CreateScriptBody>, JsonRejection>,
) -> Result<Json<Script>, ApiError> {
    let Json(body) = body?;
    let new = NewScript::parse(
        body.title.as_deref(),
        body.script_type.as_deref(),
        body.idea.as_deref(),
    )?;
    let script = state.store.create_script(state.demo_user_id, new).await?;

    TraceEvent::ScriptCreated {
        script_id: script.id,
        script_type: script.script_type.to_string(),
        idea_chars: script.idea.chars().count(),
    }
    .emit();

    Ok(Json(script))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /api/scripts/:id
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn get_script(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Script>, ApiError> {
    let id = parse_id(&id)?;
    state
        .store
        .get_script(id)
        .await?
        .map(Json)
        .ok_or_else(ApiError::script_not_found)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PATCH /api/scripts/:id
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Partial update. The store rejects patches that would reopen a
/// completed script or split `structure` from `finalScript`.
pub async fn update_script(
    State(state): State<AppState>,
    Path(id): Path<String>,
    patch: Result<Json<ScriptPatch>, JsonRejection>,
) -> Result<Json<Script>, ApiError> {
    let id = parse_id(&id)?;
    let Json(patch) = patch?;
    state
        .store
        .update_script(id, patch)
        .await?
        .map(Json)
        .ok_or_else(ApiError::script_not_found)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DELETE /api/scripts/:id
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Remove the script with its audit trail and close any live session.
pub async fn delete_script(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    if !state.store.delete_script(id).await? {
        return Err(ApiError::script_not_found());
    }
    state.sessions.remove(&sw_sessions::session_key(id));
    tracing::info!(script_id = id, "script deleted");
    Ok(StatusCode::NO_CONTENT)
}
