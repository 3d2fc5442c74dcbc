use serde::Serialize;

/// Structured trace events emitted across all Scriptwright crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    ScriptCreated {
        script_id: i64,
        script_type: String,
        idea_chars: usize,
    },
    ScriptCompleted {
        script_id: i64,
        duration_secs: u32,
        script_chars: usize,
    },
    AgentStage {
        session_key: String,
        stage: String,
        ok: bool,
        duration_ms: u64,
    },
    SessionOpened {
        session_key: String,
        replaced: bool,
    },
    SessionClosed {
        session_key: String,
    },
    SessionEvicted {
        session_key: String,
        reason: String,
    },
    LlmRequest {
        provider: String,
        model: String,
        json_mode: bool,
        duration_ms: u64,
        prompt_tokens: Option<u32>,
        completion_tokens: Option<u32>,
    },
    AiSessionRecorded {
        script_id: i64,
        step: String,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "sw_event");
    }
}
