#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, Respond, ResponseTemplate};

use sw_domain::config::{AuthConfig, Config, ProviderConfig, ProviderKind};
use sw_gateway::bootstrap;
use sw_gateway::state::AppState;

/// Markers that identify each stage's prompt in the request body.
pub const ANALYSIS: &str = "consultor dramatúrgico";
pub const QUESTIONS: &str = "gere 3-5 perguntas";
pub const STRUCTURE: &str = "Crie uma estrutura detalhada";
pub const FINAL: &str = "Crie o roteiro COMPLETO";

pub const IDEA: &str =
    "Um entregador de pizza descobre que cada pedido carrega uma pista de um mistério antigo";

pub const FINAL_SCRIPT: &str = "FADE IN:\n\nEXT. RUA - NOITE\n\nUm ENTREGADOR pedala.\n\nFADE OUT.";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub llm: MockServer,
}

impl TestApp {
    /// In-memory store, one provider pointed at a fresh mock server.
    pub async fn spawn() -> Self {
        let llm = MockServer::start().await;
        let mut config = Config::default();
        config.llm.request_timeout_ms = 5_000;
        config.llm.providers = vec![ProviderConfig {
            id: "mock".into(),
            kind: ProviderKind::OpenaiCompat,
            base_url: llm.uri(),
            auth: AuthConfig {
                key: Some("test-key".into()),
                ..Default::default()
            },
            default_model: Some("gpt-4o".into()),
        }];
        let state = bootstrap::build_app_state(Arc::new(config)).await.unwrap();
        let router = sw_gateway::app(state.clone(), 16);
        Self { router, state, llm }
    }

    pub async fn call(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                req = req.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let resp = self.router.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.call("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.call("POST", uri, body).await
    }

    /// Create a valid script and return its id.
    pub async fn create_script(&self, script_type: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/scripts",
                Some(json!({ "title": "O Entregador", "type": script_type, "idea": IDEA })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["id"].as_i64().unwrap()
    }

    /// Answer every prompt containing `marker` with `responder`.
    pub async fn on_stage(&self, marker: &str, responder: impl Respond + 'static) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_string_contains(marker))
            .respond_with(responder)
            .mount(&self.llm)
            .await;
    }

    /// Canned replies for all four stages.
    pub async fn mount_happy_path(&self) {
        self.mount_stages_except(None).await;
    }

    pub async fn mount_happy_path_except_structure(&self) {
        self.mount_stages_except(Some(STRUCTURE)).await;
    }

    pub async fn mount_happy_path_except_final(&self) {
        self.mount_stages_except(Some(FINAL)).await;
    }

    async fn mount_stages_except(&self, skip: Option<&str>) {
        let stages = [
            (ANALYSIS, analysis_json()),
            (QUESTIONS, questions_json()),
            (STRUCTURE, structure_json(5)),
            (FINAL, FINAL_SCRIPT.to_string()),
        ];
        for (marker, content) in stages {
            if skip != Some(marker) {
                self.on_stage(marker, completion(&content)).await;
            }
        }
    }

    pub async fn ai_sessions(&self, id: i64) -> Vec<Value> {
        let (status, body) = self.get(&format!("/api/scripts/{id}/ai-sessions")).await;
        assert_eq!(status, StatusCode::OK);
        body.as_array().cloned().unwrap_or_default()
    }
}

pub fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "model": "gpt-4o",
        "choices": [{
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 120, "completion_tokens": 40, "total_tokens": 160}
    }))
}

pub fn upstream_error(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({ "error": { "message": message } }))
}

pub fn analysis_json() -> String {
    json!({
        "conflicts": ["tempo contra o relógio"],
        "strengths": ["gancho forte"],
        "weakPoints": ["final aberto"],
        "suggestedStructure": "gancho, pistas, revelação",
        "tone": "suspense",
        "targetAudience": "jovens adultos"
    })
    .to_string()
}

pub fn questions_json() -> String {
    json!({
        "questions": [
            {"id": "cta", "question": "Qual o call-to-action?", "context": "fim do vídeo", "placeholder": "curta e siga"},
            {"question": "Qual o tom da narração?"}
        ]
    })
    .to_string()
}

/// Two sections, the hook lasting `hook` seconds; no `totalDuration`, so
/// the total is the sum of the sections.
pub fn structure_json(hook: u32) -> String {
    json!({
        "sections": [
            {"name": "Gancho", "description": "pista na caixa", "duration": hook, "content": "close na caixa", "tips": ["cortes rápidos"]},
            {"name": "Call-to-Action", "description": "convite", "duration": 6, "content": "siga para a parte 2", "tips": []}
        ],
        "format": "tiktok"
    })
    .to_string()
}

/// Replies from `replies` in order, repeating the last one.
pub struct Sequence {
    replies: Vec<ResponseTemplate>,
    calls: AtomicUsize,
}

impl Sequence {
    pub fn new(replies: Vec<ResponseTemplate>) -> Self {
        Self {
            replies,
            calls: AtomicUsize::new(0),
        }
    }
}

impl Respond for Sequence {
    fn respond(&self, _request: &wiremock::Request) -> ResponseTemplate {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies[n.min(self.replies.len() - 1)].clone()
    }
}
