use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use sw_domain::config::GenerationConfig;
use sw_domain::error::{Error, Result};
use sw_domain::{Answers, ScriptType, Step};
use sw_providers::{ChatRequest, ChatResponse, LlmProvider};
use sw_scripting::{AgentErrorKind, ScriptModel, ScriptingAgent};

const IDEA: &str = "Um entregador de pizza descobre que cada pedido carrega uma pista de um mistério";

/// Replays canned completions in order and records every request.
#[derive(Default)]
struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String>>>,
    seen: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    fn with(replies: Vec<Result<String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<ChatRequest> {
        self.seen.lock().clone()
    }
}

#[async_trait::async_trait]
impl LlmProvider for ScriptedProvider {
    async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse> {
        self.seen.lock().push(req.clone());
        let reply = self
            .replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Other("no scripted reply left".into())))?;
        Ok(ChatResponse {
            content: reply,
            usage: None,
            model: "scripted".into(),
            finish_reason: Some("stop".into()),
        })
    }

    fn provider_id(&self) -> &str {
        "scripted"
    }

    fn default_model(&self) -> &str {
        "scripted"
    }
}

fn analysis_json() -> Result<String> {
    Ok(r#"{"conflicts":["tempo"],"strengths":["gancho"],"weakPoints":[],"suggestedStructure":"3 atos","tone":"suspense","targetAudience":"jovens"}"#.into())
}

fn questions_json() -> Result<String> {
    Ok(r#"{"questions":[{"id":"cta","question":"Qual o CTA?","context":"","placeholder":"curta"}]}"#.into())
}

fn structure_json(hook: u32) -> Result<String> {
    Ok(format!(
        r#"{{"sections":[{{"name":"Gancho","duration":{hook}}},{{"name":"CTA","duration":6}}]}}"#
    ))
}

fn agent(provider: Arc<ScriptedProvider>) -> ScriptingAgent {
    let model = ScriptModel::new(Some(provider), GenerationConfig::default());
    ScriptingAgent::new("script_1", IDEA, ScriptType::Tiktok, Arc::new(model))
}

fn answers() -> Answers {
    let mut a = Answers::new();
    a.insert("cta".into(), "like".into());
    a
}

#[tokio::test]
async fn full_pipeline_reaches_completed() {
    let provider = ScriptedProvider::with(vec![
        analysis_json(),
        questions_json(),
        structure_json(5),
        Ok("FADE IN:\nINT. PIZZARIA - NOITE".into()),
    ]);
    let mut agent = agent(provider.clone());

    let s = agent.process_idea().await.unwrap();
    assert_eq!(s.current_step, Step::Structure);
    assert_eq!(s.analysis.as_ref().unwrap().tone, "suspense");
    assert_eq!(s.questions.as_ref().unwrap()[0].id, "cta");
    assert_eq!(s.thoughts.len(), 2);

    let s = agent.process_answers(answers()).await.unwrap();
    assert_eq!(s.current_step, Step::Structure);
    let structure = s.structure.unwrap();
    assert_eq!(structure.total_duration, 11);
    assert_eq!(structure.format, "tiktok");

    let s = agent.generate_final_script().await.unwrap();
    assert_eq!(s.current_step, Step::Completed);
    assert!(s.final_script.unwrap().starts_with("FADE IN:"));
    assert!(s.error.is_none());

    let reqs = provider.requests();
    assert_eq!(reqs.len(), 4);
    assert!(reqs[..3].iter().all(|r| r.json_mode));
    assert!(!reqs[3].json_mode);
    assert_eq!(reqs[3].max_tokens, Some(2000));
    assert_eq!(reqs[0].temperature, Some(0.7));
    assert_eq!(reqs[1].temperature, Some(0.8));
}

#[tokio::test]
async fn analysis_failure_is_tagged_and_recorded_in_state() {
    let provider = ScriptedProvider::with(vec![Err(Error::Provider {
        provider: "scripted".into(),
        message: "HTTP 401 - invalid key".into(),
    })]);
    let mut agent = agent(provider);

    let err = agent.process_idea().await.unwrap_err();
    assert_eq!(err.kind, AgentErrorKind::Generation);
    assert_eq!(err.message, "Falha ao analisar ideia: HTTP 401 - invalid key");
    assert_eq!(err.state.error.as_deref(), Some(err.message.as_str()));
    assert_eq!(err.state.current_step, Step::Analysis);
    assert!(err.state.analysis.is_none());
}

#[tokio::test]
async fn questions_failure_keeps_analysis() {
    let provider = ScriptedProvider::with(vec![analysis_json(), Ok("[1,2,3]".into())]);
    let mut agent = agent(provider);

    let err = agent.process_idea().await.unwrap_err();
    assert!(err.message.starts_with("Falha ao gerar perguntas: "));
    assert!(err.state.analysis.is_some());
    assert_eq!(err.state.current_step, Step::Questions);
}

#[tokio::test]
async fn error_is_cleared_by_next_operation() {
    let provider = ScriptedProvider::with(vec![
        Err(Error::Timeout("slow".into())),
        analysis_json(),
        questions_json(),
    ]);
    let mut agent = agent(provider);

    assert!(agent.process_idea().await.is_err());
    assert!(agent.state().error.is_some());
    let s = agent.process_idea().await.unwrap();
    assert!(s.error.is_none());
}

#[tokio::test]
async fn generate_without_structure_is_missing_prerequisite() {
    let provider = ScriptedProvider::with(vec![]);
    let mut agent = agent(provider.clone());

    let err = agent.generate_final_script().await.unwrap_err();
    assert_eq!(err.kind, AgentErrorKind::MissingPrerequisite);
    assert_eq!(err.message, "Estrutura ou respostas não disponíveis");
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn regenerate_without_answers_is_missing_prerequisite() {
    let provider = ScriptedProvider::with(vec![]);
    let mut agent = agent(provider.clone());

    let err = agent.regenerate_structure().await.unwrap_err();
    assert_eq!(err.kind, AgentErrorKind::MissingPrerequisite);
    assert_eq!(err.message, "Respostas não disponíveis para regenerar estrutura");
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn regenerate_overwrites_structure_without_moving_step() {
    let provider = ScriptedProvider::with(vec![
        analysis_json(),
        questions_json(),
        structure_json(5),
        structure_json(10),
        structure_json(20),
    ]);
    let mut agent = agent(provider);

    agent.process_idea().await.unwrap();
    agent.process_answers(answers()).await.unwrap();

    let s = agent.regenerate_structure().await.unwrap();
    assert_eq!(s.current_step, Step::Structure);
    assert_eq!(s.structure.as_ref().unwrap().sections[0].duration, 10);

    let s = agent.regenerate_structure().await.unwrap();
    assert_eq!(s.structure.as_ref().unwrap().sections[0].duration, 20);
    assert_eq!(
        s.thoughts.last().map(String::as_str),
        Some("Regenerando a estrutura do roteiro com base nas respostas...")
    );
}

#[tokio::test]
async fn empty_answers_are_accepted() {
    let provider = ScriptedProvider::with(vec![structure_json(5)]);
    let mut agent = agent(provider);
    let s = agent.process_answers(Answers::new()).await.unwrap();
    assert_eq!(s.answers, Some(Answers::new()));
    assert!(s.structure.is_some());
}

#[tokio::test]
async fn missing_provider_fails_every_stage() {
    let model = ScriptModel::new(None, GenerationConfig::default());
    let mut agent = ScriptingAgent::new("draft", IDEA, ScriptType::Youtube, Arc::new(model));
    let err = agent.process_idea().await.unwrap_err();
    assert_eq!(err.kind, AgentErrorKind::Generation);
    assert!(err.message.starts_with("Falha ao analisar ideia: "));
}

#[tokio::test]
async fn fenced_json_and_explicit_format_are_honoured() {
    let provider = ScriptedProvider::with(vec![Ok(
        "```json\n{\"sections\":[],\"totalDuration\":\"90\",\"format\":\"vertical\"}\n```".into(),
    )]);
    let mut agent = agent(provider);
    let s = agent.process_answers(answers()).await.unwrap();
    let structure = s.structure.unwrap();
    assert_eq!(structure.total_duration, 90);
    assert_eq!(structure.format, "vertical");
}

#[tokio::test]
async fn blank_final_script_is_a_generation_failure() {
    let provider = ScriptedProvider::with(vec![
        analysis_json(),
        questions_json(),
        structure_json(5),
        Ok("  \n ".into()),
        Ok("FADE IN:".into()),
    ]);
    let mut agent = agent(provider);
    agent.process_idea().await.unwrap();
    agent.process_answers(answers()).await.unwrap();

    let err = agent.generate_final_script().await.unwrap_err();
    assert_eq!(err.kind, AgentErrorKind::Generation);
    assert_eq!(err.message, "Falha ao gerar roteiro final: o modelo não retornou conteúdo");
    assert_eq!(err.state.current_step, Step::Generation);
    assert!(err.state.final_script.is_none());

    // Structure and answers are intact, so a retry can still finish.
    let s = agent.generate_final_script().await.unwrap();
    assert_eq!(s.current_step, Step::Completed);
    assert_eq!(s.final_script.as_deref(), Some("FADE IN:"));
}
