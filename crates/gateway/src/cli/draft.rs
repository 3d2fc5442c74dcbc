//! `scriptwright draft`: the wizard pipeline as a one-shot command.

use std::sync::Arc;

use anyhow::Context;

use sw_domain::config::Config;
use sw_domain::{AgentState, Answers, NewScript};
use sw_scripting::ScriptingAgent;

use crate::bootstrap;

/// Analyse, answer, structure and write in one go. Questions the caller did
/// not answer are sent as empty strings.
pub async fn run(
    config: Arc<Config>,
    script_type: &str,
    idea: &str,
    answers: Vec<(String, String)>,
) -> anyhow::Result<AgentState> {
    bootstrap::check_config(&config)?;
    let input = NewScript::parse(Some("draft"), Some(script_type), Some(idea))
        .map_err(|e| anyhow::anyhow!("{}", describe_validation(&e)))?;

    let model = bootstrap::build_model(&config)?;
    let mut agent = ScriptingAgent::new("draft", input.idea, input.script_type, model);

    let analysed = agent.process_idea().await.context("analysing the idea")?;
    let answers = fill_answers(&analysed, answers);
    for (id, answer) in &answers {
        tracing::debug!(question = %id, answer = %answer, "answer");
    }

    agent.process_answers(answers).await.context("building the structure")?;
    let done = agent
        .generate_final_script()
        .await
        .context("writing the final script")?;
    Ok(done)
}

/// Print the result: the script text, or the whole state as JSON.
pub fn print(state: &AgentState, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(state)?);
    } else {
        println!("{}", state.final_script.as_deref().unwrap_or_default());
    }
    Ok(())
}

fn fill_answers(state: &AgentState, given: Vec<(String, String)>) -> Answers {
    let mut answers: Answers = state
        .questions
        .iter()
        .flatten()
        .map(|q| (q.id.clone(), String::new()))
        .collect();
    answers.extend(given);
    answers
}

fn describe_validation(e: &sw_domain::Error) -> String {
    match e {
        sw_domain::Error::Validation { details, .. } => details
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}
