//! AppState construction and background-task spawning extracted from `main.rs`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use sw_domain::config::{Config, ConfigSeverity};
use sw_domain::NewUser;
use sw_providers::ProviderRegistry;
use sw_scripting::ScriptModel;
use sw_sessions::AgentRegistry;
use sw_store::ScriptRepository;

use crate::state::AppState;

pub const DEMO_USERNAME: &str = "usuario_demo";
pub const DEMO_EMAIL: &str = "demo@roteiria.com";
const DEMO_PASSWORD: &str = "demo123";

/// Abort on config errors; log warnings.
pub fn check_config(config: &Config) -> anyhow::Result<()> {
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    let errors = issues
        .iter()
        .filter(|i| i.severity == ConfigSeverity::Error)
        .count();
    if errors > 0 {
        anyhow::bail!("config validation failed with {errors} error(s)");
    }
    Ok(())
}

/// The model gateway over whichever provider `[generation]` selects.
pub fn build_model(config: &Config) -> anyhow::Result<Arc<ScriptModel>> {
    let llm = ProviderRegistry::from_config(&config.llm).context("initializing LLM providers")?;
    tracing::info!(
        providers = ?llm.list_providers(),
        failed = llm.init_errors().len(),
        "LLM provider registry ready"
    );
    Ok(Arc::new(ScriptModel::from_registry(&llm, config.generation.clone())))
}

/// Validate config, open the store, seed the demo user and return a
/// fully-wired [`AppState`].
pub async fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    check_config(&config)?;

    let model = build_model(&config)?;

    let store = sw_store::open(&config.store).context("opening script store")?;
    tracing::info!(backend = ?config.store.backend, "script store ready");

    let demo_user_id = seed_demo_user(store.as_ref()).await?;

    let sessions = Arc::new(AgentRegistry::from_config(&config.sessions));

    Ok(AppState {
        config,
        store,
        sessions,
        model,
        demo_user_id,
    })
}

/// Create the demo user unless one with the same email already exists.
/// Returns its id.
pub async fn seed_demo_user(store: &dyn ScriptRepository) -> anyhow::Result<i64> {
    if let Some(user) = store
        .get_user_by_email(DEMO_EMAIL)
        .await
        .context("looking up demo user")?
    {
        return Ok(user.id);
    }
    let user = store
        .create_user(NewUser {
            username: DEMO_USERNAME.into(),
            email: DEMO_EMAIL.into(),
            password: DEMO_PASSWORD.into(),
        })
        .await
        .context("seeding demo user")?;
    tracing::info!(user_id = user.id, username = %user.username, "demo user seeded");
    Ok(user.id)
}

/// Start the idle-session sweeper.
pub fn spawn_background_tasks(state: &AppState) -> tokio::task::JoinHandle<()> {
    let interval = Duration::from_secs(state.config.sessions.sweep_interval_secs.max(1));
    state.sessions.clone().spawn_sweeper(interval)
}
