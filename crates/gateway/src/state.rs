use std::sync::Arc;

use sw_domain::config::Config;
use sw_scripting::{ScriptModel, ScriptingAgent};
use sw_sessions::AgentRegistry;
use sw_store::ScriptRepository;

/// Shared application state passed to all API handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn ScriptRepository>,
    /// In-flight wizard sessions, one agent per script.
    pub sessions: Arc<AgentRegistry<ScriptingAgent>>,
    pub model: Arc<ScriptModel>,
    /// Every route acts as the seeded demo user.
    pub demo_user_id: i64,
}
