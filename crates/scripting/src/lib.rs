//! Script generation: pt-BR prompts, the model gateway that runs them, and
//! the agent that sequences the wizard stages.

pub mod agent;
pub mod model;
pub mod prompts;

pub use agent::{AgentError, AgentErrorKind, AgentResult, ScriptingAgent};
pub use model::ScriptModel;
