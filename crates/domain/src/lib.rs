//! Shared types for Scriptwright: the script/agent data model, the common
//! error type, configuration, and structured trace events.

pub mod agent;
pub mod config;
pub mod content;
pub mod error;
pub mod script;
pub mod trace;
pub mod validation;

pub use agent::{AgentState, Answers, Step};
pub use content::{Analysis, Question, Section, Structure};
pub use error::{Error, Result};
pub use script::{
    AiSession, AiStep, NewAiSession, NewScript, NewUser, Script, ScriptPatch, ScriptStatus,
    ScriptType, User,
};
pub use validation::FieldError;
