mod generation;
mod llm;
mod observability;
mod server;
mod sessions;
mod store;

pub use generation::*;
pub use llm::*;
pub use observability::*;
pub use server::*;
pub use sessions::*;
pub use store::*;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub sessions: SessionsConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl ConfigError {
    fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: ConfigSeverity::Error,
            field: field.into(),
            message: message.into(),
        }
    }

    fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: ConfigSeverity::Warning,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push(ConfigError::error("server.port", "port must be greater than 0"));
        }
        if self.server.host.is_empty() {
            errors.push(ConfigError::error("server.host", "host must not be empty"));
        }
        if self.server.cors.allowed_origins.len() == 1
            && self.server.cors.allowed_origins[0] == "*"
        {
            errors.push(ConfigError::warning(
                "server.cors.allowed_origins",
                "wildcard \"*\" allows all origins (not recommended for production)",
            ));
        }

        // ── llm ──
        if self.llm.providers.is_empty() {
            errors.push(ConfigError::warning(
                "llm.providers",
                "no LLM providers configured; generation endpoints will fail",
            ));
        }
        if self.llm.request_timeout_ms == 0 {
            errors.push(ConfigError::error(
                "llm.request_timeout_ms",
                "timeout must be greater than 0",
            ));
        }
        let mut seen = HashSet::new();
        for (i, provider) in self.llm.providers.iter().enumerate() {
            if provider.id.is_empty() {
                errors.push(ConfigError::error(
                    format!("llm.providers[{i}].id"),
                    "provider id must not be empty",
                ));
            } else if !seen.insert(provider.id.as_str()) {
                errors.push(ConfigError::error(
                    format!("llm.providers[{i}].id"),
                    format!("duplicate provider id \"{}\"", provider.id),
                ));
            }
            if provider.base_url.is_empty() {
                errors.push(ConfigError::error(
                    format!("llm.providers[{i}].base_url"),
                    "provider base_url must not be empty",
                ));
            }
        }

        // ── generation ──
        if let Some(id) = &self.generation.provider {
            if !self.llm.providers.iter().any(|p| &p.id == id) {
                errors.push(ConfigError::error(
                    "generation.provider",
                    format!("unknown provider \"{id}\""),
                ));
            }
        }
        let temps = [
            ("analysis_temperature", self.generation.analysis_temperature),
            ("questions_temperature", self.generation.questions_temperature),
            ("structure_temperature", self.generation.structure_temperature),
            ("script_temperature", self.generation.script_temperature),
        ];
        for (name, t) in temps {
            if !(0.0..=2.0).contains(&t) {
                errors.push(ConfigError::error(
                    format!("generation.{name}"),
                    "temperature must be within 0.0..=2.0",
                ));
            }
        }
        if self.generation.script_max_tokens == 0 {
            errors.push(ConfigError::error(
                "generation.script_max_tokens",
                "script_max_tokens must be greater than 0",
            ));
        }

        // ── sessions ──
        if self.sessions.idle_ttl_secs == 0 {
            errors.push(ConfigError::error(
                "sessions.idle_ttl_secs",
                "idle_ttl_secs must be greater than 0",
            ));
        }
        if self.sessions.sweep_interval_secs == 0 {
            errors.push(ConfigError::error(
                "sessions.sweep_interval_secs",
                "sweep_interval_secs must be greater than 0",
            ));
        }

        // ── store ──
        if self.store.backend == StoreBackend::File && self.store.path.trim().is_empty() {
            errors.push(ConfigError::error(
                "store.path",
                "path is required for the file backend",
            ));
        }

        // ── observability ──
        if !(0.0..=1.0).contains(&self.observability.sample_rate) {
            errors.push(ConfigError::error(
                "observability.sample_rate",
                "sample_rate must be within 0.0..=1.0",
            ));
        }

        errors
    }
}
