//! Provider registry.
//!
//! Constructs and holds all configured LLM provider instances. At startup the
//! registry reads the [`LlmConfig`], resolves authentication, and
//! instantiates the adapter for each configured provider.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use sw_domain::config::{LlmConfig, ProviderKind};
use sw_domain::error::{Error, Result};

use crate::openai_compat::OpenAiCompatProvider;
use crate::traits::LlmProvider;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ProviderRegistry
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Holds all instantiated LLM providers, in config order.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn LlmProvider>>,
    order: Vec<String>,
    /// Init failures, kept for `config validate` and readiness reporting.
    init_errors: Vec<(String, String)>,
}

impl ProviderRegistry {
    /// Build the registry from the application's [`LlmConfig`].
    ///
    /// Providers that fail to initialize are logged and skipped rather than
    /// aborting the entire startup. Set `SW_REQUIRE_LLM=1` to fail instead
    /// when none initialize.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let timeout = Duration::from_millis(config.request_timeout_ms);
        let mut registry = Self::default();

        for pc in &config.providers {
            let result: Result<Arc<dyn LlmProvider>> = match pc.kind {
                ProviderKind::OpenaiCompat | ProviderKind::AzureOpenai => {
                    OpenAiCompatProvider::from_config(pc, timeout)
                        .map(|p| Arc::new(p) as Arc<dyn LlmProvider>)
                }
            };

            match result {
                Ok(provider) => {
                    tracing::info!(
                        provider_id = %pc.id,
                        kind = ?pc.kind,
                        "registered LLM provider"
                    );
                    registry.insert(provider);
                }
                Err(e) => {
                    tracing::warn!(
                        provider_id = %pc.id,
                        kind = ?pc.kind,
                        error = %e,
                        "failed to initialize LLM provider, skipping"
                    );
                    registry.init_errors.push((pc.id.clone(), e.to_string()));
                }
            }
        }

        if registry.is_empty() && !config.providers.is_empty() {
            let require = std::env::var("SW_REQUIRE_LLM")
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(false);
            if require {
                return Err(Error::Config(
                    "all configured LLM providers failed to initialize".into(),
                ));
            }
            tracing::warn!(
                "no LLM providers initialized; generation endpoints will fail \
                 until auth is configured"
            );
        }

        Ok(registry)
    }

    /// Register an already-built provider. A provider with the same id
    /// replaces the previous one but keeps its position.
    pub fn insert(&mut self, provider: Arc<dyn LlmProvider>) {
        let id = provider.provider_id().to_string();
        if self.providers.insert(id.clone(), provider).is_none() {
            self.order.push(id);
        }
    }

    /// Look up a provider by its config id.
    pub fn get(&self, provider_id: &str) -> Option<Arc<dyn LlmProvider>> {
        self.providers.get(provider_id).cloned()
    }

    /// Resolve the provider for generation: the named one, or the first
    /// registered when `provider_id` is `None`.
    pub fn resolve(&self, provider_id: Option<&str>) -> Option<Arc<dyn LlmProvider>> {
        match provider_id {
            Some(id) => self.get(id),
            None => self.order.first().and_then(|id| self.get(id)),
        }
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Registered provider ids, in config order.
    pub fn list_providers(&self) -> Vec<String> {
        self.order.clone()
    }

    /// `(provider_id, error)` for every provider that failed to initialize.
    pub fn init_errors(&self) -> &[(String, String)] {
        &self.init_errors
    }
}
