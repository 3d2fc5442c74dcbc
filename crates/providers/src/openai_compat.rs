//! OpenAI-compatible adapter.
//!
//! Works with OpenAI, Azure OpenAI, Ollama, vLLM, LM Studio, Together,
//! and any other endpoint that follows the OpenAI chat completions contract.

use std::time::{Duration, Instant};

use serde_json::Value;
use sw_domain::config::{ProviderConfig, ProviderKind};
use sw_domain::error::{Error, Result};
use sw_domain::trace::TraceEvent;

use crate::traits::{ChatRequest, ChatResponse, LlmProvider, Usage};
use crate::util::{from_reqwest, resolve_api_key};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Adapter struct
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// An LLM provider adapter for any OpenAI-compatible API endpoint.
///
/// Also handles Azure OpenAI, which uses the same wire format but with a
/// different URL pattern (`/openai/deployments/{model}/chat/completions`)
/// and auth header (`api-key` instead of `Authorization: Bearer`).
pub struct OpenAiCompatProvider {
    id: String,
    base_url: String,
    api_key: String,
    auth_header: String,
    auth_prefix: String,
    default_model: String,
    client: reqwest::Client,
    /// When true, uses Azure OpenAI URL pattern and omits `model` from body.
    is_azure: bool,
}

impl OpenAiCompatProvider {
    /// Create a new provider from the deserialized provider config.
    ///
    /// The API key is resolved eagerly, so a missing env var fails here
    /// rather than on the first request.
    pub fn from_config(cfg: &ProviderConfig, timeout: Duration) -> Result<Self> {
        let is_azure = cfg.kind == ProviderKind::AzureOpenai;
        let api_key = resolve_api_key(&cfg.auth)?;

        let auth_header = cfg.auth.header.clone().unwrap_or_else(|| {
            if is_azure {
                "api-key".into()
            } else {
                "Authorization".into()
            }
        });
        let auth_prefix = cfg.auth.prefix.clone().unwrap_or_else(|| {
            if is_azure {
                String::new()
            } else {
                "Bearer ".into()
            }
        });

        let default_model = cfg
            .default_model
            .clone()
            .unwrap_or_else(|| "gpt-4o".into());

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(from_reqwest)?;

        Ok(Self {
            id: cfg.id.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key,
            auth_header,
            auth_prefix,
            default_model,
            client,
            is_azure,
        })
    }

    // ── Internal: build authenticated request builder ──────────────

    fn authed_post(&self, url: &str) -> reqwest::RequestBuilder {
        let header_value = format!("{}{}", self.auth_prefix, self.api_key);
        self.client
            .post(url)
            .header(&self.auth_header, &header_value)
            .header("Content-Type", "application/json")
    }

    fn effective_model(&self, req: &ChatRequest) -> String {
        req.model
            .clone()
            .unwrap_or_else(|| self.default_model.clone())
    }

    fn chat_url(&self, model: &str) -> String {
        if self.is_azure {
            format!(
                "{}/openai/deployments/{}/chat/completions?api-version=2024-10-21",
                self.base_url, model
            )
        } else {
            format!("{}/chat/completions", self.base_url)
        }
    }

    fn build_chat_body(&self, req: &ChatRequest, model: &str) -> Value {
        let messages: Vec<Value> = req
            .messages
            .iter()
            .map(|m| serde_json::json!({"role": m.role.as_str(), "content": m.content}))
            .collect();

        let mut body = serde_json::json!({ "messages": messages });

        // Azure embeds the deployment name in the URL.
        if !self.is_azure {
            body["model"] = Value::String(model.to_string());
        }
        if let Some(temp) = req.temperature {
            body["temperature"] = serde_json::json!(temp);
        }
        if let Some(max) = req.max_tokens {
            body["max_tokens"] = serde_json::json!(max);
        }
        if req.json_mode {
            body["response_format"] = serde_json::json!({"type": "json_object"});
        }
        body
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Response deserialization helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn parse_chat_response(provider: &str, body: &Value) -> Result<ChatResponse> {
    let choice = body
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|a| a.first())
        .ok_or_else(|| Error::Provider {
            provider: provider.into(),
            message: "no choices in response".into(),
        })?;

    let message = choice.get("message").ok_or_else(|| Error::Provider {
        provider: provider.into(),
        message: "no message in choice".into(),
    })?;

    let content = message
        .get("content")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    let finish_reason = choice
        .get("finish_reason")
        .and_then(|v| v.as_str())
        .map(String::from);

    let model = body
        .get("model")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string();

    let usage = body.get("usage").and_then(parse_openai_usage);

    Ok(ChatResponse {
        content,
        usage,
        model,
        finish_reason,
    })
}

fn parse_openai_usage(v: &Value) -> Option<Usage> {
    let prompt_tokens = v.get("prompt_tokens")?.as_u64()? as u32;
    let completion_tokens = v.get("completion_tokens")?.as_u64()? as u32;
    let total_tokens = v
        .get("total_tokens")
        .and_then(|t| t.as_u64())
        .map(|t| t as u32)
        .unwrap_or(prompt_tokens.saturating_add(completion_tokens));
    Some(Usage {
        prompt_tokens,
        completion_tokens,
        total_tokens,
    })
}

/// Pull a readable message out of an OpenAI-style error body, falling back
/// to the raw text.
fn error_message(resp_text: &str) -> String {
    serde_json::from_str::<Value>(resp_text)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| resp_text.to_string())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait::async_trait]
impl LlmProvider for OpenAiCompatProvider {
    async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse> {
        let model = self.effective_model(req);
        let url = self.chat_url(&model);
        let body = self.build_chat_body(req, &model);

        tracing::debug!(provider = %self.id, url = %url, "openai_compat chat request");
        let started = Instant::now();

        let resp = self
            .authed_post(&url)
            .json(&body)
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = resp.status();
        let resp_text = resp.text().await.map_err(from_reqwest)?;

        if !status.is_success() {
            return Err(Error::Provider {
                provider: self.id.clone(),
                message: format!("HTTP {} - {}", status.as_u16(), error_message(&resp_text)),
            });
        }

        let resp_json: Value = serde_json::from_str(&resp_text)?;
        let parsed = parse_chat_response(&self.id, &resp_json)?;

        TraceEvent::LlmRequest {
            provider: self.id.clone(),
            model: model.clone(),
            json_mode: req.json_mode,
            duration_ms: started.elapsed().as_millis() as u64,
            prompt_tokens: parsed.usage.map(|u| u.prompt_tokens),
            completion_tokens: parsed.usage.map(|u| u.completion_tokens),
        }
        .emit();

        Ok(parsed)
    }

    fn provider_id(&self) -> &str {
        &self.id
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Message;
    use sw_domain::config::AuthConfig;

    fn provider(kind: ProviderKind) -> OpenAiCompatProvider {
        let cfg = ProviderConfig {
            id: "test".into(),
            kind,
            base_url: "https://example.test/v1/".into(),
            auth: AuthConfig {
                key: Some("k".into()),
                ..Default::default()
            },
            default_model: None,
        };
        OpenAiCompatProvider::from_config(&cfg, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn body_carries_json_mode_and_sampling() {
        let p = provider(ProviderKind::OpenaiCompat);
        let req = ChatRequest {
            messages: vec![Message::user("oi")],
            temperature: Some(0.5),
            max_tokens: Some(2000),
            json_mode: true,
            model: None,
        };
        let body = p.build_chat_body(&req, "gpt-4o");
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["max_tokens"], 2000);
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["role"], "user");
    }

    #[test]
    fn azure_omits_model_and_uses_deployment_url() {
        let p = provider(ProviderKind::AzureOpenai);
        let req = ChatRequest::default();
        assert!(p.build_chat_body(&req, "gpt4o").get("model").is_none());
        assert_eq!(
            p.chat_url("gpt4o"),
            "https://example.test/v1/openai/deployments/gpt4o/chat/completions?api-version=2024-10-21"
        );
        assert_eq!(p.auth_header, "api-key");
        assert_eq!(p.auth_prefix, "");
    }

    #[test]
    fn null_content_becomes_empty_string() {
        let body = serde_json::json!({
            "model": "gpt-4o",
            "choices": [{"message": {"content": null}, "finish_reason": "stop"}]
        });
        let resp = parse_chat_response("test", &body).unwrap();
        assert_eq!(resp.content, "");
        assert!(resp.usage.is_none());
    }

    #[test]
    fn missing_choices_is_provider_error() {
        let err = parse_chat_response("test", &serde_json::json!({})).unwrap_err();
        assert!(matches!(err, Error::Provider { .. }));
    }

    #[test]
    fn error_message_prefers_structured_body() {
        assert_eq!(
            error_message(r#"{"error": {"message": "Rate limit reached"}}"#),
            "Rate limit reached"
        );
        assert_eq!(error_message("bad gateway"), "bad gateway");
    }
}
