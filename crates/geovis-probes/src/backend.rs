//! Pluggable text-generation backend.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::error::ProbeError;

/// A text-completion backend the generator can call.
///
/// Object-safe so tests can inject canned, deterministic responses and the
/// pipeline can hold `Option<Box<dyn QueryBackend>>`.
#[async_trait]
pub trait QueryBackend: Send + Sync {
    /// Complete `prompt` into free text.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] on any transport or API failure; the caller
    /// falls back to templates.
    async fn complete(&self, prompt: &str) -> Result<String, ProbeError>;
}

/// OpenAI-compatible chat-completions backend.
///
/// Base URL is injectable so tests can point it at a mock server.
pub struct OpenAiBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiBackend {
    /// Creates a backend with its own short-timeout client.
    ///
    /// Probe generation sits on the scan's latency-critical front end;
    /// `timeout_secs` should be single digits so a slow provider degrades
    /// to templates instead of stalling the whole scan.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl QueryBackend for OpenAiBackend {
    async fn complete(&self, prompt: &str) -> Result<String, ProbeError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": 0.4,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Api(format!(
                "chat completions returned {status}"
            )));
        }

        let value: serde_json::Value = response.json().await?;
        value["choices"][0]["message"]["content"]
            .as_str()
            .map(ToOwned::to_owned)
            .ok_or_else(|| {
                ProbeError::Malformed("response missing choices[0].message.content".to_string())
            })
    }
}
