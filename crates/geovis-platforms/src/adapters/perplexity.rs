//! Perplexity adapter.
//!
//! Perplexity's chat endpoint returns a structured top-level `citations`
//! array alongside the answer — the one provider here whose citations pass
//! through directly instead of being derived from prose.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::adapters::PlatformAdapter;
use crate::error::PlatformError;
use crate::types::{PlatformAnswer, PlatformId};

#[derive(Debug, Deserialize)]
struct PerplexityResponse {
    #[serde(default)]
    citations: Vec<String>,
    choices: Vec<PerplexityChoice>,
}

#[derive(Debug, Deserialize)]
struct PerplexityChoice {
    message: PerplexityMessage,
}

#[derive(Debug, Deserialize)]
struct PerplexityMessage {
    content: String,
}

pub struct PerplexityAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl PerplexityAdapter {
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        api_key: Option<String>,
        model: &str,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl PlatformAdapter for PerplexityAdapter {
    fn id(&self) -> PlatformId {
        PlatformId::Perplexity
    }

    async fn query(&self, text: &str) -> Result<PlatformAnswer, PlatformError> {
        let platform = self.id();
        let Some(api_key) = &self.api_key else {
            return Err(PlatformError::MissingCredential { platform });
        };

        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": text }],
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|source| PlatformError::Http { platform, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlatformError::Api {
                platform,
                status: status.as_u16(),
            });
        }

        let parsed: PerplexityResponse = response
            .json()
            .await
            .map_err(|source| PlatformError::Http { platform, source })?;

        let answer_text = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| PlatformError::Malformed {
                platform,
                reason: "empty choices array".to_string(),
            })?;

        Ok(PlatformAnswer {
            platform,
            answer_text,
            citation_urls: parsed.citations,
        })
    }
}
