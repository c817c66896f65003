//! OpenAI chat-completions adapter.
//!
//! OpenAI has no structured citation field for plain chat completions, so
//! citations are derived from URLs embedded in the answer text.

use async_trait::async_trait;
use serde_json::json;

use crate::adapters::PlatformAdapter;
use crate::citations::derive_citation_urls;
use crate::error::PlatformError;
use crate::types::{PlatformAnswer, PlatformId};

pub struct OpenAiAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiAdapter {
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
impl PlatformAdapter for OpenAiAdapter {
    fn id(&self) -> PlatformId {
        PlatformId::Openai
    }

    async fn query(&self, text: &str) -> Result<PlatformAnswer, PlatformError> {
        let platform = self.id();
        let Some(api_key) = &self.api_key else {
            return Err(PlatformError::MissingCredential { platform });
        };

        let url = format!("{}/v1/chat/completions", self.base_url);
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

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|source| PlatformError::Http { platform, source })?;

        let answer_text = value["choices"][0]["message"]["content"]
            .as_str()
            .map(ToOwned::to_owned)
            .ok_or_else(|| PlatformError::Malformed {
                platform,
                reason: "missing choices[0].message.content".to_string(),
            })?;

        let citation_urls = derive_citation_urls(&answer_text);
        Ok(PlatformAnswer {
            platform,
            answer_text,
            citation_urls,
        })
    }
}
