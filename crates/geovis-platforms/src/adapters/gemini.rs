//! Google Gemini adapter.
//!
//! Uses the `generateContent` shape (`contents[].parts[].text`); the API key
//! travels as a query parameter rather than a bearer header. Citations are
//! derived from URLs in the generated text.

use async_trait::async_trait;
use serde_json::json;

use crate::adapters::PlatformAdapter;
use crate::citations::derive_citation_urls;
use crate::error::PlatformError;
use crate::types::{PlatformAnswer, PlatformId};

pub struct GeminiAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl GeminiAdapter {
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
impl PlatformAdapter for GeminiAdapter {
    fn id(&self) -> PlatformId {
        PlatformId::Gemini
    }

    async fn query(&self, text: &str) -> Result<PlatformAnswer, PlatformError> {
        let platform = self.id();
        let Some(api_key) = &self.api_key else {
            return Err(PlatformError::MissingCredential { platform });
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": text }] }],
        });

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key.as_str())])
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

        let parts = value["candidates"][0]["content"]["parts"]
            .as_array()
            .ok_or_else(|| PlatformError::Malformed {
                platform,
                reason: "missing candidates[0].content.parts".to_string(),
            })?;

        let answer_text = parts
            .iter()
            .filter_map(|p| p["text"].as_str())
            .collect::<Vec<_>>()
            .join("\n");
        if answer_text.is_empty() {
            return Err(PlatformError::Malformed {
                platform,
                reason: "no text parts in candidate".to_string(),
            });
        }

        let citation_urls = derive_citation_urls(&answer_text);
        Ok(PlatformAnswer {
            platform,
            answer_text,
            citation_urls,
        })
    }
}
