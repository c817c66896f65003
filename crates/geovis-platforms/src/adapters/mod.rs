//! Provider adapters.

mod gemini;
mod openai;
mod perplexity;

pub use gemini::GeminiAdapter;
pub use openai::OpenAiAdapter;
pub use perplexity::PerplexityAdapter;

use async_trait::async_trait;
use geovis_core::AppConfig;

use crate::error::PlatformError;
use crate::types::{PlatformAnswer, PlatformId};

/// The shared adapter contract: one provider call normalized to
/// `{ answer_text, citation_urls }`.
#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    fn id(&self) -> PlatformId;

    /// Ask the provider `text` and normalize the reply.
    ///
    /// # Errors
    ///
    /// Returns a [`PlatformError`] naming this platform. Callers treat every
    /// variant as a per-platform outcome, not a scan failure.
    async fn query(&self, text: &str) -> Result<PlatformAnswer, PlatformError>;
}

/// Build the full configured adapter set.
///
/// All three adapters are always constructed; one with a missing credential
/// reports `MissingCredential` at query time so the scan summary can name
/// it. The shared client carries the per-call network timeout.
#[must_use]
pub fn build_adapters(
    config: &AppConfig,
    client: &reqwest::Client,
) -> Vec<Box<dyn PlatformAdapter>> {
    vec![
        Box::new(OpenAiAdapter::new(
            client.clone(),
            &config.openai_base_url,
            config.openai_api_key.clone(),
            &config.openai_model,
        )),
        Box::new(PerplexityAdapter::new(
            client.clone(),
            &config.perplexity_base_url,
            config.perplexity_api_key.clone(),
            &config.perplexity_model,
        )),
        Box::new(GeminiAdapter::new(
            client.clone(),
            &config.gemini_base_url,
            config.gemini_api_key.clone(),
            &config.gemini_model,
        )),
    ]
}
