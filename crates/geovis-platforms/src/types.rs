use serde::{Deserialize, Serialize};

/// Stable identifier for an AI answer provider.
///
/// Aggregation keys on this, never on arrival order, so scan results are
/// deterministic regardless of which provider responds first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformId {
    Openai,
    Perplexity,
    Gemini,
}

impl PlatformId {
    pub const ALL: [PlatformId; 3] = [PlatformId::Openai, PlatformId::Perplexity, PlatformId::Gemini];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PlatformId::Openai => "openai",
            PlatformId::Perplexity => "perplexity",
            PlatformId::Gemini => "gemini",
        }
    }
}

impl std::fmt::Display for PlatformId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One provider's raw answer, normalized to the shared adapter contract.
#[derive(Debug, Clone)]
pub struct PlatformAnswer {
    pub platform: PlatformId,
    pub answer_text: String,
    pub citation_urls: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_id_orders_stably() {
        let mut ids = vec![PlatformId::Gemini, PlatformId::Openai, PlatformId::Perplexity];
        ids.sort();
        assert_eq!(
            ids,
            vec![PlatformId::Openai, PlatformId::Perplexity, PlatformId::Gemini]
        );
    }

    #[test]
    fn platform_id_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PlatformId::Openai).expect("serialize"),
            "\"openai\""
        );
    }
}
