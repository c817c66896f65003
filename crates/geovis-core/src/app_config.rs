use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub user_agent: String,

    /// Budget for the homepage context fetch. Front-of-pipeline: fails fast
    /// to an empty context rather than stalling the scan.
    pub sitefetch_timeout_secs: u64,
    /// Budget for the probe-generation backend call. Same fail-fast rule.
    pub textgen_timeout_secs: u64,
    /// Per-call budget for each platform adapter query.
    pub platform_timeout_secs: u64,

    pub openai_api_key: Option<String>,
    pub perplexity_api_key: Option<String>,
    pub gemini_api_key: Option<String>,

    pub openai_base_url: String,
    pub perplexity_base_url: String,
    pub gemini_base_url: String,

    pub openai_model: String,
    pub perplexity_model: String,
    pub gemini_model: String,
    /// Model used by the probe-query generator (chat-completions shape).
    pub textgen_model: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("user_agent", &self.user_agent)
            .field("sitefetch_timeout_secs", &self.sitefetch_timeout_secs)
            .field("textgen_timeout_secs", &self.textgen_timeout_secs)
            .field("platform_timeout_secs", &self.platform_timeout_secs)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "perplexity_api_key",
                &self.perplexity_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("openai_base_url", &self.openai_base_url)
            .field("perplexity_base_url", &self.perplexity_base_url)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("openai_model", &self.openai_model)
            .field("perplexity_model", &self.perplexity_model)
            .field("gemini_model", &self.gemini_model)
            .field("textgen_model", &self.textgen_model)
            .finish()
    }
}
