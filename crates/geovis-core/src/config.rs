use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse. No variables are strictly
/// required: all provider keys are optional (a missing key degrades that
/// adapter to a named platform error at scan time).
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup — no
/// `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("GEOVIS_ENV", "development"));
    let bind_addr = parse_addr("GEOVIS_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("GEOVIS_LOG_LEVEL", "info");
    let user_agent = or_default("GEOVIS_USER_AGENT", "geovis/0.1 (visibility-scan)");

    let sitefetch_timeout_secs = parse_u64("GEOVIS_SITEFETCH_TIMEOUT_SECS", "8")?;
    let textgen_timeout_secs = parse_u64("GEOVIS_TEXTGEN_TIMEOUT_SECS", "8")?;
    let platform_timeout_secs = parse_u64("GEOVIS_PLATFORM_TIMEOUT_SECS", "30")?;

    let openai_api_key = lookup("OPENAI_API_KEY").ok();
    let perplexity_api_key = lookup("PERPLEXITY_API_KEY").ok();
    let gemini_api_key = lookup("GEMINI_API_KEY").ok();

    let openai_base_url = or_default("GEOVIS_OPENAI_BASE_URL", "https://api.openai.com");
    let perplexity_base_url = or_default("GEOVIS_PERPLEXITY_BASE_URL", "https://api.perplexity.ai");
    let gemini_base_url = or_default(
        "GEOVIS_GEMINI_BASE_URL",
        "https://generativelanguage.googleapis.com",
    );

    let openai_model = or_default("GEOVIS_OPENAI_MODEL", "gpt-4o-mini");
    let perplexity_model = or_default("GEOVIS_PERPLEXITY_MODEL", "sonar");
    let gemini_model = or_default("GEOVIS_GEMINI_MODEL", "gemini-1.5-flash");
    let textgen_model = or_default("GEOVIS_TEXTGEN_MODEL", "gpt-4o-mini");

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        user_agent,
        sitefetch_timeout_secs,
        textgen_timeout_secs,
        platform_timeout_secs,
        openai_api_key,
        perplexity_api_key,
        gemini_api_key,
        openai_base_url,
        perplexity_base_url,
        gemini_base_url,
        openai_model,
        perplexity_model,
        gemini_model,
        textgen_model,
    })
}

fn parse_environment(raw: &str) -> Environment {
    match raw.to_lowercase().as_str() {
        "production" | "prod" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, std::env::VarError> + 'a {
        move |key: &str| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(std::env::VarError::NotPresent)
        }
    }

    #[test]
    fn defaults_apply_with_empty_env() {
        let map = HashMap::new();
        let config = build_app_config(lookup_from(&map)).expect("config should build");
        assert_eq!(config.env, Environment::Development);
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.sitefetch_timeout_secs, 8);
        assert_eq!(config.platform_timeout_secs, 30);
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.perplexity_base_url, "https://api.perplexity.ai");
    }

    #[test]
    fn provider_keys_are_picked_up() {
        let mut map = HashMap::new();
        map.insert("OPENAI_API_KEY", "sk-test");
        map.insert("GEMINI_API_KEY", "g-test");
        let config = build_app_config(lookup_from(&map)).expect("config should build");
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.gemini_api_key.as_deref(), Some("g-test"));
        assert!(config.perplexity_api_key.is_none());
    }

    #[test]
    fn invalid_bind_addr_is_rejected() {
        let mut map = HashMap::new();
        map.insert("GEOVIS_BIND_ADDR", "not-an-addr");
        let err = build_app_config(lookup_from(&map)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "GEOVIS_BIND_ADDR"));
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        let mut map = HashMap::new();
        map.insert("GEOVIS_PLATFORM_TIMEOUT_SECS", "soon");
        let err = build_app_config(lookup_from(&map)).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "GEOVIS_PLATFORM_TIMEOUT_SECS")
        );
    }

    #[test]
    fn environment_parses_aliases() {
        assert_eq!(parse_environment("prod"), Environment::Production);
        assert_eq!(parse_environment("PRODUCTION"), Environment::Production);
        assert_eq!(parse_environment("test"), Environment::Test);
        assert_eq!(parse_environment("anything-else"), Environment::Development);
    }

    #[test]
    fn debug_redacts_secrets() {
        let mut map = HashMap::new();
        map.insert("OPENAI_API_KEY", "sk-very-secret");
        let config = build_app_config(lookup_from(&map)).expect("config should build");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("[redacted]"));
    }
}
