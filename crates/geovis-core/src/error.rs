use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Request-level validation failure for a scan target.
///
/// This is one of only two error classes that reach the caller of a scan
/// (the other being a rate-limit rejection); everything downstream is
/// absorbed into per-platform error strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("domain is empty after normalization")]
    Empty,

    #[error("invalid domain '{0}': expected a hostname like example.com")]
    Malformed(String),
}
