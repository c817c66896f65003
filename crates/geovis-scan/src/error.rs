use thiserror::Error;

/// Scan failures that reach a caller.
///
/// Only input validation and dependency construction can fail. Everything
/// downstream — dead providers, timeouts, missing credentials, even all
/// three platforms failing — is absorbed into the scan result itself ("no
/// visibility" is a valid answer, not a fault).
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    InvalidDomain(#[from] geovis_core::DomainError),

    #[error("failed to build scan HTTP client: {0}")]
    Setup(#[from] reqwest::Error),

    #[error("failed to build probe-generation backend: {0}")]
    ProbeBackend(#[from] geovis_probes::ProbeError),
}
