use thiserror::Error;

use crate::types::PlatformId;

/// Per-adapter failure, always scoped to one platform.
///
/// Every variant is an expected partial-failure mode: the fan-out isolates
/// it and the scan summary reports it as a `platform_errors` entry.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("{platform}: missing credential")]
    MissingCredential { platform: PlatformId },

    #[error("{platform}: HTTP error: {source}")]
    Http {
        platform: PlatformId,
        #[source]
        source: reqwest::Error,
    },

    #[error("{platform}: API returned status {status}")]
    Api { platform: PlatformId, status: u16 },

    #[error("{platform}: malformed response: {reason}")]
    Malformed { platform: PlatformId, reason: String },

    #[error("{platform}: timed out after {secs}s")]
    Timeout { platform: PlatformId, secs: u64 },
}

impl PlatformError {
    #[must_use]
    pub fn platform(&self) -> PlatformId {
        match self {
            PlatformError::MissingCredential { platform }
            | PlatformError::Http { platform, .. }
            | PlatformError::Api { platform, .. }
            | PlatformError::Malformed { platform, .. }
            | PlatformError::Timeout { platform, .. } => *platform,
        }
    }
}
