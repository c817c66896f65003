use thiserror::Error;

/// Failures inside the generation backend.
///
/// None of these escape [`crate::generate_probes`] — they trigger the
/// template fallback instead.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend API error: {0}")]
    Api(String),

    #[error("malformed backend response: {0}")]
    Malformed(String),
}
