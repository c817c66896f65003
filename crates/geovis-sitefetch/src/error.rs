use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiteFetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} fetching {url}")]
    UnexpectedStatus { url: String, status: u16 },
}
