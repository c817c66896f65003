//! Probe query generation.
//!
//! Turns a domain plus its [`geovis_sitefetch::SiteContext`] into exactly
//! 2–3 differentiated probe questions (discovery / brand / decision) and a
//! one-sentence business summary. Generation goes through a pluggable
//! [`QueryBackend`]; when the backend is missing, errors, or returns a
//! malformed response, the generator degrades to deterministic templates.
//! The total contract is "never fails".

mod backend;
mod error;
mod generator;
mod types;

pub use backend::{OpenAiBackend, QueryBackend};
pub use error::ProbeError;
pub use generator::{fallback_probes, generate_probes};
pub use types::{ProbeQuery, ProbeSet, QueryIntent};
