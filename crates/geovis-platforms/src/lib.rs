//! Platform query adapters and the concurrent fan-out scheduler.
//!
//! Each adapter normalizes one AI answer provider into the shared
//! `{ answer_text, citation_urls }` shape. Adapter failures — missing
//! credentials, non-2xx responses, timeouts — are normal per-platform
//! outcomes, isolated by the fan-out and surfaced as named errors; they
//! never fail a scan.

mod adapters;
mod citations;
mod error;
mod fanout;
mod types;

pub use adapters::{build_adapters, GeminiAdapter, OpenAiAdapter, PerplexityAdapter, PlatformAdapter};
pub use citations::derive_citation_urls;
pub use error::PlatformError;
pub use fanout::{fan_out, BranchOutcome};
pub use types::{PlatformAnswer, PlatformId};
