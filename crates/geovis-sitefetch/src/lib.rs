//! Site context fetcher.
//!
//! Fetches the scan target's homepage and extracts the metadata used to
//! seed probe-query generation: title, meta description, heading text, and
//! social-card fields. Pure I/O plus string extraction — no scoring logic
//! lives here, and every failure is soft (the pipeline proceeds with an
//! empty [`SiteContext`]).

mod error;
mod fetch;
mod html;

pub use error::SiteFetchError;
pub use fetch::{fetch_site_context, SiteContext};
