use geovis_platforms::PlatformId;

/// Recognition facts extracted from one answer (one platform × one probe).
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerExtraction {
    pub mentioned_you: bool,
    pub domain_found: bool,
    pub in_citations: bool,
    /// `-1.0` when no genuine body-text match exists, otherwise the byte
    /// offset of the first match divided by the text length — in `[0, 1)`.
    pub mention_position: f64,
    /// Total brand/domain pattern matches in the text.
    pub mention_count: u32,
    /// The answer explicitly disclaimed knowing the brand.
    pub negative_mention: bool,
    /// Other domains the answer surfaced (target and its subdomains
    /// excluded), in first-appearance order.
    pub ai_recommends: Vec<String>,
    /// Display snippet centered on the first genuine match, or the start of
    /// the answer when there is none.
    pub snippet: String,
}

/// Aggregated recognition facts for one platform across its sub-queries.
///
/// Booleans are any-true, position is the earliest found, count the
/// maximum. Immutable once derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MentionSignal {
    pub platform: PlatformId,
    pub mentioned_you: bool,
    pub domain_found: bool,
    pub in_citations: bool,
    pub mention_position: f64,
    pub mention_count: u32,
}
