use serde::{Deserialize, Serialize};

/// What kind of customer question a probe simulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryIntent {
    /// Category discovery: the asker doesn't know the brand yet.
    Discovery,
    /// Asking about the brand by name.
    Brand,
    /// Comparing or deciding (reviews, alternatives).
    Decision,
}

impl QueryIntent {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QueryIntent::Discovery => "discovery",
            QueryIntent::Brand => "brand",
            QueryIntent::Decision => "decision",
        }
    }
}

/// One AI-directed probe question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeQuery {
    pub text: String,
    pub intent: QueryIntent,
}

/// The generator's output: 2–3 probes plus a one-sentence business summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSet {
    pub summary: String,
    pub queries: Vec<ProbeQuery>,
}
