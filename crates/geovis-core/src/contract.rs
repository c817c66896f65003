//! Serde types for the scan-result contract.
//!
//! This is the single synchronous payload the engine exposes to every
//! consumer (HTTP handler, CLI, report sink). Field names follow the
//! product's established camelCase wire shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One platform × probe-query outcome, as displayed to the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    /// The probe question that was asked.
    pub query: String,
    /// Stable platform identifier (`openai`, `perplexity`, `gemini`).
    pub platform: String,
    /// Other domains the answer recommended (target excluded).
    pub ai_recommends: Vec<String>,
    pub mentioned_you: bool,
    /// Display snippet from the answer, preferring the sub-query where a
    /// genuine (non-echo) mention was found.
    pub snippet: String,
    pub in_citations: bool,
    pub domain_found: bool,
    /// `-1.0` when no genuine mention exists, otherwise in `[0, 1)`.
    pub mention_position: f64,
    /// Brand/domain pattern hits in the answer body; `0` for disclaimed
    /// answers even when the disclaimer itself names the brand.
    pub mention_count: u32,
}

/// Named tier values making the score reproducible and explainable.
///
/// Each value is the computed (already weighted) contribution; the total is
/// the clipped sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub citation: f64,
    pub domain_visibility: f64,
    pub brand_recognition: f64,
    pub position_bonus: f64,
    pub mention_depth: f64,
    pub market_density: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    pub total_queries: u32,
    /// Platforms whose answers mentioned the brand at all.
    pub mentioned_count: u32,
    pub is_invisible: bool,
    pub visibility_score: f64,
    /// Display-only per-platform sub-scores; not required to sum
    /// consistently with the aggregate.
    pub platform_scores: BTreeMap<String, f64>,
    pub score_breakdown: ScoreBreakdown,
    pub score_explanation: String,
    pub business_summary: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_errors: Option<Vec<String>>,
}

/// The full scan result returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub domain: String,
    pub results: Vec<QueryResult>,
    pub summary: ScanSummary,
    /// Set by the persistence collaborator when the report is stored;
    /// `null` for unstored scans.
    pub report_id: Option<String>,
}
