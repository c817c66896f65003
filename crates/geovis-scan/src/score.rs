//! Visibility scoring.
//!
//! Reduces per-platform mention signals to a 0–100 score built from six
//! named, independently explainable tiers. The function is pure: the same
//! signals always produce the same score.

use std::collections::BTreeMap;

use geovis_core::contract::ScoreBreakdown;

use crate::types::MentionSignal;

const CITATION_WEIGHT: f64 = 40.0;
const DOMAIN_WEIGHT: f64 = 25.0;
const BRAND_WEIGHT: f64 = 10.0;
const POSITION_WEIGHT: f64 = 12.0;
const DEPTH_WEIGHT: f64 = 8.0;
const DENSITY_WEIGHT: f64 = 5.0;

/// Saturation constant for the mention-depth curve: ~63% of the tier at
/// three total mentions.
const DEPTH_SCALE: f64 = 3.0;
/// Decay constant for market density: each ~4 competing domains halve-ish
/// the remaining tier.
const DENSITY_SCALE: f64 = 4.0;

/// A computed visibility score with its full decomposition.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityScore {
    /// Clipped sum of the breakdown tiers, rounded to one decimal.
    pub total: f64,
    pub breakdown: ScoreBreakdown,
    /// Display-only per-platform sub-scores, keyed by platform id.
    pub platform_scores: BTreeMap<String, f64>,
    /// Human-readable account of how the total was reached.
    pub explanation: String,
}

/// Score visibility from aggregated platform signals.
///
/// `platforms_attempted` is the denominator for every fraction-of-platforms
/// tier: platforms that errored or timed out still count against the brand,
/// since a customer asking that assistant got no mention either way. With
/// zero attempted platforms, or when no platform mentioned the brand at
/// all, the total is `0.0`.
#[must_use]
pub fn score_visibility(
    signals: &[MentionSignal],
    platforms_attempted: usize,
    other_brands_mentioned: usize,
) -> VisibilityScore {
    if platforms_attempted == 0 {
        return VisibilityScore {
            total: 0.0,
            breakdown: zero_breakdown(),
            platform_scores: BTreeMap::new(),
            explanation: "No AI platforms could be queried.".to_string(),
        };
    }

    #[allow(clippy::cast_precision_loss)]
    let attempted = platforms_attempted as f64;
    let cited = signals.iter().filter(|s| s.in_citations).count();
    let domain = signals.iter().filter(|s| s.domain_found).count();
    // Brand tier covers echo-only answers: the bare brand name with no
    // domain or citation backing it. A platform with harder evidence is
    // already paid in the higher tiers and must not double-dip here.
    let echo_only = signals
        .iter()
        .filter(|s| s.mentioned_you && !s.domain_found && !s.in_citations)
        .count();
    let mentioned = signals.iter().filter(|s| s.mentioned_you).count();

    #[allow(clippy::cast_precision_loss)]
    let citation = CITATION_WEIGHT * cited as f64 / attempted;
    #[allow(clippy::cast_precision_loss)]
    let domain_visibility = DOMAIN_WEIGHT * domain as f64 / attempted;
    #[allow(clippy::cast_precision_loss)]
    let brand_recognition = BRAND_WEIGHT * echo_only as f64 / attempted;

    // Position and depth only reward genuine (domain or citation) mentions;
    // an early or repeated echo of the question's own brand name is not
    // evidence of recall.
    let positions: Vec<f64> = signals
        .iter()
        .filter(|s| s.domain_found || s.in_citations)
        .map(|s| s.mention_position)
        .filter(|p| *p >= 0.0)
        .collect();
    let position_bonus = if positions.is_empty() {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        let avg = positions.iter().sum::<f64>() / positions.len() as f64;
        POSITION_WEIGHT * (1.0 - avg)
    };

    let total_mentions: u32 = signals
        .iter()
        .filter(|s| s.domain_found || s.in_citations)
        .map(|s| s.mention_count)
        .sum();
    let mention_depth =
        DEPTH_WEIGHT * (1.0 - (-f64::from(total_mentions) / DEPTH_SCALE).exp());

    // Density rewards an uncrowded answer space, but only once the brand has
    // at least one mention; an invisible brand in an empty market is still
    // invisible.
    let market_density = if mentioned > 0 {
        #[allow(clippy::cast_precision_loss)]
        let others = other_brands_mentioned as f64;
        DENSITY_WEIGHT * (-others / DENSITY_SCALE).exp()
    } else {
        0.0
    };

    let breakdown = ScoreBreakdown {
        citation: round1(citation),
        domain_visibility: round1(domain_visibility),
        brand_recognition: round1(brand_recognition),
        position_bonus: round1(position_bonus),
        mention_depth: round1(mention_depth),
        market_density: round1(market_density),
    };

    let raw = citation + domain_visibility + brand_recognition + position_bonus
        + mention_depth
        + market_density;
    let total = round1(raw.clamp(0.0, 100.0));

    VisibilityScore {
        total,
        explanation: explain(&breakdown, cited, domain, echo_only, platforms_attempted),
        platform_scores: platform_scores(signals),
        breakdown,
    }
}

/// Verdict message for a total score, by band.
#[must_use]
pub fn verdict(total: f64) -> &'static str {
    if total < 15.0 {
        "AI assistants don't know this brand. When customers ask AI for recommendations in this space, it never comes up."
    } else if total < 40.0 {
        "AI assistants have limited awareness of this brand. It surfaces occasionally but is easy to miss."
    } else if total < 60.0 {
        "AI assistants recognize this brand and mention it in relevant answers, though not consistently."
    } else {
        "AI assistants know this brand well and cite it as a source. Strong AI visibility."
    }
}

/// Display-only per-platform sub-scores: strongest evidence dominates, with
/// small position and depth components on top, capped at 100.
fn platform_scores(signals: &[MentionSignal]) -> BTreeMap<String, f64> {
    let mut scores = BTreeMap::new();
    for signal in signals {
        let mut score = 0.0;
        if signal.in_citations {
            score += 50.0;
        }
        if signal.domain_found {
            score += 30.0;
        }
        if signal.mentioned_you {
            score += 10.0;
        }
        if signal.mention_position >= 0.0 {
            score += 5.0 * (1.0 - signal.mention_position);
        }
        score += 5.0 * (1.0 - (-f64::from(signal.mention_count) / DEPTH_SCALE).exp());
        scores.insert(
            signal.platform.as_str().to_string(),
            round1(score.clamp(0.0, 100.0)),
        );
    }
    scores
}

fn explain(
    breakdown: &ScoreBreakdown,
    cited: usize,
    domain: usize,
    echo_only: usize,
    attempted: usize,
) -> String {
    let mut parts = Vec::new();
    if cited > 0 {
        parts.push(format!(
            "cited as a source by {cited} of {attempted} platforms (+{})",
            breakdown.citation
        ));
    }
    if domain > 0 {
        parts.push(format!(
            "domain surfaced on {domain} of {attempted} platforms (+{})",
            breakdown.domain_visibility
        ));
    }
    if echo_only > 0 {
        parts.push(format!(
            "brand name echoed without the domain by {echo_only} of {attempted} platforms (+{})",
            breakdown.brand_recognition
        ));
    }
    if breakdown.position_bonus > 0.0 {
        parts.push(format!(
            "mentioned early in answers (+{})",
            breakdown.position_bonus
        ));
    }
    if breakdown.mention_depth > 0.0 {
        parts.push(format!("mention depth (+{})", breakdown.mention_depth));
    }
    if breakdown.market_density > 0.0 {
        parts.push(format!(
            "low competing-brand density (+{})",
            breakdown.market_density
        ));
    }
    if parts.is_empty() {
        format!("No platform of {attempted} queried produced a genuine brand or domain mention.")
    } else {
        parts.join("; ")
    }
}

fn zero_breakdown() -> ScoreBreakdown {
    ScoreBreakdown {
        citation: 0.0,
        domain_visibility: 0.0,
        brand_recognition: 0.0,
        position_bonus: 0.0,
        mention_depth: 0.0,
        market_density: 0.0,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
