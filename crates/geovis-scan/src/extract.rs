//! Mention extraction.
//!
//! Derives brand/domain recognition facts from a single platform answer and
//! aggregates them per platform. Matching is deliberately cheap regex work
//! over a curated fragment dictionary — a precision/recall tradeoff, not an
//! NLP model.

use geovis_core::brand_token;
use geovis_platforms::{PlatformAnswer, PlatformId};
use regex::Regex;

use crate::fragments::{BRAND_FRAGMENTS, NEGATIVE_PHRASES, TLD_SUFFIXES};
use crate::types::{AnswerExtraction, MentionSignal};

const SNIPPET_CHARS: usize = 200;
const SNIPPET_LEAD_BYTES: usize = 60;

/// Extract a single answer's recognition facts for `domain`.
///
/// `domain` must already be normalized (lowercase, bare hostname). The
/// negative-mention filter runs last and suppresses `mentioned_you` /
/// `domain_found` derived from body text; a structured citation of the
/// target still counts, since the provider demonstrably retrieved the site.
#[must_use]
pub fn extract_answer(domain: &str, answer: &PlatformAnswer) -> AnswerExtraction {
    let text = &answer.answer_text;
    let lower = text.to_lowercase();

    let negative = NEGATIVE_PHRASES.iter().any(|p| lower.contains(p));

    let in_citations = answer
        .citation_urls
        .iter()
        .filter_map(|url| citation_host(url))
        .any(|host| host_matches_target(&host, domain));

    let mention_re = build_mention_regex(domain);
    let first_match = mention_re.find(text);
    // Disclaimed answers echo the question's own brand name; those hits are
    // not mentions worth counting.
    #[allow(clippy::cast_possible_truncation)]
    let mention_count = if negative {
        0
    } else {
        mention_re.find_iter(text).count() as u32
    };

    // Whole-word match, so "notacme.com" never counts for "acme.com".
    let domain_re = build_domain_regex(domain);
    let genuine_text_match = first_match.is_some() && !negative;
    let domain_found = (domain_re.is_match(text) && !negative) || in_citations;
    let mentioned_you = genuine_text_match || in_citations;

    #[allow(clippy::cast_precision_loss)]
    let mention_position = match first_match {
        Some(m) if genuine_text_match && !text.is_empty() => m.start() as f64 / text.len() as f64,
        _ => -1.0,
    };

    let ai_recommends = other_domains(&lower, &answer.citation_urls, domain);

    let snippet = match first_match {
        Some(m) if genuine_text_match => snippet_around(text, m.start()),
        _ => leading_snippet(text),
    };

    AnswerExtraction {
        mentioned_you,
        domain_found,
        in_citations,
        mention_position,
        mention_count,
        negative_mention: negative,
        ai_recommends,
        snippet,
    }
}

/// Aggregate one platform's extractions across its sub-queries.
///
/// Booleans are any-true, `mention_position` takes the minimum (earliest)
/// position found, `mention_count` the maximum across sub-queries.
#[must_use]
pub fn aggregate_signal(platform: PlatformId, extractions: &[AnswerExtraction]) -> MentionSignal {
    let mention_position = extractions
        .iter()
        .map(|e| e.mention_position)
        .filter(|p| *p >= 0.0)
        .fold(f64::INFINITY, f64::min);
    let mention_position = if mention_position.is_finite() {
        mention_position
    } else {
        -1.0
    };

    MentionSignal {
        platform,
        mentioned_you: extractions.iter().any(|e| e.mentioned_you),
        domain_found: extractions.iter().any(|e| e.domain_found),
        in_citations: extractions.iter().any(|e| e.in_citations),
        mention_position,
        mention_count: extractions.iter().map(|e| e.mention_count).max().unwrap_or(0),
    }
}

/// Index of the sub-query whose answer should be displayed: the first with
/// a genuine (non-echo) mention, falling back to the first sub-query.
#[must_use]
pub(crate) fn preferred_index(extractions: &[AnswerExtraction]) -> usize {
    extractions
        .iter()
        .position(|e| e.domain_found || e.in_citations)
        .unwrap_or(0)
}

/// Build the brand/domain mention pattern.
///
/// Alternates, in priority order: the literal domain, compound-split
/// variants allowing a space or hyphen ("projecthub" also matching
/// "Project Hub"), and the bare brand token — all whole-word and
/// case-insensitive.
fn build_mention_regex(domain: &str) -> Regex {
    let brand = brand_token(domain);
    let mut alternates = vec![regex::escape(domain)];

    for i in 2..=brand.len().saturating_sub(2) {
        if !brand.is_char_boundary(i) {
            continue;
        }
        let (left, right) = brand.split_at(i);
        if BRAND_FRAGMENTS.contains(&left) && BRAND_FRAGMENTS.contains(&right) {
            alternates.push(format!(
                "{}[ -]?{}",
                regex::escape(left),
                regex::escape(right)
            ));
        }
    }

    alternates.push(regex::escape(&brand));
    let pattern = format!(r"(?i)\b(?:{})\b", alternates.join("|"));
    Regex::new(&pattern).expect("valid mention regex")
}

/// Whole-word, case-insensitive pattern for the literal domain.
fn build_domain_regex(domain: &str) -> Regex {
    let pattern = format!(r"(?i)\b{}\b", regex::escape(domain));
    Regex::new(&pattern).expect("valid domain regex")
}

/// All domain-shaped tokens in `lower` plus citation hosts, minus the
/// target and its subdomains. First-appearance order, deduplicated.
fn other_domains(lower: &str, citation_urls: &[String], domain: &str) -> Vec<String> {
    let tlds = TLD_SUFFIXES.join("|");
    let re = Regex::new(&format!(
        r"\b[a-z0-9][a-z0-9-]*(?:\.[a-z0-9][a-z0-9-]*)*\.(?:{tlds})\b"
    ))
    .expect("valid domain regex");

    let mut seen = Vec::new();
    let candidates = re
        .find_iter(lower)
        .map(|m| m.as_str().trim_start_matches("www.").to_string())
        .chain(citation_urls.iter().filter_map(|url| citation_host(url)));

    for candidate in candidates {
        if host_matches_target(&candidate, domain) {
            continue;
        }
        if !seen.contains(&candidate) {
            seen.push(candidate);
        }
    }
    seen
}

/// Hostname of a citation URL: scheme, path, port, and a leading `www.`
/// stripped, lowercased.
fn citation_host(url: &str) -> Option<String> {
    let url = url.trim().to_lowercase();
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(&url);
    let host = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or("")
        .split(':')
        .next()
        .unwrap_or("")
        .trim_start_matches("www.");
    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

/// True when `host` is the target domain or one of its subdomains.
fn host_matches_target(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{domain}"))
}

fn snippet_around(text: &str, match_start: usize) -> String {
    let mut start = match_start.saturating_sub(SNIPPET_LEAD_BYTES);
    while start > 0 && !text.is_char_boundary(start) {
        start -= 1;
    }
    text[start..]
        .chars()
        .take(SNIPPET_CHARS)
        .collect::<String>()
        .trim()
        .to_string()
}

fn leading_snippet(text: &str) -> String {
    text.chars()
        .take(SNIPPET_CHARS)
        .collect::<String>()
        .trim()
        .to_string()
}
