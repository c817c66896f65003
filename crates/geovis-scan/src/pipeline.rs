//! The scan pipeline.
//!
//! Orchestrates one full visibility scan: normalize the domain, fetch the
//! homepage context (soft-failing to empty), generate probe queries, fan out
//! over every configured platform, extract mention signals, and score. Only
//! input validation can fail a scan; every downstream failure degrades.

use std::time::Duration;

use geovis_core::contract::{QueryResult, ScanReport, ScanSummary};
use geovis_core::{normalize_domain, validate_domain, AppConfig};
use geovis_platforms::{
    build_adapters, fan_out, BranchOutcome, PlatformAdapter, PlatformAnswer, PlatformId,
};
use geovis_probes::{generate_probes, OpenAiBackend, ProbeSet, QueryBackend, QueryIntent};
use geovis_sitefetch::{fetch_site_context, SiteContext};

use crate::error::ScanError;
use crate::extract::{aggregate_signal, extract_answer, preferred_index};
use crate::score::{score_visibility, verdict};
use crate::types::{AnswerExtraction, MentionSignal};

/// Everything a scan needs, injectable for tests.
pub struct ScanDeps {
    /// Client for the homepage context fetch.
    pub http_client: reqwest::Client,
    /// Probe-query generator; `None` means template probes only.
    pub backend: Option<Box<dyn QueryBackend>>,
    /// One adapter per configured platform, queried in this order.
    pub adapters: Vec<Box<dyn PlatformAdapter>>,
    /// Per-branch deadline for each platform query.
    pub platform_timeout_secs: u64,
}

impl ScanDeps {
    /// Build production dependencies from configuration.
    ///
    /// The probe backend is constructed only when an OpenAI key is present;
    /// otherwise probes fall back to templates and the scan still runs.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Setup`] or [`ScanError::ProbeBackend`] when an
    /// HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScanError> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.sitefetch_timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        let backend = match &config.openai_api_key {
            Some(key) => {
                let backend = OpenAiBackend::new(
                    &config.openai_base_url,
                    key,
                    &config.textgen_model,
                    config.textgen_timeout_secs,
                )?;
                Some(Box::new(backend) as Box<dyn QueryBackend>)
            }
            None => None,
        };

        Ok(Self {
            http_client,
            backend,
            adapters: build_adapters(config, &http_client_for_adapters(config)?),
            platform_timeout_secs: config.platform_timeout_secs,
        })
    }
}

fn http_client_for_adapters(config: &AppConfig) -> Result<reqwest::Client, ScanError> {
    // Platform calls get their own client: the per-branch fan-out deadline
    // governs them, so the client-level timeout must not be the short
    // sitefetch one.
    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.platform_timeout_secs))
        .connect_timeout(Duration::from_secs(5))
        .build()?;
    Ok(client)
}

/// Caller-facing scan knobs.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Ask each platform only the first probe query instead of two.
    pub single_probe: bool,
}

/// Run one full visibility scan for `raw_domain`.
///
/// # Errors
///
/// Returns [`ScanError::InvalidDomain`] when the input does not normalize
/// to a plausible hostname. No other failure propagates.
pub async fn run_scan(
    deps: &ScanDeps,
    raw_domain: &str,
    options: &ScanOptions,
) -> Result<ScanReport, ScanError> {
    let domain = normalize_domain(raw_domain);
    validate_domain(&domain)?;
    tracing::info!(domain, single_probe = options.single_probe, "starting scan");

    let context = match fetch_site_context(&deps.http_client, &domain).await {
        Ok(context) => context,
        Err(e) => {
            tracing::warn!(domain, error = %e, "site context fetch failed, continuing without it");
            SiteContext::default()
        }
    };

    let probes = generate_probes(deps.backend.as_deref(), &domain, &context).await;
    let queries = select_queries(&probes, options.single_probe);

    let outcomes = fan_out(&deps.adapters, &queries, deps.platform_timeout_secs).await;
    let grouped = group_by_platform(outcomes);

    let mut signals: Vec<MentionSignal> = Vec::new();
    let mut results: Vec<QueryResult> = Vec::new();
    let mut platform_errors: Vec<String> = Vec::new();
    let mut other_brands: Vec<String> = Vec::new();

    for (platform, branches) in grouped {
        let mut answers: Vec<(usize, PlatformAnswer)> = Vec::new();
        let mut first_error: Option<String> = None;
        for branch in branches {
            match branch.result {
                Ok(answer) => answers.push((branch.query_index, answer)),
                Err(e) => {
                    // Display already carries the platform prefix.
                    if first_error.is_none() {
                        first_error = Some(e.to_string());
                    }
                }
            }
        }

        if answers.is_empty() {
            if let Some(error) = first_error {
                platform_errors.push(error);
            }
            continue;
        }

        let extractions: Vec<AnswerExtraction> = answers
            .iter()
            .map(|(_, answer)| extract_answer(&domain, answer))
            .collect();

        for extraction in &extractions {
            for recommended in &extraction.ai_recommends {
                if !other_brands.contains(recommended) {
                    other_brands.push(recommended.clone());
                }
            }
        }

        let signal = aggregate_signal(platform, &extractions);
        let preferred = preferred_index(&extractions);
        results.push(QueryResult {
            query: queries
                .get(answers[preferred].0)
                .cloned()
                .unwrap_or_default(),
            platform: platform.as_str().to_string(),
            ai_recommends: union_recommends(&extractions),
            mentioned_you: signal.mentioned_you,
            snippet: extractions[preferred].snippet.clone(),
            in_citations: signal.in_citations,
            domain_found: signal.domain_found,
            mention_position: signal.mention_position,
            mention_count: signal.mention_count,
        });
        signals.push(signal);
    }

    let score = score_visibility(&signals, deps.adapters.len(), other_brands.len());
    let mentioned_count = signals.iter().filter(|s| s.mentioned_you).count();

    #[allow(clippy::cast_possible_truncation)]
    let total_queries = (queries.len() * deps.adapters.len()) as u32;
    #[allow(clippy::cast_possible_truncation)]
    let mentioned_count = mentioned_count as u32;

    tracing::info!(
        domain,
        score = score.total,
        mentioned_count,
        platform_errors = platform_errors.len(),
        "scan complete"
    );

    Ok(ScanReport {
        domain,
        results,
        summary: ScanSummary {
            total_queries,
            mentioned_count,
            is_invisible: mentioned_count == 0,
            visibility_score: score.total,
            platform_scores: score.platform_scores,
            score_breakdown: score.breakdown,
            score_explanation: score.explanation,
            business_summary: probes.summary,
            message: verdict(score.total).to_string(),
            platform_errors: if platform_errors.is_empty() {
                None
            } else {
                Some(platform_errors)
            },
        },
        report_id: None,
    })
}

/// Pick the probe texts to send: the discovery and decision probes (the two
/// that least echo the brand name back), or just the first when
/// `single_probe` is set.
fn select_queries(probes: &ProbeSet, single_probe: bool) -> Vec<String> {
    if single_probe {
        return probes
            .queries
            .first()
            .map(|q| q.text.clone())
            .into_iter()
            .collect();
    }

    let discovery = probes
        .queries
        .iter()
        .find(|q| q.intent == QueryIntent::Discovery)
        .or_else(|| probes.queries.first());
    let decision = probes
        .queries
        .iter()
        .find(|q| q.intent == QueryIntent::Decision)
        .or_else(|| probes.queries.last());

    let mut selected = Vec::new();
    for probe in [discovery, decision].into_iter().flatten() {
        if !selected.contains(&probe.text) {
            selected.push(probe.text.clone());
        }
    }
    selected
}

/// Regroup fan-out outcomes per platform, preserving adapter order.
fn group_by_platform(outcomes: Vec<BranchOutcome>) -> Vec<(PlatformId, Vec<BranchOutcome>)> {
    let mut grouped: Vec<(PlatformId, Vec<BranchOutcome>)> = Vec::new();
    for outcome in outcomes {
        match grouped.iter_mut().find(|(p, _)| *p == outcome.platform) {
            Some((_, branches)) => branches.push(outcome),
            None => grouped.push((outcome.platform, vec![outcome])),
        }
    }
    grouped
}

fn union_recommends(extractions: &[AnswerExtraction]) -> Vec<String> {
    let mut union = Vec::new();
    for extraction in extractions {
        for domain in &extraction.ai_recommends {
            if !union.contains(domain) {
                union.push(domain.clone());
            }
        }
    }
    union
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use geovis_platforms::PlatformError;

    /// Adapter returning a fixed answer regardless of the query.
    struct FixedAdapter {
        platform: PlatformId,
        text: String,
        citations: Vec<String>,
    }

    #[async_trait]
    impl PlatformAdapter for FixedAdapter {
        fn id(&self) -> PlatformId {
            self.platform
        }

        async fn query(&self, _text: &str) -> Result<PlatformAnswer, PlatformError> {
            Ok(PlatformAnswer {
                platform: self.platform,
                answer_text: self.text.clone(),
                citation_urls: self.citations.clone(),
            })
        }
    }

    struct FailingAdapter(PlatformId);

    #[async_trait]
    impl PlatformAdapter for FailingAdapter {
        fn id(&self) -> PlatformId {
            self.0
        }

        async fn query(&self, _text: &str) -> Result<PlatformAnswer, PlatformError> {
            Err(PlatformError::MissingCredential { platform: self.0 })
        }
    }

    fn fixed(platform: PlatformId, text: &str, citations: &[&str]) -> Box<dyn PlatformAdapter> {
        Box::new(FixedAdapter {
            platform,
            text: text.to_string(),
            citations: citations.iter().map(|s| (*s).to_string()).collect(),
        })
    }

    fn deps(adapters: Vec<Box<dyn PlatformAdapter>>) -> ScanDeps {
        // Short timeout so the context fetch for the unresolvable test
        // domain fails fast and the pipeline exercises its soft-fail path.
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .expect("client");
        ScanDeps {
            http_client,
            backend: None,
            adapters,
            platform_timeout_secs: 30,
        }
    }

    const DISCLAIMER: &str = "I don't recognize that brand and have no details about it.";

    #[tokio::test]
    async fn unknown_brand_everywhere_is_invisible() {
        let deps = deps(vec![
            fixed(PlatformId::Openai, DISCLAIMER, &[]),
            fixed(PlatformId::Perplexity, DISCLAIMER, &[]),
            fixed(PlatformId::Gemini, DISCLAIMER, &[]),
        ]);

        let report = run_scan(&deps, "acme.invalid", &ScanOptions::default())
            .await
            .expect("scan");

        assert_eq!(report.domain, "acme.invalid");
        assert!(report.summary.is_invisible);
        assert_eq!(report.summary.mentioned_count, 0);
        assert!(report.summary.visibility_score < 15.0);
        assert!(report.summary.message.contains("never comes up"));
        assert_eq!(report.results.len(), 3, "answered platforms still get rows");
        assert!(report.summary.platform_errors.is_none());
        assert_eq!(report.summary.total_queries, 6, "2 probes x 3 platforms");
    }

    #[tokio::test]
    async fn cited_brand_scores_well_above_invisible() {
        let deps = deps(vec![
            fixed(
                PlatformId::Openai,
                "acme.invalid is a well known widget shop, see acme.invalid for details.",
                &["https://acme.invalid/about"],
            ),
            fixed(PlatformId::Perplexity, "Acme could be one option among many.", &[]),
            Box::new(FailingAdapter(PlatformId::Gemini)),
        ]);

        let report = run_scan(&deps, "https://www.ACME.invalid/pricing", &ScanOptions::default())
            .await
            .expect("scan");

        assert_eq!(report.domain, "acme.invalid", "input is normalized first");
        assert!(!report.summary.is_invisible);
        assert_eq!(report.summary.mentioned_count, 2);
        assert!(
            report.summary.visibility_score > 25.0 && report.summary.visibility_score < 60.0,
            "got {}",
            report.summary.visibility_score
        );

        // Gemini never answered: no result row, one named error.
        assert_eq!(report.results.len(), 2);
        let errors = report.summary.platform_errors.as_ref().expect("errors");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("gemini:"), "got {:?}", errors[0]);

        let openai = report
            .results
            .iter()
            .find(|r| r.platform == "openai")
            .expect("openai row");
        assert!(openai.in_citations);
        assert!(openai.domain_found);
        assert!(openai.snippet.contains("acme.invalid"));

        let perplexity = report
            .results
            .iter()
            .find(|r| r.platform == "perplexity")
            .expect("perplexity row");
        assert!(perplexity.mentioned_you);
        assert!(!perplexity.domain_found);
    }

    #[tokio::test]
    async fn single_probe_halves_the_query_count() {
        let deps = deps(vec![fixed(PlatformId::Openai, DISCLAIMER, &[])]);
        let options = ScanOptions { single_probe: true };
        let report = run_scan(&deps, "acme.invalid", &options).await.expect("scan");
        assert_eq!(report.summary.total_queries, 1);
    }

    #[tokio::test]
    async fn invalid_domain_is_the_only_hard_error() {
        let deps = deps(vec![]);
        let err = run_scan(&deps, "   ", &ScanOptions::default())
            .await
            .expect_err("must reject");
        assert!(matches!(err, ScanError::InvalidDomain(_)));
    }

    #[tokio::test]
    async fn no_adapters_scores_zero_with_empty_report() {
        let deps = deps(vec![]);
        let report = run_scan(&deps, "acme.invalid", &ScanOptions::default())
            .await
            .expect("scan");
        assert_eq!(report.summary.visibility_score, 0.0);
        assert!(report.summary.is_invisible);
        assert!(report.results.is_empty());
        assert_eq!(report.summary.total_queries, 0);
    }

    #[test]
    fn select_queries_prefers_discovery_and_decision() {
        let probes = geovis_probes::fallback_probes("acme.invalid", &SiteContext::default());
        let selected = select_queries(&probes, false);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0], "what is acme.invalid");
        assert_eq!(selected[1], "acme reviews");
    }

    #[test]
    fn select_queries_single_takes_the_first() {
        let probes = geovis_probes::fallback_probes("acme.invalid", &SiteContext::default());
        let selected = select_queries(&probes, true);
        assert_eq!(selected, vec!["what is acme.invalid".to_string()]);
    }
}
