//! Probe generation and the deterministic fallback.

use geovis_core::brand_token;
use geovis_sitefetch::SiteContext;
use regex::Regex;

use crate::backend::QueryBackend;
use crate::types::{ProbeQuery, ProbeSet, QueryIntent};

const MIN_QUERY_CHARS: usize = 5;
const MAX_QUERY_CHARS: usize = 200;

/// Generate probe queries for `domain`.
///
/// Calls the backend with a structured prompt and parses the strict
/// `SUMMARY:`/`Q1:`/`Q2:`/`Q3:` reply. The parsed result is accepted only
/// when at least two queries survive validation (5–200 chars each). On any
/// failure — no backend configured, transport error, malformed output, too
/// few queries — degrades to [`fallback_probes`]. Never errors.
pub async fn generate_probes(
    backend: Option<&dyn QueryBackend>,
    domain: &str,
    context: &SiteContext,
) -> ProbeSet {
    let Some(backend) = backend else {
        tracing::debug!(domain, "no text-generation backend configured, using templates");
        return fallback_probes(domain, context);
    };

    let prompt = build_prompt(domain, context);
    match backend.complete(&prompt).await {
        Ok(raw) => match parse_probe_response(&raw) {
            Some(set) => {
                tracing::debug!(domain, queries = set.queries.len(), "generated probe queries");
                set
            }
            None => {
                tracing::warn!(domain, "backend reply failed strict parse, using templates");
                fallback_probes(domain, context)
            }
        },
        Err(e) => {
            tracing::warn!(domain, error = %e, "probe generation failed, using templates");
            fallback_probes(domain, context)
        }
    }
}

/// The always-available deterministic fallback: three template probes and a
/// templated summary. This path must never fail and is tested directly.
#[must_use]
pub fn fallback_probes(domain: &str, context: &SiteContext) -> ProbeSet {
    let brand = brand_token(domain);
    let summary = context
        .description
        .clone()
        .or_else(|| context.title.clone())
        .unwrap_or_else(|| format!("{brand} is the business behind {domain}."));

    ProbeSet {
        summary,
        queries: vec![
            ProbeQuery {
                text: format!("what is {domain}"),
                intent: QueryIntent::Discovery,
            },
            ProbeQuery {
                text: format!("tell me about {brand}"),
                intent: QueryIntent::Brand,
            },
            ProbeQuery {
                text: format!("{brand} reviews"),
                intent: QueryIntent::Decision,
            },
        ],
    }
}

fn build_prompt(domain: &str, context: &SiteContext) -> String {
    let mut prompt = String::from(
        "You research how AI assistants answer questions about businesses.\n\
         Based on the website below, write three questions a real customer \
         might ask an AI assistant, plus a one-sentence business summary.\n\n",
    );
    prompt.push_str(&format!("Website: {domain}\n"));
    if let Some(title) = &context.title {
        prompt.push_str(&format!("Title: {title}\n"));
    }
    if let Some(description) = &context.description {
        prompt.push_str(&format!("Description: {description}\n"));
    }
    if let Some(site_name) = &context.site_name {
        prompt.push_str(&format!("Site name: {site_name}\n"));
    }
    if !context.headings.is_empty() {
        prompt.push_str(&format!("Headings: {}\n", context.headings.join(" | ")));
    }
    prompt.push_str(
        "\nReply in exactly this format, nothing else:\n\
         SUMMARY: <one sentence describing the business>\n\
         Q1: <a category-discovery question that does not assume the brand is known>\n\
         Q2: <a question asking about the brand by name>\n\
         Q3: <a comparison or decision question (reviews, alternatives)>\n",
    );
    prompt
}

/// Parse the strict generator reply. Returns `None` unless a summary line
/// exists and at least two queries pass length validation.
fn parse_probe_response(raw: &str) -> Option<ProbeSet> {
    let summary_re = Regex::new(r"(?m)^\s*SUMMARY:\s*(.+)$").expect("valid summary regex");
    let summary = summary_re
        .captures(raw)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())?;

    let intents = [
        ("Q1", QueryIntent::Discovery),
        ("Q2", QueryIntent::Brand),
        ("Q3", QueryIntent::Decision),
    ];

    let mut queries = Vec::new();
    for (tag, intent) in intents {
        let re = Regex::new(&format!(r"(?m)^\s*{tag}:\s*(.+)$")).expect("valid query regex");
        if let Some(text) = re
            .captures(raw)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().trim().trim_matches('"').to_string())
            .filter(|s| (MIN_QUERY_CHARS..=MAX_QUERY_CHARS).contains(&s.chars().count()))
        {
            queries.push(ProbeQuery { text, intent });
        }
    }

    if queries.len() < 2 {
        return None;
    }
    Some(ProbeSet { summary, queries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::error::ProbeError;

    struct CannedBackend(&'static str);

    #[async_trait]
    impl QueryBackend for CannedBackend {
        async fn complete(&self, _prompt: &str) -> Result<String, ProbeError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl QueryBackend for FailingBackend {
        async fn complete(&self, _prompt: &str) -> Result<String, ProbeError> {
            Err(ProbeError::Api("boom".to_string()))
        }
    }

    const GOOD_REPLY: &str = "SUMMARY: Acme sells project tracking software.\n\
        Q1: what tools help teams track projects\n\
        Q2: tell me about Acme's project tracker\n\
        Q3: is Acme better than its alternatives";

    #[tokio::test]
    async fn well_formed_reply_is_parsed() {
        let backend = CannedBackend(GOOD_REPLY);
        let set = generate_probes(Some(&backend), "acme.com", &SiteContext::default()).await;
        assert_eq!(set.summary, "Acme sells project tracking software.");
        assert_eq!(set.queries.len(), 3);
        assert_eq!(set.queries[0].intent, QueryIntent::Discovery);
        assert_eq!(set.queries[2].intent, QueryIntent::Decision);
    }

    #[tokio::test]
    async fn two_valid_queries_are_accepted() {
        let backend = CannedBackend(
            "SUMMARY: A business.\nQ1: what is acme used for\nQ3: acme reviews and ratings",
        );
        let set = generate_probes(Some(&backend), "acme.com", &SiteContext::default()).await;
        assert_eq!(set.queries.len(), 2);
        assert_eq!(set.queries[1].intent, QueryIntent::Decision);
    }

    #[tokio::test]
    async fn malformed_reply_falls_back() {
        let backend = CannedBackend("I'd be happy to help! Here are some thoughts...");
        let set = generate_probes(Some(&backend), "acme.com", &SiteContext::default()).await;
        assert_eq!(set, fallback_probes("acme.com", &SiteContext::default()));
    }

    #[tokio::test]
    async fn too_short_queries_fall_back() {
        // Only one query survives the 5-char minimum — below the accept bar.
        let backend = CannedBackend("SUMMARY: A business.\nQ1: hi\nQ2: ok\nQ3: acme reviews");
        let set = generate_probes(Some(&backend), "acme.com", &SiteContext::default()).await;
        assert_eq!(set.queries.len(), 3);
        assert_eq!(set.queries[0].text, "what is acme.com");
    }

    #[tokio::test]
    async fn backend_error_falls_back() {
        let set = generate_probes(Some(&FailingBackend), "acme.com", &SiteContext::default()).await;
        assert_eq!(set, fallback_probes("acme.com", &SiteContext::default()));
    }

    #[tokio::test]
    async fn missing_backend_falls_back() {
        let set = generate_probes(None, "projecthub.io", &SiteContext::default()).await;
        assert_eq!(set.queries[1].text, "tell me about projecthub");
    }

    #[test]
    fn fallback_is_deterministic() {
        let context = SiteContext::default();
        let a = fallback_probes("acme.com", &context);
        let b = fallback_probes("acme.com", &context);
        assert_eq!(a, b);
        assert_eq!(a.queries[0].text, "what is acme.com");
        assert_eq!(a.queries[1].text, "tell me about acme");
        assert_eq!(a.queries[2].text, "acme reviews");
    }

    #[test]
    fn fallback_summary_prefers_site_description() {
        let context = SiteContext {
            description: Some("Acme builds widgets.".to_string()),
            ..SiteContext::default()
        };
        let set = fallback_probes("acme.com", &context);
        assert_eq!(set.summary, "Acme builds widgets.");
    }

    #[test]
    fn overlong_query_is_rejected_by_parser() {
        let long = "x".repeat(MAX_QUERY_CHARS + 1);
        let raw = format!("SUMMARY: S.\nQ1: {long}\nQ2: valid question here\nQ3: another valid one");
        let set = parse_probe_response(&raw).expect("two valid queries remain");
        assert_eq!(set.queries.len(), 2);
    }
}
