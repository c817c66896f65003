//! All-settled concurrent fan-out over adapters × probe queries.

use std::time::Duration;

use futures::future::join_all;

use crate::adapters::PlatformAdapter;
use crate::error::PlatformError;
use crate::types::{PlatformAnswer, PlatformId};

/// One settled branch of the fan-out: either a normalized answer or a named
/// per-platform failure. Never a panic, never an unsettled branch.
#[derive(Debug)]
pub struct BranchOutcome {
    pub platform: PlatformId,
    /// Index into the probe-query slice this branch asked.
    pub query_index: usize,
    pub result: Result<PlatformAnswer, PlatformError>,
}

/// Issue every adapter × query combination concurrently and wait for all of
/// them to settle.
///
/// Each branch carries its own `timeout_secs` deadline; a slow or failing
/// branch cannot block or cancel its siblings. The returned vec is in
/// (adapter, query) order — deterministic regardless of which provider
/// responds first. Dropping the future returned by this function cancels
/// all in-flight provider calls.
pub async fn fan_out(
    adapters: &[Box<dyn PlatformAdapter>],
    queries: &[String],
    timeout_secs: u64,
) -> Vec<BranchOutcome> {
    let deadline = Duration::from_secs(timeout_secs);
    let mut branches = Vec::with_capacity(adapters.len() * queries.len());

    for adapter in adapters {
        for (query_index, text) in queries.iter().enumerate() {
            branches.push(async move {
                let platform = adapter.id();
                let result = match tokio::time::timeout(deadline, adapter.query(text)).await {
                    Ok(result) => result,
                    Err(_) => Err(PlatformError::Timeout {
                        platform,
                        secs: timeout_secs,
                    }),
                };
                if let Err(e) = &result {
                    tracing::warn!(platform = %platform, query_index, error = %e, "platform query failed");
                }
                BranchOutcome {
                    platform,
                    query_index,
                    result,
                }
            });
        }
    }

    join_all(branches).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct OkAdapter(PlatformId);

    #[async_trait]
    impl PlatformAdapter for OkAdapter {
        fn id(&self) -> PlatformId {
            self.0
        }

        async fn query(&self, text: &str) -> Result<PlatformAnswer, PlatformError> {
            Ok(PlatformAnswer {
                platform: self.0,
                answer_text: format!("answer to: {text}"),
                citation_urls: vec![],
            })
        }
    }

    struct ErrAdapter(PlatformId);

    #[async_trait]
    impl PlatformAdapter for ErrAdapter {
        fn id(&self) -> PlatformId {
            self.0
        }

        async fn query(&self, _text: &str) -> Result<PlatformAnswer, PlatformError> {
            Err(PlatformError::MissingCredential { platform: self.0 })
        }
    }

    struct SlowAdapter(PlatformId);

    #[async_trait]
    impl PlatformAdapter for SlowAdapter {
        fn id(&self) -> PlatformId {
            self.0
        }

        async fn query(&self, _text: &str) -> Result<PlatformAnswer, PlatformError> {
            tokio::time::sleep(Duration::from_secs(300)).await;
            unreachable!("the fan-out deadline should fire first");
        }
    }

    fn queries(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("query {i}")).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn all_branches_settle_despite_failures() {
        let adapters: Vec<Box<dyn PlatformAdapter>> = vec![
            Box::new(OkAdapter(PlatformId::Openai)),
            Box::new(ErrAdapter(PlatformId::Perplexity)),
            Box::new(SlowAdapter(PlatformId::Gemini)),
        ];

        let outcomes = fan_out(&adapters, &queries(2), 30).await;
        assert_eq!(outcomes.len(), 6);

        let ok = outcomes.iter().filter(|o| o.result.is_ok()).count();
        assert_eq!(ok, 2, "only the OkAdapter branches succeed");

        let timeouts = outcomes
            .iter()
            .filter(|o| matches!(o.result, Err(PlatformError::Timeout { .. })))
            .count();
        assert_eq!(timeouts, 2, "slow branches hit the per-call deadline");
    }

    #[tokio::test(start_paused = true)]
    async fn outcome_order_is_adapter_then_query() {
        let adapters: Vec<Box<dyn PlatformAdapter>> = vec![
            Box::new(OkAdapter(PlatformId::Openai)),
            Box::new(OkAdapter(PlatformId::Gemini)),
        ];

        let outcomes = fan_out(&adapters, &queries(2), 30).await;
        let keys: Vec<(PlatformId, usize)> =
            outcomes.iter().map(|o| (o.platform, o.query_index)).collect();
        assert_eq!(
            keys,
            vec![
                (PlatformId::Openai, 0),
                (PlatformId::Openai, 1),
                (PlatformId::Gemini, 0),
                (PlatformId::Gemini, 1),
            ]
        );
    }

    #[tokio::test]
    async fn empty_queries_settle_immediately() {
        let adapters: Vec<Box<dyn PlatformAdapter>> =
            vec![Box::new(OkAdapter(PlatformId::Openai))];
        let outcomes = fan_out(&adapters, &[], 30).await;
        assert!(outcomes.is_empty());
    }
}
