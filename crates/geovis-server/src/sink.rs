//! Best-effort report persistence.

use async_trait::async_trait;
use geovis_core::contract::ScanReport;

/// External store for completed scan reports.
///
/// Persistence is fire-and-forget: the scan response never waits on it and
/// a failing sink only produces a log line.
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn persist(&self, report: &ScanReport) -> anyhow::Result<()>;
}

/// Default sink when no external store is wired: records the scan outcome
/// in the log and nothing else.
pub struct LogSink;

#[async_trait]
impl ReportSink for LogSink {
    async fn persist(&self, report: &ScanReport) -> anyhow::Result<()> {
        tracing::info!(
            domain = %report.domain,
            score = report.summary.visibility_score,
            is_invisible = report.summary.is_invisible,
            "scan report completed"
        );
        Ok(())
    }
}
