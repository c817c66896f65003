//! The scan route.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use geovis_scan::{run_scan, ScanError, ScanOptions};
use serde::Deserialize;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub domain: String,
}

/// `POST /api/v1/scan` — run one visibility scan synchronously.
///
/// The report is handed to the [`crate::sink::ReportSink`] on a detached
/// task after the response is built; sink failures are logged, never
/// surfaced.
pub(super) async fn start_scan(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ScanRequest>,
) -> Response {
    match run_scan(&state.deps, &body.domain, &ScanOptions::default()).await {
        Ok(report) => {
            let sink = Arc::clone(&state.sink);
            let stored = report.clone();
            tokio::spawn(async move {
                if let Err(e) = sink.persist(&stored).await {
                    tracing::warn!(domain = %stored.domain, error = %e, "report sink failed");
                }
            });

            (
                StatusCode::OK,
                Json(ApiResponse {
                    data: report,
                    meta: ResponseMeta::new(req_id.0),
                }),
            )
                .into_response()
        }
        Err(ScanError::InvalidDomain(e)) => {
            ApiError::new(req_id.0, "validation_error", e.to_string()).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "scan failed");
            ApiError::new(req_id.0, "internal_error", "scan failed").into_response()
        }
    }
}
