//! Prometheus metrics endpoint handler.
//!
//! Unauthenticated so Prometheus can scrape it. Labels carry no record data;
//! names in paths are collapsed to `{nome}` before recording.

use axum::{extract::State, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// Handler for GET /metrics
///
/// ```text
/// # TYPE ds_http_requests_total counter
/// ds_http_requests_total{method="GET",endpoint="/api/v1/deficiencias",status_code="200"} 42
/// ```
#[tracing::instrument(skip_all, name = "ds.metrics.scrape")]
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}
