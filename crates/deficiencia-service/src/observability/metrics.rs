//! Metrics definitions for the Deficiencia service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `ds_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded to prevent cardinality explosion:
//! - `method`: 7 values max (GET, POST, PATCH, DELETE, PUT, HEAD, OPTIONS)
//! - `endpoint`: parameterized paths, unknown paths collapse to `/other`
//! - `status`: 3 values (success, error, timeout)
//! - `operation`: one per repository method

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize Prometheus metrics recorder and return the handle
/// for serving metrics via HTTP.
///
/// Must be called before any metrics are recorded.
///
/// # Errors
///
/// Returns error if Prometheus recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("ds_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.150, 0.200, 0.300, 0.500, 1.000, 2.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Prefix("ds_db_query".to_string()),
            &[
                0.001, 0.002, 0.005, 0.010, 0.020, 0.050, 0.100, 0.250, 0.500, 1.000,
            ],
        )
        .map_err(|e| format!("Failed to set DB query buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion
///
/// Metric: `ds_http_requests_total`, `ds_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status`
///
/// Includes framework-level rejections (404, 405, 415) because the
/// middleware calling this sits outside the router.
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("ds_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint.clone(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("ds_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Categorize HTTP status code into success/error/timeout
fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Normalize endpoint path to prevent label cardinality explosion.
///
/// Names in the path are user input, so they are replaced by `{nome}`.
fn normalize_endpoint(path: &str) -> String {
    match path {
        "/health" | "/ready" | "/metrics" | "/api/v1/deficiencias" => path.to_string(),
        _ => {
            let parts: Vec<&str> = path.split('/').collect();
            // /api/v1/deficiencias/{nome} → ["", "api", "v1", "deficiencias", nome]
            if parts.len() == 5 && path.starts_with("/api/v1/deficiencias/") {
                "/api/v1/deficiencias/{nome}".to_string()
            } else {
                "/other".to_string()
            }
        }
    }
}

// ============================================================================
// Database Metrics
// ============================================================================

/// Record database query execution
///
/// Metric: `ds_db_query_duration_seconds`, `ds_db_queries_total`
/// Labels: `operation`, `status`
///
/// Operations: get_all, get_by_name, create, delete
pub fn record_db_query(operation: &str, status: &str, duration: Duration) {
    histogram!("ds_db_query_duration_seconds",
        "operation" => operation.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("ds_db_queries_total",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    // These run against the global no-op recorder; they cover the recording
    // paths without asserting on values.

    #[test]
    fn test_record_http_request() {
        record_http_request("GET", "/api/v1/deficiencias", 200, Duration::from_millis(5));
        record_http_request(
            "GET",
            "/api/v1/deficiencias/Defici%C3%AAncia%20Visual",
            404,
            Duration::from_millis(3),
        );
        record_http_request("POST", "/api/v1/deficiencias", 201, Duration::from_millis(9));
        record_http_request("GET", "/api/v1/deficiencias", 408, Duration::from_secs(30));
    }

    #[test]
    fn test_record_db_query() {
        record_db_query("get_all", "success", Duration::from_millis(2));
        record_db_query("create", "error", Duration::from_millis(40));
    }

    #[test]
    fn test_categorize_status_code() {
        assert_eq!(categorize_status_code(200), "success");
        assert_eq!(categorize_status_code(201), "success");
        assert_eq!(categorize_status_code(404), "error");
        assert_eq!(categorize_status_code(500), "error");
        assert_eq!(categorize_status_code(408), "timeout");
        assert_eq!(categorize_status_code(504), "timeout");
    }

    #[test]
    fn test_normalize_endpoint_static_paths() {
        assert_eq!(normalize_endpoint("/health"), "/health");
        assert_eq!(normalize_endpoint("/ready"), "/ready");
        assert_eq!(normalize_endpoint("/metrics"), "/metrics");
        assert_eq!(
            normalize_endpoint("/api/v1/deficiencias"),
            "/api/v1/deficiencias"
        );
    }

    #[test]
    fn test_normalize_endpoint_replaces_nome() {
        assert_eq!(
            normalize_endpoint("/api/v1/deficiencias/Defici%C3%AAncia%20Motora"),
            "/api/v1/deficiencias/{nome}"
        );
    }

    #[test]
    fn test_normalize_endpoint_unknown_paths() {
        assert_eq!(normalize_endpoint("/api/v1/deficiencias/a/b"), "/other");
        assert_eq!(normalize_endpoint("/wp-admin"), "/other");
    }
}
