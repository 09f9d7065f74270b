use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

pub use metrics_exporter_prometheus::PrometheusHandle;

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// `OBSERVABILITY_ENABLED` unset, or anything but `false`/`0`, means on.
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|v| !v.eq_ignore_ascii_case("false") && v != "0")
            .unwrap_or(true)
    })
}

/// Installs the Prometheus recorder and its upkeep task.
///
/// Returns `Ok(None)` when observability is disabled. Must be called from
/// inside a Tokio runtime.
pub fn init_metrics() -> anyhow::Result<Option<PrometheusHandle>> {
    if !is_observability_enabled() {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            LATENCY_BUCKETS,
        )?
        .install_recorder()?;

    let upkeep = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep.run_upkeep();
        }
    });

    Ok(Some(handle))
}

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path)
        .record(latency);
    gauge!("http_requests_active").decrement(1.0);

    response
}

/// `GET /metrics` in Prometheus text format.
pub fn metrics_router<S>(handle: PrometheusHandle) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

// Business metrics

pub fn track_result_recorded(created: bool) {
    if !is_observability_enabled() {
        return;
    }
    let action = if created { "created" } else { "updated" };
    counter!("results_recorded_total", "action" => action).increment(1);
}

pub fn track_report_assembled(subjects: usize) {
    if !is_observability_enabled() {
        return;
    }
    counter!("reports_assembled_total").increment(1);
    histogram!("report_subjects").record(subjects as f64);
}

pub fn track_invoices_generated(mode: &'static str, count: u64) {
    if !is_observability_enabled() {
        return;
    }
    counter!("invoices_generated_total", "mode" => mode).increment(count);
}

pub fn track_payment_recorded(method: &str, settled_invoice: bool) {
    if !is_observability_enabled() {
        return;
    }
    counter!("payments_recorded_total", "method" => method.to_string()).increment(1);
    if settled_invoice {
        counter!("invoices_settled_total").increment(1);
    }
}
