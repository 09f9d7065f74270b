//! Schoolbook observability.
//!
//! - Console, rolling error-log and JSON-log tracing output
//! - Per-request logging with a generated request id
//! - Prometheus HTTP and business metrics
//!
//! Metrics can be switched off at runtime with `OBSERVABILITY_ENABLED=false`;
//! logging is always on.
//!
//! ```no_run
//! use schoolbook_observability::{init_metrics, init_tracing};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let _guards = init_tracing()?;
//!     let _metrics = init_metrics()?;
//!     Ok(())
//! }
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{LogGuards, init_tracing, logging_middleware};
pub use metrics::{
    PrometheusHandle, init_metrics, is_observability_enabled, metrics_middleware, metrics_router,
    track_invoices_generated, track_payment_recorded, track_report_assembled,
    track_result_recorded,
};
