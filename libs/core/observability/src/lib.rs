//! Observability utilities for the savings estimator.
//!
//! This crate provides:
//! - Prometheus metrics recording and export
//! - Custom metrics for pricing resolution and estimation runs
//!
//! # Example
//!
//! ```rust,ignore
//! use observability::{init_metrics, PricingMetrics};
//!
//! // Initialize metrics recorder
//! init_metrics();
//!
//! // Record estimation outcomes
//! PricingMetrics::record_resource_priced("PostgreSQL");
//! PricingMetrics::record_resource_skipped("no_match");
//! ```

pub mod pricing;

pub use pricing::{PricingMetrics, PricingTimer};

// Re-export metrics macros for convenience
pub use metrics::{counter, gauge, histogram};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Initialize the Prometheus metrics recorder.
///
/// This should be called once at application startup.
/// Returns the PrometheusHandle for rendering metrics.
pub fn init_metrics() -> &'static PrometheusHandle {
    METRICS_HANDLE.get_or_init(|| {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .expect("Failed to install Prometheus recorder");

        info!("Prometheus metrics recorder initialized");

        // Register metric descriptions
        register_metric_descriptions();

        handle
    })
}

/// Get the metrics handle (must call init_metrics first)
pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Render the current metrics in Prometheus exposition format
pub fn render_metrics() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

/// Register metric descriptions for documentation
fn register_metric_descriptions() {
    use metrics::describe_counter;
    use metrics::describe_gauge;
    use metrics::describe_histogram;

    // Pricing resolution metrics
    describe_counter!(
        "pricing_resources_total",
        "Resources processed by the pricing resolver, by status"
    );
    describe_histogram!(
        "pricing_operation_duration_seconds",
        "Pricing operation duration in seconds"
    );
    describe_counter!(
        "pricing_rate_limited_total",
        "Pricing catalog rate-limit rejections"
    );

    // Estimation run metrics
    describe_counter!(
        "estimate_runs_total",
        "Estimation runs by final status"
    );
    describe_histogram!(
        "estimate_run_duration_seconds",
        "Estimation run duration in seconds"
    );
    describe_gauge!(
        "potential_savings_usd",
        "Potential savings surfaced by the last run, by price component"
    );
}
