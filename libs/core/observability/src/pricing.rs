//! Pricing-specific metrics for the savings estimator.

use metrics::{counter, gauge, histogram};
use std::time::Instant;

/// Pricing metrics recorder
pub struct PricingMetrics;

impl PricingMetrics {
    // =========================================================================
    // Per-resource Metrics
    // =========================================================================

    /// Record a successfully priced resource
    pub fn record_resource_priced(engine: &str) {
        counter!(
            "pricing_resources_total",
            "status" => "priced",
            "engine" => engine.to_string()
        )
        .increment(1);
    }

    /// Record a resource skipped due to a per-resource pricing failure
    pub fn record_resource_skipped(reason: &str) {
        counter!(
            "pricing_resources_total",
            "status" => "skipped",
            "reason" => reason.to_string()
        )
        .increment(1);
    }

    /// Record a catalog rate-limit rejection
    pub fn record_rate_limited() {
        counter!("pricing_rate_limited_total").increment(1);
    }

    // =========================================================================
    // Run Metrics
    // =========================================================================

    /// Record a completed estimation run
    pub fn record_run_completed(priced: usize, skipped: usize, duration_secs: f64) {
        counter!("estimate_runs_total", "status" => "completed").increment(1);
        histogram!("estimate_run_duration_seconds").record(duration_secs);

        tracing::info!(
            priced = priced,
            skipped = skipped,
            duration_secs = duration_secs,
            "Estimation run completed"
        );
    }

    /// Record an aborted estimation run
    pub fn record_run_aborted(reason: &str) {
        counter!("estimate_runs_total", "status" => "aborted", "reason" => reason.to_string())
            .increment(1);

        tracing::error!(reason = reason, "Estimation run aborted");
    }

    /// Set the potential savings surfaced by the last run, per price component
    pub fn set_potential_savings(component: &str, amount: f64) {
        gauge!("potential_savings_usd", "component" => component.to_string()).set(amount);
    }
}

/// Timer guard for automatic duration recording.
///
/// Records the duration when `stop()` is called or when dropped.
pub struct PricingTimer {
    start: Instant,
    operation: String,
    stopped: bool,
}

impl PricingTimer {
    /// Start a new timer for an operation
    pub fn new(operation: &str) -> Self {
        Self {
            start: Instant::now(),
            operation: operation.to_string(),
            stopped: false,
        }
    }

    /// Stop the timer and record the duration. Returns duration in milliseconds.
    pub fn stop(&mut self) -> u64 {
        if self.stopped {
            return 0;
        }
        self.stopped = true;

        let duration = self.start.elapsed();

        histogram!(
            "pricing_operation_duration_seconds",
            "operation" => self.operation.clone()
        )
        .record(duration.as_secs_f64());

        duration.as_millis() as u64
    }
}

impl Drop for PricingTimer {
    fn drop(&mut self) {
        // Record on drop if not explicitly stopped
        if !self.stopped {
            self.stop();
        }
    }
}
