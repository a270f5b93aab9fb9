//! Savings Estimator Service
//!
//! Prices an inventory of resources one at a time and classifies failures:
//! per-resource problems (unsupported attributes, no catalog match) skip
//! that resource and are reported in the run result; catalog-level problems
//! (rate limiting, transport faults) abort the run.

use chrono::{DateTime, Utc};
use domain_pricing::{
    PriceEstimate, PricingCatalog, PricingError, PricingResolver, PricingResult,
    ResourceDescriptor,
};
use observability::{PricingMetrics, PricingTimer};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

/// One successfully priced resource
#[derive(Debug, Clone, Serialize)]
pub struct ResourceEstimate {
    pub resource_id: String,
    pub engine: String,
    pub instance_class: String,
    #[serde(flatten)]
    pub estimate: PriceEstimate,
}

/// One resource skipped by the per-resource error policy
#[derive(Debug, Clone, Serialize)]
pub struct SkippedResource {
    pub resource_id: String,
    pub kind: &'static str,
    pub reason: String,
}

/// Result of an estimation run
#[derive(Debug, Clone, Serialize)]
pub struct EstimateRunResult {
    pub resources_priced: usize,
    pub resources_skipped: usize,
    pub estimates: Vec<ResourceEstimate>,
    pub skipped: Vec<SkippedResource>,
    /// Sum of instance unit prices across priced resources
    pub total_compute_price: f64,
    /// Sum of scaled storage prices across priced resources
    pub total_storage_price: f64,
    pub duration_ms: u64,
    pub timestamp: DateTime<Utc>,
}

/// Batch estimator over a pricing resolver
pub struct SavingsEstimator<C> {
    resolver: PricingResolver<C>,
    region: String,
}

impl<C: PricingCatalog> SavingsEstimator<C> {
    pub fn new(catalog: Arc<C>, region: &str) -> PricingResult<Self> {
        Ok(Self {
            resolver: PricingResolver::new(catalog, region)?,
            region: region.to_string(),
        })
    }

    /// Price every descriptor sequentially and accumulate the run result.
    ///
    /// A failed lookup never becomes a zero estimate: skipped resources are
    /// reported with their reason, and catalog-level failures surface as
    /// the run's error.
    pub async fn run(
        &self,
        descriptors: &[ResourceDescriptor],
    ) -> Result<EstimateRunResult, PricingError> {
        let start = std::time::Instant::now();
        let mut estimates = Vec::new();
        let mut skipped = Vec::new();

        info!(
            region = %self.region,
            location = self.resolver.location(),
            resources = descriptors.len(),
            "Starting estimation run"
        );

        for descriptor in descriptors {
            let mut timer = PricingTimer::new("resolve");
            match self.resolver.price(descriptor).await {
                Ok(estimate) => {
                    timer.stop();
                    info!(
                        resource_id = %descriptor.resource_id,
                        compute_price = estimate.compute_price,
                        storage_price = estimate.storage_price,
                        "Priced resource"
                    );
                    PricingMetrics::record_resource_priced(&descriptor.engine);
                    estimates.push(ResourceEstimate {
                        resource_id: descriptor.resource_id.clone(),
                        engine: descriptor.engine.clone(),
                        instance_class: descriptor.instance_class.clone(),
                        estimate,
                    });
                }
                Err(err) if err.is_per_resource() => {
                    timer.stop();
                    warn!(
                        resource_id = %descriptor.resource_id,
                        error = %err,
                        "Skipping resource"
                    );
                    PricingMetrics::record_resource_skipped(err.kind());
                    skipped.push(SkippedResource {
                        resource_id: descriptor.resource_id.clone(),
                        kind: err.kind(),
                        reason: err.to_string(),
                    });
                }
                Err(err) => {
                    timer.stop();
                    if matches!(err, PricingError::RateLimited) {
                        PricingMetrics::record_rate_limited();
                    }
                    PricingMetrics::record_run_aborted(err.kind());
                    error!(
                        resource_id = %descriptor.resource_id,
                        error = %err,
                        "Aborting estimation run"
                    );
                    return Err(err);
                }
            }
        }

        let duration = start.elapsed();
        let total_compute_price: f64 = estimates.iter().map(|e| e.estimate.compute_price).sum();
        let total_storage_price: f64 = estimates.iter().map(|e| e.estimate.storage_price).sum();

        PricingMetrics::record_run_completed(
            estimates.len(),
            skipped.len(),
            duration.as_secs_f64(),
        );
        PricingMetrics::set_potential_savings("compute", total_compute_price);
        PricingMetrics::set_potential_savings("storage", total_storage_price);

        Ok(EstimateRunResult {
            resources_priced: estimates.len(),
            resources_skipped: skipped.len(),
            estimates,
            skipped,
            total_compute_price,
            total_storage_price,
            duration_ms: duration.as_millis() as u64,
            timestamp: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use domain_pricing::{CatalogError, CatalogResult, Filter, OrderableCapabilities, PriceRecord};
    use serde_json::json;

    struct FixedPriceCatalog {
        unit_price: &'static str,
    }

    #[async_trait]
    impl PricingCatalog for FixedPriceCatalog {
        async fn get_products(
            &self,
            _service_code: &str,
            _filters: &[Filter],
        ) -> CatalogResult<Vec<PriceRecord>> {
            let record = PriceRecord::from_value(json!({
                "terms": {
                    "OnDemand": {
                        "TERM": {
                            "priceDimensions": {
                                "TERM.DIM": {"pricePerUnit": {"USD": self.unit_price}}
                            }
                        }
                    }
                }
            }))?;
            Ok(vec![record])
        }
    }

    struct RateLimitedCatalog;

    #[async_trait]
    impl PricingCatalog for RateLimitedCatalog {
        async fn get_products(
            &self,
            _service_code: &str,
            _filters: &[Filter],
        ) -> CatalogResult<Vec<PriceRecord>> {
            Err(CatalogError::RateLimited)
        }
    }

    fn descriptor(resource_id: &str, storage_type: &str) -> ResourceDescriptor {
        ResourceDescriptor {
            resource_id: resource_id.to_string(),
            engine: "postgres".to_string(),
            instance_class: "db.t3.medium".to_string(),
            multi_az: false,
            license_model: "license-included".to_string(),
            storage_type: storage_type.to_string(),
            allocated_storage_gib: 20,
            iops: 0,
            orderable: OrderableCapabilities {
                multi_az_capable: false,
                engine: "postgres".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_per_resource_failures_skip_not_abort() {
        let estimator =
            SavingsEstimator::new(Arc::new(FixedPriceCatalog { unit_price: "0.1" }), "us-east-1")
                .unwrap();

        let inventory = vec![
            descriptor("db-ok", "gp2"),
            descriptor("db-bad-volume", "gp4"),
            descriptor("db-also-ok", "io1"),
        ];

        let result = estimator.run(&inventory).await.unwrap();
        assert_eq!(result.resources_priced, 2);
        assert_eq!(result.resources_skipped, 1);
        assert_eq!(result.skipped[0].resource_id, "db-bad-volume");
        assert_eq!(result.skipped[0].kind, "unsupported_attribute");
        assert!(result.total_compute_price > 0.0);
    }

    #[tokio::test]
    async fn test_rate_limited_catalog_aborts_the_run() {
        let estimator =
            SavingsEstimator::new(Arc::new(RateLimitedCatalog), "us-east-1").unwrap();

        let inventory = vec![descriptor("db-1", "gp2"), descriptor("db-2", "gp2")];

        let err = estimator.run(&inventory).await.unwrap_err();
        assert!(matches!(err, PricingError::RateLimited));
    }

    #[tokio::test]
    async fn test_empty_inventory_completes_with_zero_totals() {
        let estimator =
            SavingsEstimator::new(Arc::new(FixedPriceCatalog { unit_price: "0.1" }), "us-east-1")
                .unwrap();

        let result = estimator.run(&[]).await.unwrap();
        assert_eq!(result.resources_priced, 0);
        assert_eq!(result.resources_skipped, 0);
        assert_eq!(result.total_compute_price, 0.0);
        assert_eq!(result.total_storage_price, 0.0);
    }
}
