//! Pricing resolution engine.
//!
//! Translates a [`ResourceDescriptor`] into compute and storage price
//! figures by querying the external catalog, degrading to a less-specific
//! query when the catalog has no record for the requested deployment
//! topology. Up to four sequential catalog calls per resource: instance,
//! fallback instance, storage, optional IOPS.

use std::sync::Arc;
use tracing::debug;

use crate::catalog::{Filter, PriceRecord, PricingCatalog, RDS_SERVICE_CODE};
use crate::error::{PricingError, PricingResult};
use crate::models::{
    DeploymentOption, EngineResolution, LicenseModel, PriceEstimate, ResourceDescriptor,
};
use crate::regions::region_location;

/// Engine identifier to catalog display name. Permissive: identifiers
/// outside the table price as PostgreSQL; callers that need
/// edition-specific pricing must check for the `Defaulted` outcome.
pub fn resolve_engine(engine_id: &str) -> EngineResolution {
    let display = match engine_id {
        "mysql" => "MySQL",
        "postgres" => "PostgreSQL",
        "mariadb" => "MariaDB",
        "aurora-postgresql" => "Aurora PostgreSQL",
        "aurora-mysql" | "aurora" => "Aurora MySQL",
        "oracle-ee" | "oracle-se" | "oracle-se1" | "oracle-se2" => "Oracle",
        "sqlserver-ee" | "sqlserver-se" | "sqlserver-ex" | "sqlserver-web" => "SQL Server",
        _ => return EngineResolution::Defaulted("PostgreSQL"),
    };
    EngineResolution::Resolved(display)
}

/// Engine identifier to catalog edition name; only the commercial engines
/// carry one.
pub fn resolve_edition(engine_id: &str) -> Option<&'static str> {
    match engine_id {
        "oracle-ee" => Some("Enterprise"),
        "oracle-se" => Some("Standard"),
        "oracle-se1" => Some("Standard One"),
        "oracle-se2" => Some("Standard Two"),
        "sqlserver-ee" => Some("Enterprise"),
        "sqlserver-se" => Some("Standard"),
        "sqlserver-ex" => Some("Express"),
        "sqlserver-web" => Some("Web"),
        _ => None,
    }
}

/// Storage type identifier to catalog volume name. Strict: unknown
/// identifiers are a resolution error, never a default.
pub fn resolve_volume(storage_type: &str) -> PricingResult<&'static str> {
    match storage_type {
        "gp2" => Ok("General Purpose"),
        "io1" => Ok("Provisioned IOPS"),
        "aurora" => Ok("General Purpose-Aurora"),
        "standard" => Ok("Magnetic"),
        other => Err(PricingError::UnsupportedAttribute {
            attribute: "storageType",
            value: other.to_string(),
        }),
    }
}

/// Deployment option column for a descriptor.
///
/// Authoritative rule: the catalog's orderable data decides. A Multi-AZ
/// capable SQL Server EE/SE orderable prices against the mirror offering;
/// everything else prices Single-AZ. The descriptor's own multi-AZ flag
/// does not participate.
pub fn deployment_option(descriptor: &ResourceDescriptor) -> DeploymentOption {
    if descriptor.orderable.multi_az_capable
        && matches!(
            descriptor.orderable.engine.as_str(),
            "sqlserver-ee" | "sqlserver-se"
        )
    {
        DeploymentOption::SqlServerMirror
    } else {
        DeploymentOption::SingleAz
    }
}

/// Resolves resource descriptors into price estimates against the external
/// pricing catalog.
#[derive(Debug)]
pub struct PricingResolver<C> {
    catalog: Arc<C>,
    location: &'static str,
}

impl<C: PricingCatalog> PricingResolver<C> {
    /// Create a resolver for a region. The region code is normalized to the
    /// catalog's location string once, up front.
    pub fn new(catalog: Arc<C>, region: &str) -> PricingResult<Self> {
        let location =
            region_location(region).ok_or_else(|| PricingError::UnsupportedAttribute {
                attribute: "region",
                value: region.to_string(),
            })?;
        Ok(Self { catalog, location })
    }

    /// The catalog location prices are resolved against
    pub fn location(&self) -> &'static str {
        self.location
    }

    /// Resolve the compute and storage prices for one resource.
    pub async fn price(&self, descriptor: &ResourceDescriptor) -> PricingResult<PriceEstimate> {
        let license_model = if descriptor.license_model == "bring-your-own-license" {
            LicenseModel::BringYourOwnLicense
        } else {
            LicenseModel::LicenseIncluded
        };
        let deployment = deployment_option(descriptor);
        let engine = resolve_engine(&descriptor.engine);
        let volume = resolve_volume(&descriptor.storage_type)?;

        if engine.is_defaulted() {
            debug!(
                resource_id = %descriptor.resource_id,
                engine = %descriptor.engine,
                "unknown engine identifier, pricing as PostgreSQL"
            );
        }

        let compute_price = self
            .instance_price(descriptor, engine, license_model, deployment)
            .await?;
        let volume_unit_price = self.storage_unit_price(volume, deployment).await?;
        let iops_price = self.iops_price(descriptor, deployment).await?;

        let storage_price =
            volume_unit_price * descriptor.allocated_storage_gib as f64 + iops_price;

        debug!(
            resource_id = %descriptor.resource_id,
            compute_price,
            storage_price,
            deployment = %deployment,
            "resource priced"
        );

        Ok(PriceEstimate {
            compute_price,
            storage_price,
        })
    }

    /// Instance unit price. Primary query carries the deployment option
    /// (and license model + edition for the commercial engines); an empty
    /// result falls back once to the region+instance-only filter. Empty
    /// after the fallback is terminal.
    async fn instance_price(
        &self,
        descriptor: &ResourceDescriptor,
        engine: EngineResolution,
        license_model: LicenseModel,
        deployment: DeploymentOption,
    ) -> PricingResult<f64> {
        let display = engine.display_name();

        let filters: Vec<Filter> = if display.contains("SQL Server") || display.contains("Oracle")
        {
            let edition = resolve_edition(&descriptor.engine).ok_or_else(|| {
                PricingError::UnsupportedAttribute {
                    attribute: "databaseEdition",
                    value: descriptor.engine.clone(),
                }
            })?;
            vec![
                Filter::term("databaseEngine", display),
                Filter::term("instanceType", descriptor.instance_class.clone()),
                Filter::term("location", self.location),
                Filter::term("licenseModel", license_model.to_string()),
                Filter::term("deploymentOption", deployment.to_string()),
                Filter::term("databaseEdition", edition),
            ]
        } else {
            vec![
                Filter::term("databaseEngine", display),
                Filter::term("instanceType", descriptor.instance_class.clone()),
                Filter::term("location", self.location),
                Filter::term("deploymentOption", deployment.to_string()),
            ]
        };

        let records = self.catalog.get_products(RDS_SERVICE_CODE, &filters).await?;
        let record = match records.into_iter().next() {
            Some(record) => record,
            None => {
                debug!(
                    resource_id = %descriptor.resource_id,
                    instance_class = %descriptor.instance_class,
                    "no deployment-qualified instance price, retrying region-only"
                );
                self.fallback_instance_record(descriptor, display).await?
            }
        };
        Ok(record.unit_price()?)
    }

    /// Sole fallback path: drop the deployment-option and edition
    /// constraints and match on engine, instance class, and location alone.
    async fn fallback_instance_record(
        &self,
        descriptor: &ResourceDescriptor,
        display: &'static str,
    ) -> PricingResult<PriceRecord> {
        let filters = [
            Filter::term("databaseEngine", display),
            Filter::term("instanceType", descriptor.instance_class.clone()),
            Filter::term("location", self.location),
        ];
        let records = self.catalog.get_products(RDS_SERVICE_CODE, &filters).await?;
        records
            .into_iter()
            .next()
            .ok_or_else(|| PricingError::NoMatch {
                subject: "instance pricing",
                detail: format!("{display} {}", descriptor.instance_class),
            })
    }

    /// Storage unit price, always from the deployment-qualified filter.
    async fn storage_unit_price(
        &self,
        volume: &'static str,
        deployment: DeploymentOption,
    ) -> PricingResult<f64> {
        let filters = [
            Filter::term("volumeType", volume),
            Filter::term("location", self.location),
            Filter::term("deploymentOption", deployment.to_string()),
        ];
        let records = self.catalog.get_products(RDS_SERVICE_CODE, &filters).await?;
        let record = records
            .into_iter()
            .next()
            .ok_or_else(|| PricingError::NoMatch {
                subject: "storage pricing",
                detail: volume.to_string(),
            })?;
        Ok(record.unit_price()?)
    }

    /// Provisioned-IOPS component; exactly 0 when none are requested.
    async fn iops_price(
        &self,
        descriptor: &ResourceDescriptor,
        deployment: DeploymentOption,
    ) -> PricingResult<f64> {
        if descriptor.iops <= 0 {
            return Ok(0.0);
        }
        let filters = [
            Filter::term("productFamily", "Provisioned IOPS"),
            Filter::term("location", self.location),
            Filter::term("deploymentOption", deployment.to_string()),
        ];
        let records = self.catalog.get_products(RDS_SERVICE_CODE, &filters).await?;
        let record = records
            .into_iter()
            .next()
            .ok_or_else(|| PricingError::NoMatch {
                subject: "provisioned IOPS pricing",
                detail: format!("{} IOPS", descriptor.iops),
            })?;
        Ok(record.unit_price()? * descriptor.iops as f64)
    }
}
