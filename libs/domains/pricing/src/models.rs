use serde::{Deserialize, Serialize};
use strum::Display;

/// License model strings as the pricing catalog spells them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LicenseModel {
    #[strum(serialize = "License included")]
    LicenseIncluded,
    #[strum(serialize = "Bring your own license")]
    BringYourOwnLicense,
}

/// Deployment option column of the pricing catalog.
///
/// Only the two reachable options are modeled: Multi-AZ capable SQL Server
/// EE/SE orderables price against the mirror offering, everything else
/// prices Single-AZ (see `resolver::deployment_option`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DeploymentOption {
    #[strum(serialize = "Single-AZ")]
    SingleAz,
    #[strum(serialize = "Multi-AZ (SQL Server Mirror)")]
    SqlServerMirror,
}

/// Outcome of an engine display-name lookup.
///
/// Engine resolution is permissive: identifiers outside the supported set
/// fall back to PostgreSQL rather than failing. `Defaulted` lets callers
/// observe that fallback; edition-specific pricing must not rely on a
/// defaulted name. Volume resolution, by contrast, is strict and rejects
/// unknown identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineResolution {
    /// Identifier found in the engine table
    Resolved(&'static str),
    /// Unknown identifier, priced under the default display name
    Defaulted(&'static str),
}

impl EngineResolution {
    pub fn display_name(&self) -> &'static str {
        match self {
            EngineResolution::Resolved(name) | EngineResolution::Defaulted(name) => name,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, EngineResolution::Defaulted(_))
    }
}

/// Catalog-derived orderable capabilities attached to a descriptor by the
/// inventory collaborator. Field aliases accept the catalog's own casing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderableCapabilities {
    #[serde(alias = "MultiAZCapable")]
    pub multi_az_capable: bool,
    /// The catalog's normalized engine string (e.g. "postgres", "sqlserver-ee")
    #[serde(alias = "Engine")]
    pub engine: String,
}

/// Normalized description of a database resource to be priced.
///
/// Produced by the inventory collaborator; consumed read-only by the
/// resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// Resource identifier, carried through for per-resource reporting
    pub resource_id: String,
    /// Engine identifier key into the engine table (e.g. "postgres")
    pub engine: String,
    /// Instance class (e.g. "db.t3.medium")
    pub instance_class: String,
    /// Whether the resource itself is deployed multi-AZ
    pub multi_az: bool,
    /// License model identifier ("bring-your-own-license" selects BYOL)
    pub license_model: String,
    /// Storage type key into the volume table (e.g. "gp2")
    pub storage_type: String,
    /// Allocated storage in GiB
    pub allocated_storage_gib: i64,
    /// Provisioned IOPS; 0 when none are provisioned
    #[serde(default)]
    pub iops: i64,
    /// Catalog-derived orderable capabilities
    pub orderable: OrderableCapabilities,
}

/// Resolved price figures for a single resource.
///
/// `compute_price` is the instance unit price per hour; `storage_price` is
/// the volume unit price per GB-month already scaled by allocated capacity,
/// plus any provisioned-IOPS component. Computed fresh per resource, never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceEstimate {
    pub compute_price: f64,
    pub storage_price: f64,
}
