//! Pricing Domain
//!
//! Resolves normalized resource descriptors into compute and storage price
//! figures against an external pricing catalog.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Resolver   │  ← lookup keys, fallback logic, price composition
//! └──────┬───────┘
//!        │
//! ┌──────▼───────┐
//! │   Catalog    │  ← client trait + HTTP impl + memoizing cache
//! └──────┬───────┘
//!        │
//! ┌──────▼───────┐
//! │    Models    │  ← descriptors, mapping outcomes, estimates
//! └──────────────┘
//! ```

pub mod cache;
pub mod catalog;
pub mod error;
pub mod http;
pub mod models;
pub mod regions;
pub mod resolver;

// Re-export commonly used types
pub use cache::CachingCatalog;
pub use catalog::{
    CatalogError, CatalogResult, Filter, MatchKind, PriceRecord, PricingCatalog,
    RDS_SERVICE_CODE,
};
pub use error::{PricingError, PricingResult};
pub use http::{HttpCatalogClient, DEFAULT_CATALOG_ENDPOINT};
pub use models::{
    DeploymentOption, EngineResolution, LicenseModel, OrderableCapabilities, PriceEstimate,
    ResourceDescriptor,
};
pub use regions::{region_location, SUPPORTED_REGIONS};
pub use resolver::{
    deployment_option, resolve_edition, resolve_engine, resolve_volume, PricingResolver,
};
