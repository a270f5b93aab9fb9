//! Configuration for the savings estimator

use core_config::{env_or_default, env_parse_or};
use domain_pricing::DEFAULT_CATALOG_ENDPOINT;
use eyre::Result;

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    /// Region the priced resources live in
    pub region: String,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Price catalog query endpoint
    pub endpoint: String,
    /// Per-request timeout for catalog queries
    pub request_timeout_secs: u64,
    /// Memoize catalog lookups within a run
    pub cache_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            environment: env_or_default("ENVIRONMENT", "development"),
            region: env_or_default("AWS_REGION", "us-east-1"),
            catalog: CatalogConfig {
                endpoint: env_or_default("PRICING_CATALOG_ENDPOINT", DEFAULT_CATALOG_ENDPOINT),
                request_timeout_secs: env_parse_or("PRICING_CATALOG_TIMEOUT_SECS", 30),
                cache_enabled: env_parse_or("PRICING_CACHE_ENABLED", true),
            },
        })
    }
}
