//! Savings Estimator
//!
//! Prices an inventory of unused database resources against the pricing
//! catalog and reports the potential savings per resource. Runs one-shot;
//! everything downstream of the price figures (report rendering, delivery)
//! is a separate concern.

use clap::{Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::Environment;
use domain_pricing::{
    CachingCatalog, HttpCatalogClient, PricingCatalog, ResourceDescriptor, SUPPORTED_REGIONS,
};
use eyre::{Result, WrapErr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod config;
mod estimator;

use config::Config;
use estimator::{EstimateRunResult, SavingsEstimator};

#[derive(Parser)]
#[command(name = "savings-estimator")]
#[command(about = "Estimate cost savings for unused database resources")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price an inventory file and print the run report
    Estimate {
        /// Path to the resource inventory JSON (array of descriptors)
        #[arg(short, long)]
        input: PathBuf,

        /// Region the resources live in. Defaults to the configured region.
        #[arg(short, long)]
        region: Option<String>,

        /// Bypass the catalog query cache
        #[arg(long)]
        no_cache: bool,
    },

    /// List supported region codes and their catalog locations
    Regions,
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    let environment = Environment::from_env();
    init_tracing(&environment);

    observability::init_metrics();

    let cli = Cli::parse();

    match cli.command {
        Commands::Estimate {
            input,
            region,
            no_cache,
        } => {
            let region = region.unwrap_or_else(|| config.region.clone());

            let raw = std::fs::read_to_string(&input)
                .wrap_err_with(|| format!("failed to read inventory {}", input.display()))?;
            let descriptors: Vec<ResourceDescriptor> =
                serde_json::from_str(&raw).wrap_err("failed to parse inventory")?;

            let client = HttpCatalogClient::new(
                config.catalog.endpoint.clone(),
                Duration::from_secs(config.catalog.request_timeout_secs),
            )?;

            let result = if config.catalog.cache_enabled && !no_cache {
                run_estimate(Arc::new(CachingCatalog::new(client)), &region, &descriptors).await?
            } else {
                run_estimate(Arc::new(client), &region, &descriptors).await?
            };

            info!(
                "Run complete: {} resources priced, {} skipped",
                result.resources_priced, result.resources_skipped
            );
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Commands::Regions => {
            for (code, location) in SUPPORTED_REGIONS {
                println!("{code}\t{location}");
            }
        }
    }

    Ok(())
}

async fn run_estimate<C: PricingCatalog>(
    catalog: Arc<C>,
    region: &str,
    descriptors: &[ResourceDescriptor],
) -> Result<EstimateRunResult> {
    let estimator = SavingsEstimator::new(catalog, region)?;
    Ok(estimator.run(descriptors).await?)
}
