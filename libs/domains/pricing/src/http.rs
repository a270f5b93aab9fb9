//! HTTP implementation of the catalog client.
//!
//! Speaks the GetProducts-shaped JSON interface of the price list query
//! service. The endpoint is configurable so deployments can point at a
//! regional endpoint or an internal pricing proxy.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::catalog::{CatalogError, CatalogResult, Filter, PriceRecord, PricingCatalog};

/// Default endpoint for the price catalog query API
pub const DEFAULT_CATALOG_ENDPOINT: &str = "https://api.pricing.us-east-1.amazonaws.com";

const GET_PRODUCTS_TARGET: &str = "AWSPriceListService.GetProducts";

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct GetProductsRequest<'a> {
    service_code: &'a str,
    filters: &'a [Filter],
    format_version: &'a str,
}

/// HTTP catalog client
pub struct HttpCatalogClient {
    client: Client,
    endpoint: String,
}

impl HttpCatalogClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> CatalogResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl PricingCatalog for HttpCatalogClient {
    async fn get_products(
        &self,
        service_code: &str,
        filters: &[Filter],
    ) -> CatalogResult<Vec<PriceRecord>> {
        let request = GetProductsRequest {
            service_code,
            filters,
            format_version: "aws_v1",
        };
        let body = serde_json::to_vec(&request)
            .map_err(|e| CatalogError::Parse(format!("encode request: {e}")))?;

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-Amz-Target", GET_PRODUCTS_TARGET)
            .header("Content-Type", "application/x-amz-json-1.1")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!(service_code, "catalog rate limit hit");
            return Err(CatalogError::RateLimited);
        }

        let text = response.text().await?;
        if !status.is_success() {
            // Throttling also surfaces as a typed error body on this API
            if text.contains("ThrottlingException") {
                warn!(service_code, "catalog rate limit hit");
                return Err(CatalogError::RateLimited);
            }
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let payload: Value = serde_json::from_str(&text)
            .map_err(|e| CatalogError::Parse(format!("catalog response: {e}")))?;
        let entries = match payload.get("PriceList") {
            Some(Value::Array(entries)) => entries.clone(),
            Some(other) => {
                return Err(CatalogError::Parse(format!(
                    "PriceList is not an array: {other}"
                )));
            }
            None => {
                return Err(CatalogError::Parse(
                    "catalog response missing PriceList".to_string(),
                ));
            }
        };

        debug!(
            service_code,
            filters = filters.len(),
            records = entries.len(),
            "catalog query answered"
        );

        entries.into_iter().map(PriceRecord::from_value).collect()
    }
}
