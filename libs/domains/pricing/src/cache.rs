//! Memoizing wrapper over a catalog client.
//!
//! Resolutions for resources of the same shape issue identical filter
//! tuples; the cache answers repeats locally instead of re-querying the
//! catalog. Empty result sets are memoized too, since the same query would
//! get the same "no match" answer.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

use crate::catalog::{CatalogResult, Filter, PriceRecord, PricingCatalog};

type CacheKey = (String, Vec<Filter>);

/// Catalog client wrapper that memoizes successful lookups by the full
/// filter tuple
pub struct CachingCatalog<C> {
    inner: C,
    entries: Mutex<HashMap<CacheKey, Vec<PriceRecord>>>,
}

impl<C> CachingCatalog<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of memoized filter tuples
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl<C: PricingCatalog> PricingCatalog for CachingCatalog<C> {
    async fn get_products(
        &self,
        service_code: &str,
        filters: &[Filter],
    ) -> CatalogResult<Vec<PriceRecord>> {
        let key: CacheKey = (service_code.to_string(), filters.to_vec());

        // A poisoned lock only disables memoization; lookups still go through
        if let Some(hit) = self
            .entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(&key).cloned())
        {
            debug!(service_code, filters = filters.len(), "catalog cache hit");
            return Ok(hit);
        }

        let records = self.inner.get_products(service_code, filters).await?;
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key, records.clone());
        }
        Ok(records)
    }
}
