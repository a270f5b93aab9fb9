//! Pricing catalog abstraction: typed query filters, price records, and the
//! client trait the resolver consumes.
//!
//! Filters are plain structs serialized at the client boundary; the catalog
//! answers with price records whose unit price is extracted by a single
//! documented rule (first on-demand term, first price dimension, USD).

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Service code for relational database pricing
pub const RDS_SERVICE_CODE: &str = "AmazonRDS";

/// Error type for catalog client operations
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to parse catalog response: {0}")]
    Parse(String),

    #[error("catalog rate limit exceeded")]
    RateLimited,

    #[error("catalog API error ({status}): {message}")]
    Api { status: u16, message: String },
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Filter match kind. The catalog supports other kinds, but every query
/// this system issues is an exact match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MatchKind {
    #[serde(rename = "TERM_MATCH")]
    TermMatch,
}

/// A single attribute filter of a catalog query
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Filter {
    #[serde(rename = "Field")]
    pub field: &'static str,
    #[serde(rename = "Value")]
    pub value: String,
    #[serde(rename = "Type")]
    pub match_kind: MatchKind,
}

impl Filter {
    /// Exact-match filter on a catalog attribute
    pub fn term(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            match_kind: MatchKind::TermMatch,
        }
    }
}

/// One price record from the catalog.
///
/// The catalog serves two incompatible schema variants: price list entries
/// arrive either as JSON-encoded strings or as inline objects. Both are
/// normalized here.
#[derive(Debug, Clone)]
pub struct PriceRecord(Value);

impl PriceRecord {
    /// Normalize a price list entry from either schema variant
    pub fn from_value(entry: Value) -> CatalogResult<Self> {
        match entry {
            Value::String(raw) => serde_json::from_str(&raw)
                .map(Self)
                .map_err(|e| CatalogError::Parse(format!("price list entry: {e}"))),
            object @ Value::Object(_) => Ok(Self(object)),
            other => Err(CatalogError::Parse(format!(
                "unexpected price list entry: {other}"
            ))),
        }
    }

    /// Extract the unit price: first on-demand term, first price dimension,
    /// USD. Rejects records without that path, and prices that are negative
    /// or NaN.
    pub fn unit_price(&self) -> CatalogResult<f64> {
        let raw = self
            .0
            .get("terms")
            .and_then(|terms| terms.get("OnDemand"))
            .and_then(Value::as_object)
            .and_then(|terms| terms.values().next())
            .and_then(|term| term.get("priceDimensions"))
            .and_then(Value::as_object)
            .and_then(|dimensions| dimensions.values().next())
            .and_then(|dimension| dimension.get("pricePerUnit"))
            .and_then(|prices| prices.get("USD"))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                CatalogError::Parse("price record missing pricePerUnit.USD".to_string())
            })?;

        let price: f64 = raw
            .parse()
            .map_err(|e| CatalogError::Parse(format!("unit price '{raw}': {e}")))?;
        if !price.is_finite() || price < 0.0 {
            return Err(CatalogError::Parse(format!("unit price out of range: {raw}")));
        }
        Ok(price)
    }

}

/// Client trait for the external pricing catalog.
///
/// An empty result set signals "no match" and drives the resolver's
/// fallback; it is not an error at this layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PricingCatalog: Send + Sync {
    async fn get_products(
        &self,
        service_code: &str,
        filters: &[Filter],
    ) -> CatalogResult<Vec<PriceRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(price: &str) -> Value {
        json!({
            "product": {"attributes": {"instanceType": "db.t3.medium"}},
            "terms": {
                "OnDemand": {
                    "SKU.JRTCKXETXF": {
                        "priceDimensions": {
                            "SKU.JRTCKXETXF.6YS6EN2CT7": {
                                "pricePerUnit": {"USD": price}
                            }
                        }
                    }
                }
            }
        })
    }

    #[test]
    fn test_filter_serializes_to_catalog_shape() {
        let filter = Filter::term("databaseEngine", "PostgreSQL");
        let encoded = serde_json::to_value(&filter).unwrap();
        assert_eq!(
            encoded,
            json!({"Field": "databaseEngine", "Value": "PostgreSQL", "Type": "TERM_MATCH"})
        );
    }

    #[test]
    fn test_unit_price_from_inline_object() {
        let record = PriceRecord::from_value(record("0.068")).unwrap();
        assert_eq!(record.unit_price().unwrap(), 0.068);
    }

    #[test]
    fn test_unit_price_from_string_encoded_entry() {
        let encoded = Value::String(record("0.115").to_string());
        let record = PriceRecord::from_value(encoded).unwrap();
        assert_eq!(record.unit_price().unwrap(), 0.115);
    }

    #[test]
    fn test_malformed_entry_is_a_parse_error() {
        let err = PriceRecord::from_value(Value::String("not json".to_string())).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));

        let err = PriceRecord::from_value(json!(42)).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn test_record_without_price_path_is_a_parse_error() {
        let record = PriceRecord::from_value(json!({"product": {}})).unwrap();
        assert!(matches!(record.unit_price(), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let record = PriceRecord::from_value(record("-0.5")).unwrap();
        assert!(matches!(record.unit_price(), Err(CatalogError::Parse(_))));
    }
}
