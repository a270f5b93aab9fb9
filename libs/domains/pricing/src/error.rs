use thiserror::Error;

use crate::catalog::CatalogError;

/// Result type for pricing operations
pub type PricingResult<T> = Result<T, PricingError>;

/// Errors that can occur while resolving prices.
///
/// The taxonomy distinguishes per-resource failures (skip the resource,
/// keep the run going) from run-level failures (abort): see
/// [`PricingError::is_per_resource`].
#[derive(Debug, Error)]
pub enum PricingError {
    /// An attribute value the mapping tables refuse to default (unknown
    /// storage type or region code)
    #[error("unsupported {attribute}: '{value}'")]
    UnsupportedAttribute {
        attribute: &'static str,
        value: String,
    },

    /// The catalog throttled the query. Transient, but terminal for the
    /// current run; there is no backoff
    #[error("pricing catalog rate limit exceeded")]
    RateLimited,

    /// No catalog record matched, fallback included. Must never surface as
    /// a zero price
    #[error("no catalog match for {subject}: {detail}")]
    NoMatch {
        subject: &'static str,
        detail: String,
    },

    /// Network or service fault talking to the catalog
    #[error("catalog transport error: {0}")]
    Transport(#[source] CatalogError),
}

impl From<CatalogError> for PricingError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::RateLimited => PricingError::RateLimited,
            other => PricingError::Transport(other),
        }
    }
}

impl PricingError {
    /// Whether the failure is scoped to a single resource (skip and report)
    /// rather than the whole run (abort)
    pub fn is_per_resource(&self) -> bool {
        matches!(
            self,
            PricingError::UnsupportedAttribute { .. } | PricingError::NoMatch { .. }
        )
    }

    /// Stable label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            PricingError::UnsupportedAttribute { .. } => "unsupported_attribute",
            PricingError::RateLimited => "rate_limited",
            PricingError::NoMatch { .. } => "no_match",
            PricingError::Transport(_) => "transport",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_stays_distinct_through_conversion() {
        let err: PricingError = CatalogError::RateLimited.into();
        assert!(matches!(err, PricingError::RateLimited));
        assert!(!err.is_per_resource());
    }

    #[test]
    fn test_other_catalog_errors_become_transport() {
        let err: PricingError = CatalogError::Parse("bad record".to_string()).into();
        assert!(matches!(err, PricingError::Transport(_)));
        assert!(!err.is_per_resource());
    }

    #[test]
    fn test_per_resource_classification() {
        let unsupported = PricingError::UnsupportedAttribute {
            attribute: "storageType",
            value: "gp4".to_string(),
        };
        assert!(unsupported.is_per_resource());
        assert_eq!(unsupported.kind(), "unsupported_attribute");

        let no_match = PricingError::NoMatch {
            subject: "instance pricing",
            detail: "db.t3.medium".to_string(),
        };
        assert!(no_match.is_per_resource());
        assert_eq!(no_match.kind(), "no_match");
    }
}
