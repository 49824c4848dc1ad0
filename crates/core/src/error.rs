//! Aggregation error model.

use thiserror::Error;

/// Result type used across the aggregation layer.
pub type AggregationResult<T> = Result<T, AggregationError>;

/// Input-validation failure.
///
/// Every variant is raised before any aggregation work starts. Once inputs pass
/// validation the fold never fails: unresolved sellers and products are
/// tolerated, not reported.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AggregationError {
    /// The top-level data container is absent or not an object.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The sellers collection is absent, not a sequence, or empty.
    #[error("missing sellers: {0}")]
    MissingSellers(String),

    /// The products collection is absent, not a sequence, or empty.
    #[error("missing products: {0}")]
    MissingProducts(String),

    /// The purchase records collection is absent, not a sequence, or empty.
    #[error("missing purchase records: {0}")]
    MissingPurchaseRecords(String),

    /// A mandatory strategy is missing from the options.
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

impl AggregationError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn missing_sellers(msg: impl Into<String>) -> Self {
        Self::MissingSellers(msg.into())
    }

    pub fn missing_products(msg: impl Into<String>) -> Self {
        Self::MissingProducts(msg.into())
    }

    pub fn missing_purchase_records(msg: impl Into<String>) -> Self {
        Self::MissingPurchaseRecords(msg.into())
    }

    pub fn invalid_options(msg: impl Into<String>) -> Self {
        Self::InvalidOptions(msg.into())
    }
}
