//! Seller performance aggregation.
//!
//! Folds purchase records into per-seller totals, ranks sellers by profit and
//! assigns tiered bonuses. Revenue and bonus rules are injected strategies so
//! alternative pricing or bonus curves need no change to the fold itself.
//!
//! Everything here is deterministic domain logic (no IO, no storage).

pub mod aggregator;
pub mod dataset;
pub mod ledger;
pub mod options;
pub mod report;
pub mod strategy;

pub use aggregator::{Aggregator, aggregate, aggregate_sharded};
pub use dataset::Dataset;
pub use ledger::{Ledger, ProductTally, SellerStats};
pub use options::{AggregationOptions, DEFAULT_TOP_PRODUCTS_LIMIT};
pub use report::{ProductQuantity, SellerReport};
pub use strategy::{BonusStrategy, CatalogPriceRevenue, LineItemRevenue, RevenueStrategy, TieredBonus};
